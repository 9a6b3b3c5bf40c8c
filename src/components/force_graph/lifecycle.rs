//! Stopping the simulation when its host view goes away.
//!
//! An [`Invalidation`] wraps any future; once it completes the simulation is stopped at the next
//! scheduler step, whatever its alpha. The future is polled without a real waker between ticks,
//! so it must not rely on being woken to make progress (channels and ready futures are fine).

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::FutureExt;
use futures::channel::oneshot;
use futures::future::LocalBoxFuture;
use futures::task::noop_waker_ref;
use log::info;

use super::simulation::Simulation;

/// Completion signal that tears down a simulation.
pub struct Invalidation {
	signal: LocalBoxFuture<'static, ()>,
}

impl Invalidation {
	/// Fires when `signal` completes.
	pub fn new(signal: impl Future<Output = ()> + 'static) -> Self {
		Self {
			signal: signal.boxed_local(),
		}
	}

	/// A signal fired through the returned [`Invalidator`].
	///
	/// Dropping the invalidator without firing means the signal never completes.
	pub fn channel() -> (Invalidator, Self) {
		let (tx, rx) = oneshot::channel();
		let signal = async move {
			if rx.await.is_err() {
				futures::future::pending::<()>().await;
			}
		};
		(Invalidator { tx }, Self::new(signal))
	}
}

impl Future for Invalidation {
	type Output = ();

	fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
		self.signal.poll_unpin(cx)
	}
}

/// Sending half of [`Invalidation::channel`].
#[derive(Debug)]
pub struct Invalidator {
	tx: oneshot::Sender<()>,
}

impl Invalidator {
	/// Fires the paired [`Invalidation`].
	pub fn invalidate(self) {
		let _ = self.tx.send(());
	}
}

/// Watches an optional invalidation signal on behalf of one simulation.
#[derive(Default)]
pub struct Lifecycle {
	signal: Option<Invalidation>,
	fired: bool,
}

impl Lifecycle {
	/// Watches `signal`; `None` never fires.
	pub fn new(signal: Option<Invalidation>) -> Self {
		Self {
			signal,
			fired: false,
		}
	}

	/// Polls the signal once and stops `simulation` if it has fired. Returns whether the
	/// simulation has been torn down.
	pub fn poll(&mut self, simulation: &mut Simulation) -> bool {
		if !self.fired {
			if let Some(signal) = self.signal.as_mut() {
				let mut cx = Context::from_waker(noop_waker_ref());
				if signal.poll_unpin(&mut cx).is_ready() {
					info!("force graph: invalidated, stopping simulation");
					self.fired = true;
					self.signal = None;
				}
			}
		}
		if self.fired {
			simulation.stop();
		}
		self.fired
	}

	/// Whether the signal has completed.
	pub fn has_fired(&self) -> bool {
		self.fired
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::simulation::{
		ChargeStrength, SimLink, SimNode, SimulationParameters,
	};

	fn simulation() -> Simulation {
		let mut sim = Simulation::new(
			vec![SimNode::new(0, None), SimNode::new(1, None)],
			vec![SimLink {
				index: 0,
				source: 0,
				target: 1,
			}],
			SimulationParameters::default(),
			ChargeStrength::Default,
			None,
		);
		sim.start();
		sim
	}

	#[test]
	fn no_signal_never_stops() {
		let mut sim = simulation();
		let mut lifecycle = Lifecycle::new(None);
		assert!(!lifecycle.poll(&mut sim));
		assert!(sim.is_running());
	}

	#[test]
	fn firing_stops_regardless_of_alpha() {
		let mut sim = simulation();
		sim.set_alpha_target(0.3);
		let (invalidator, signal) = Invalidation::channel();
		let mut lifecycle = Lifecycle::new(Some(signal));
		assert!(!lifecycle.poll(&mut sim));
		invalidator.invalidate();
		assert!(lifecycle.poll(&mut sim));
		assert!(sim.is_stopped());
		assert!(sim.alpha() > sim.params().alpha_min);
	}

	#[test]
	fn dropped_invalidator_never_fires() {
		let mut sim = simulation();
		let (invalidator, signal) = Invalidation::channel();
		let mut lifecycle = Lifecycle::new(Some(signal));
		drop(invalidator);
		assert!(!lifecycle.poll(&mut sim));
		assert!(!lifecycle.poll(&mut sim));
		assert!(sim.is_running());
	}

	#[test]
	fn ready_future_fires_on_first_poll() {
		let mut sim = simulation();
		let mut lifecycle = Lifecycle::new(Some(Invalidation::new(futures::future::ready(()))));
		assert!(lifecycle.poll(&mut sim));
		assert!(lifecycle.has_fired());
	}

	#[test]
	fn invalidation_is_awaitable() {
		let (invalidator, signal) = Invalidation::channel();
		invalidator.invalidate();
		futures::executor::block_on(signal);
	}
}
