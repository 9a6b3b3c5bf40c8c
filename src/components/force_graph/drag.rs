//! Node dragging.
//!
//! A drag pins its node and keeps the simulation warm. The alpha target is raised when the
//! first concurrent drag starts and lowered when the last one ends, so overlapping drags on
//! different nodes never cool the layout early. All handlers ignore a stopped simulation.

use std::collections::BTreeSet;

use log::debug;

use super::simulation::Simulation;

/// Tracks in-progress node drags.
#[derive(Clone, Debug, Default)]
pub struct DragController {
	active: BTreeSet<usize>,
}

impl DragController {
	/// Begins dragging `node`. Returns `false` if the gesture was ignored.
	pub fn start(&mut self, simulation: &mut Simulation, node: usize) -> bool {
		if simulation.is_stopped() || self.active.contains(&node) {
			return false;
		}
		let Some((x, y)) = simulation.node(node).map(|n| (n.x, n.y)) else {
			return false;
		};
		if self.active.is_empty() {
			let target = simulation.params().drag_alpha_target;
			simulation.set_alpha_target(target);
			simulation.restart();
		}
		self.active.insert(node);
		simulation.pin(node, x, y);
		debug!("drag: start node {node} at ({x:.1}, {y:.1})");
		true
	}

	/// Moves the pin of a dragged node to the pointer.
	pub fn drag(&mut self, simulation: &mut Simulation, node: usize, x: f64, y: f64) -> bool {
		if simulation.is_stopped() || !self.active.contains(&node) {
			return false;
		}
		simulation.pin(node, x, y);
		true
	}

	/// Releases `node`, letting it move freely again.
	pub fn end(&mut self, simulation: &mut Simulation, node: usize) -> bool {
		if !self.active.remove(&node) || simulation.is_stopped() {
			return false;
		}
		if self.active.is_empty() {
			simulation.set_alpha_target(0.0);
		}
		simulation.unpin(node);
		debug!("drag: end node {node}");
		true
	}

	/// Number of drags in progress.
	pub fn active(&self) -> usize {
		self.active.len()
	}
}
