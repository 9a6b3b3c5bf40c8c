//! Force simulation engine.
//!
//! Owns every node's physical state (position, velocity, pinned position) and the simulation
//! clock. Each [`Simulation::step`] decays `alpha` toward `alpha_target`, accumulates forces into
//! velocities, and integrates velocities into positions. Pinned nodes are held at their pinned
//! position with zero velocity while the other nodes keep reacting to them.

use log::{debug, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;

use super::forces::{Centering, LinkForce, ManyBody};
use super::intern::Key;

/// Tuning constants for the simulation.
#[derive(Clone, Debug)]
pub struct SimulationParameters {
	/// The simulation settles once alpha falls below this.
	pub alpha_min: f64,
	/// Fraction of the gap to `alpha_target` closed each tick.
	pub alpha_decay: f64,
	/// Fraction of velocity lost each tick (friction).
	pub velocity_decay: f64,
	/// Rest length of link springs.
	pub link_distance: f64,
	/// Strength of the pull toward the origin on each axis.
	pub center_strength: f64,
	/// Alpha target held while at least one node is being dragged.
	pub drag_alpha_target: f64,
	/// Charge of the first node when no node strength is configured.
	///
	/// The stronger anchor charge is a tuning heuristic that spreads the neighbourhood of the
	/// first input node; nothing else depends on it.
	pub anchor_charge: f64,
	/// Charge of all other nodes when no node strength is configured.
	pub charge: f64,
	/// Repulsion distance band used with the default charges.
	pub charge_distance_min: f64,
	/// Pairs farther apart than this do not repel.
	pub charge_distance_max: f64,
}

impl Default for SimulationParameters {
	fn default() -> Self {
		Self {
			alpha_min: 0.001,
			alpha_decay: 1.0 - 0.001_f64.powf(1.0 / 300.0),
			velocity_decay: 0.4,
			link_distance: 30.0,
			center_strength: 0.1,
			drag_alpha_target: 0.3,
			anchor_charge: -1200.0,
			charge: -1000.0,
			charge_distance_min: 70.0,
			charge_distance_max: 170.0,
		}
	}
}

/// Per-node physical state.
#[derive(Clone, Debug, PartialEq)]
pub struct SimNode {
	/// Position in the node arena.
	pub index: usize,
	/// Interned identity; `None` for nodes no link can reference.
	pub key: Option<Key>,
	/// Horizontal position.
	pub x: f64,
	/// Vertical position.
	pub y: f64,
	/// Horizontal velocity.
	pub vx: f64,
	/// Vertical velocity.
	pub vy: f64,
	/// Pinned position. Physics is bypassed on an axis while it is set.
	pub fx: Option<f64>,
	/// Pinned vertical position.
	pub fy: Option<f64>,
}

impl SimNode {
	/// A node with no position yet; one is seeded when the simulation is built.
	pub fn new(index: usize, key: Option<Key>) -> Self {
		Self {
			index,
			key,
			x: f64::NAN,
			y: f64::NAN,
			vx: 0.0,
			vy: 0.0,
			fx: None,
			fy: None,
		}
	}

	/// Whether either axis is pinned.
	pub fn is_pinned(&self) -> bool {
		self.fx.is_some() || self.fy.is_some()
	}
}

/// A link resolved to node indices.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimLink {
	/// Position of the link in the input collection.
	pub index: usize,
	/// Index of the source node.
	pub source: usize,
	/// Index of the target node.
	pub target: usize,
}

/// Lifecycle of the tick loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
	/// Forces attached, positions seeded, no tick run yet.
	Initializing,
	/// Ticks advance on every step.
	Running,
	/// Alpha fell below `alpha_min`; a drag may restart it.
	Settled,
	/// Halted for good; steps and restarts are ignored.
	Stopped,
}

/// How node charges are chosen.
#[derive(Clone, Debug)]
pub enum ChargeStrength {
	/// Anchor/other charges and distance band from [`SimulationParameters`].
	Default,
	/// Explicit per-node charges with an unbounded band.
	PerNode(Vec<f64>),
}

/// The force simulation for one graph.
#[derive(Clone, Debug)]
pub struct Simulation {
	nodes: Vec<SimNode>,
	links: Vec<SimLink>,
	alpha: f64,
	alpha_target: f64,
	params: SimulationParameters,
	link_force: LinkForce,
	charge: ManyBody,
	center: Centering,
	random: StdRng,
	phase: Phase,
}

impl Simulation {
	/// Seeds unset positions on a phyllotaxis spiral and attaches the forces.
	///
	/// Links with an endpoint outside the node arena are dropped. `link_strengths` is ignored
	/// unless it has one entry per given link.
	pub fn new(
		mut nodes: Vec<SimNode>,
		links: Vec<SimLink>,
		params: SimulationParameters,
		charge: ChargeStrength,
		link_strengths: Option<Vec<f64>>,
	) -> Self {
		initialize_positions(&mut nodes);
		let (links, link_strengths) = validate_links(nodes.len(), links, link_strengths);

		let charge = match charge {
			ChargeStrength::Default => ManyBody::new(
				(0..nodes.len())
					.map(|i| {
						if i == 0 {
							params.anchor_charge
						} else {
							params.charge
						}
					})
					.collect(),
				params.charge_distance_min,
				params.charge_distance_max,
			),
			ChargeStrength::PerNode(strengths) => ManyBody::new(strengths, 1.0, f64::INFINITY),
		};
		let link_force = LinkForce::new(nodes.len(), &links, params.link_distance, link_strengths);
		let center = Centering::new(params.center_strength);

		Self {
			nodes,
			links,
			alpha: 1.0,
			alpha_target: 0.0,
			params,
			link_force,
			charge,
			center,
			random: StdRng::seed_from_u64(1),
			phase: Phase::Initializing,
		}
	}

	/// Starts the tick loop.
	pub fn start(&mut self) {
		if self.phase == Phase::Initializing {
			debug!("simulation: running {} nodes, {} links", self.nodes.len(), self.links.len());
			self.phase = Phase::Running;
		}
	}

	/// Resumes ticking after settling. Returns `false` once stopped.
	pub fn restart(&mut self) -> bool {
		match self.phase {
			Phase::Stopped => false,
			Phase::Running => true,
			Phase::Initializing | Phase::Settled => {
				debug!("simulation: restarted at alpha {:.4}", self.alpha);
				self.phase = Phase::Running;
				true
			}
		}
	}

	/// Halts the tick loop for good, whatever the current alpha.
	pub fn stop(&mut self) {
		if self.phase != Phase::Stopped {
			debug!("simulation: stopped at alpha {:.4}", self.alpha);
			self.phase = Phase::Stopped;
		}
	}

	/// Advances one tick if running. Returns whether positions changed.
	pub fn step(&mut self) -> bool {
		if self.phase != Phase::Running {
			return false;
		}
		self.tick();
		if self.alpha < self.params.alpha_min {
			debug!("simulation: settled");
			self.phase = Phase::Settled;
		}
		true
	}

	fn tick(&mut self) {
		self.alpha += (self.alpha_target - self.alpha) * self.params.alpha_decay;
		let alpha = self.alpha;

		self.link_force
			.apply(&mut self.nodes, &self.links, alpha, &mut self.random);
		self.charge.apply(&mut self.nodes, alpha, &mut self.random);
		self.center.apply(&mut self.nodes, alpha);

		let retain = 1.0 - self.params.velocity_decay;
		for node in &mut self.nodes {
			match node.fx {
				Some(fx) => {
					node.x = fx;
					node.vx = 0.0;
				}
				None => {
					node.vx *= retain;
					node.x += node.vx;
				}
			}
			match node.fy {
				Some(fy) => {
					node.y = fy;
					node.vy = 0.0;
				}
				None => {
					node.vy *= retain;
					node.y += node.vy;
				}
			}
		}
	}

	/// Fixes a node at `(x, y)` until [`Simulation::unpin`].
	pub fn pin(&mut self, node: usize, x: f64, y: f64) {
		if let Some(n) = self.nodes.get_mut(node) {
			n.fx = Some(x);
			n.fy = Some(y);
		}
	}

	/// Releases a pinned node.
	pub fn unpin(&mut self, node: usize) {
		if let Some(n) = self.nodes.get_mut(node) {
			n.fx = None;
			n.fy = None;
		}
	}

	/// All nodes, in input order.
	pub fn nodes(&self) -> &[SimNode] {
		&self.nodes
	}

	/// Node at `index`, if any.
	pub fn node(&self, index: usize) -> Option<&SimNode> {
		self.nodes.get(index)
	}

	/// Links that survived validation.
	pub fn links(&self) -> &[SimLink] {
		&self.links
	}

	/// Endpoints of a link as `(x1, y1, x2, y2)`.
	pub fn link_endpoints(&self, link: usize) -> Option<(f64, f64, f64, f64)> {
		let link = self.links.get(link)?;
		let (s, t) = (self.nodes.get(link.source)?, self.nodes.get(link.target)?);
		Some((s.x, s.y, t.x, t.y))
	}

	/// Current simulation heat.
	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	/// Value alpha decays toward.
	pub fn alpha_target(&self) -> f64 {
		self.alpha_target
	}

	/// Changes the value alpha decays toward. Does not restart a settled simulation.
	pub fn set_alpha_target(&mut self, alpha_target: f64) {
		self.alpha_target = alpha_target;
	}

	/// Tuning constants in use.
	pub fn params(&self) -> &SimulationParameters {
		&self.params
	}

	/// Charge of `node`.
	pub fn charge_strength(&self, node: usize) -> Option<f64> {
		self.charge.strengths.get(node).copied()
	}

	/// Minimum and maximum distance over which charges act.
	pub fn charge_distance_band(&self) -> (f64, f64) {
		self.charge.distance_band()
	}

	/// Spring strength of `link`.
	pub fn link_strength(&self, link: usize) -> Option<f64> {
		self.link_force.strength(link)
	}

	/// Where the tick loop is in its lifecycle.
	pub fn phase(&self) -> Phase {
		self.phase
	}

	/// Whether steps currently advance the layout.
	pub fn is_running(&self) -> bool {
		self.phase == Phase::Running
	}

	/// Whether the simulation has been halted for good.
	pub fn is_stopped(&self) -> bool {
		self.phase == Phase::Stopped
	}
}

/// Keeps links whose endpoints index into `0..node_count`, along with their strengths.
fn validate_links(
	node_count: usize,
	links: Vec<SimLink>,
	strengths: Option<Vec<f64>>,
) -> (Vec<SimLink>, Option<Vec<f64>>) {
	let strengths = match strengths {
		Some(s) if s.len() != links.len() => {
			warn!(
				"simulation: {} link strengths for {} links, using degree defaults",
				s.len(),
				links.len()
			);
			None
		}
		s => s,
	};
	let mut kept = Vec::with_capacity(links.len());
	let mut kept_strengths = strengths.as_ref().map(|s| Vec::with_capacity(s.len()));
	for (i, link) in links.into_iter().enumerate() {
		if link.source >= node_count || link.target >= node_count {
			warn!(
				"simulation: dropping link {} ({} -> {}) outside {} nodes",
				link.index, link.source, link.target, node_count
			);
			continue;
		}
		if let (Some(kept_strengths), Some(strengths)) = (kept_strengths.as_mut(), &strengths) {
			kept_strengths.push(strengths[i]);
		}
		kept.push(link);
	}
	(kept, kept_strengths)
}

/// Places nodes without a position on a sunflower spiral around the origin; pinned nodes start
/// at their pin.
fn initialize_positions(nodes: &mut [SimNode]) {
	const INITIAL_RADIUS: f64 = 10.0;
	let initial_angle = std::f64::consts::PI * (3.0 - 5.0_f64.sqrt());

	for (i, node) in nodes.iter_mut().enumerate() {
		node.index = i;
		if let Some(fx) = node.fx {
			node.x = fx;
		}
		if let Some(fy) = node.fy {
			node.y = fy;
		}
		if node.x.is_nan() || node.y.is_nan() {
			let radius = INITIAL_RADIUS * (0.5 + i as f64).sqrt();
			let angle = i as f64 * initial_angle;
			node.x = radius * angle.cos();
			node.y = radius * angle.sin();
		}
		if node.vx.is_nan() || node.vy.is_nan() {
			node.vx = 0.0;
			node.vy = 0.0;
		}
	}
}
