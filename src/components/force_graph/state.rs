//! Graph state combining the simulation with its scene, drag tracking and lifecycle.
//!
//! Built once from input records, then driven by the host: [`ForceGraphState::tick`] is the
//! scheduler step (poll invalidation, advance the simulation, refresh the scene) and the
//! `drag_*` methods are gesture callbacks. Everything runs on one thread, so a gesture handled
//! between two ticks is always seen by the next one.

use std::collections::HashMap;

use log::{info, warn};

use super::drag::DragController;
use super::encoding::{self, Encodings};
use super::intern::Key;
use super::lifecycle::Lifecycle;
use super::options::ForceGraphOptions;
use super::scale::ColorScale;
use super::scene::Scene;
use super::simulation::{ChargeStrength, Phase, SimLink, SimNode, Simulation};
use super::types::{GraphData, GraphLink, GraphNode, LinkDatum, NodeDatum};
use crate::error::{Endpoint, GraphError};

/// A built, live force graph.
pub struct ForceGraphState {
	simulation: Simulation,
	scene: Scene,
	drag: DragController,
	lifecycle: Lifecycle,
	color: Option<ColorScale>,
	issues: Vec<GraphError>,
}

impl ForceGraphState {
	/// Builds a graph from [`GraphData`], using the data's group list as the color domain unless
	/// the options already set one.
	pub fn new(data: &GraphData, mut options: ForceGraphOptions<GraphNode, GraphLink>) -> Self {
		if options.group_domain.is_none() {
			options.group_domain = data.groups.clone();
		}
		Self::build(&data.nodes, &data.links, options)
	}

	/// Resolves encodings, interns identities, resolves links to node indices and starts the
	/// simulation. Input records are only read; the graph owns fresh copies of everything it
	/// mutates.
	pub fn build<N: NodeDatum, L: LinkDatum>(
		nodes: &[N],
		links: &[L],
		mut options: ForceGraphOptions<N, L>,
	) -> Self {
		let mut issues = Vec::new();
		let Encodings {
			nodes: node_enc,
			links: link_enc,
			color,
			gradients,
		} = encoding::resolve(nodes, links, &options);

		let mut by_key: HashMap<&Key, usize> = HashMap::with_capacity(node_enc.len());
		for (i, enc) in node_enc.iter().enumerate() {
			match &enc.key {
				Some(key) => {
					if by_key.insert(key, i).is_some() {
						issues.push(GraphError::DuplicateIdentity { key: key.clone() });
					}
				}
				None => issues.push(GraphError::MissingIdentity { node: i }),
			}
		}

		let mut sim_links = Vec::with_capacity(link_enc.len());
		let mut resolved_inputs = Vec::with_capacity(link_enc.len());
		for (i, enc) in link_enc.iter().enumerate() {
			let lookup = |key: &Option<Key>, endpoint: Endpoint| {
				key.as_ref()
					.and_then(|k| by_key.get(k).copied())
					.ok_or_else(|| GraphError::UnresolvedEndpoint {
						link: i,
						endpoint,
						key: key.clone(),
					})
			};
			match (
				lookup(&enc.source, Endpoint::Source),
				lookup(&enc.target, Endpoint::Target),
			) {
				(Ok(source), Ok(target)) => {
					sim_links.push(SimLink {
						index: i,
						source,
						target,
					});
					resolved_inputs.push(i);
				}
				(source, target) => issues.extend(source.err().into_iter().chain(target.err())),
			}
		}

		let charge = match &options.node_strength {
			Some(f) => ChargeStrength::PerNode(
				nodes.iter().enumerate().map(|(i, n)| f(n, i)).collect(),
			),
			None => ChargeStrength::Default,
		};
		let link_strengths = options.link_strength.as_ref().map(|f| {
			resolved_inputs
				.iter()
				.map(|&i| f(&links[i], i))
				.collect::<Vec<_>>()
		});

		let sim_nodes = node_enc
			.iter()
			.enumerate()
			.map(|(i, enc)| SimNode::new(i, enc.key.clone()))
			.collect();
		let mut simulation = Simulation::new(
			sim_nodes,
			sim_links,
			options.simulation.clone(),
			charge,
			link_strengths,
		);

		let encodings = Encodings {
			nodes: node_enc,
			links: link_enc,
			color,
			gradients,
		};
		let scene = Scene::new(
			&simulation,
			&encodings,
			&options.theme,
			options.default_link_width(),
			options.width,
			options.height,
		);

		for issue in &issues {
			warn!("force graph: {issue}");
		}
		info!(
			"force graph: built {} nodes, {} of {} links, {} gradients",
			simulation.nodes().len(),
			simulation.links().len(),
			encodings.links.len(),
			scene.gradients.len()
		);

		simulation.start();
		Self {
			simulation,
			scene,
			drag: DragController::default(),
			lifecycle: Lifecycle::new(options.invalidation.take()),
			color: encodings.color,
			issues,
		}
	}

	/// One scheduler step. Returns whether the scene changed.
	pub fn tick(&mut self) -> bool {
		if self.lifecycle.poll(&mut self.simulation) {
			return false;
		}
		if !self.simulation.step() {
			return false;
		}
		self.scene.update(&self.simulation);
		true
	}

	/// Runs ticks until the simulation settles or stops, at most `max_ticks`. Returns the
	/// number of ticks run.
	pub fn run(&mut self, max_ticks: usize) -> usize {
		let mut ticks = 0;
		while ticks < max_ticks && self.tick() {
			ticks += 1;
		}
		ticks
	}

	/// Begins dragging `node`. Returns `false` if the gesture was ignored.
	///
	/// Every gesture polls the invalidation signal first, so a gesture arriving after
	/// invalidation but before the next tick is already ignored.
	pub fn drag_start(&mut self, node: usize) -> bool {
		if self.lifecycle.poll(&mut self.simulation) {
			return false;
		}
		self.drag.start(&mut self.simulation, node)
	}

	/// Moves a dragged node to `(x, y)` in graph coordinates.
	pub fn drag_move(&mut self, node: usize, x: f64, y: f64) -> bool {
		if self.lifecycle.poll(&mut self.simulation) {
			return false;
		}
		self.drag.drag(&mut self.simulation, node, x, y)
	}

	/// Releases a dragged node.
	pub fn drag_end(&mut self, node: usize) -> bool {
		if self.lifecycle.poll(&mut self.simulation) {
			return false;
		}
		self.drag.end(&mut self.simulation, node)
	}

	/// The underlying simulation.
	pub fn simulation(&self) -> &Simulation {
		&self.simulation
	}

	/// The scene as of the last tick.
	pub fn scene(&self) -> &Scene {
		&self.scene
	}

	/// Group colors for legends; `None` when the graph has no groups.
	pub fn color_scale(&self) -> Option<&ColorScale> {
		self.color.as_ref()
	}

	/// Data problems found while building.
	pub fn issues(&self) -> &[GraphError] {
		&self.issues
	}

	/// Title of a rendered node, as written into its description.
	pub fn title(&self, node: usize) -> Option<&str> {
		self.scene.circles.get(node)?.desc.as_deref()
	}

	/// Phase of the simulation.
	pub fn phase(&self) -> Phase {
		self.simulation.phase()
	}

	/// Whether the simulation has been torn down.
	pub fn is_halted(&self) -> bool {
		self.simulation.is_stopped()
	}

	/// Serializes the current scene as SVG.
	pub fn to_svg(&self) -> String {
		self.scene.to_svg()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::lifecycle::Invalidation;

	fn data() -> GraphData {
		GraphData {
			nodes: vec![GraphNode::new("A"), GraphNode::new("B"), GraphNode::new("C")],
			links: vec![
				GraphLink::new("A", "B").with_value(4.0),
				GraphLink::new("B", "C").with_value(1.0),
			],
			groups: None,
		}
	}

	#[test]
	fn links_resolve_to_node_indices() {
		let graph = ForceGraphState::new(&data(), ForceGraphOptions::default());
		let links = graph.simulation().links();
		assert_eq!((links[0].source, links[0].target), (0, 1));
		assert_eq!((links[1].source, links[1].target), (1, 2));
		assert!(graph.issues().is_empty());
	}

	#[test]
	fn unresolved_links_are_reported_and_not_drawn() {
		let mut data = data();
		data.links.push(GraphLink::new("C", "Z"));
		data.links.push(GraphLink::new("Y", "Z"));
		let graph = ForceGraphState::new(&data, ForceGraphOptions::default());
		assert_eq!(graph.simulation().links().len(), 2);
		assert_eq!(graph.scene().lines.len(), 2);
		assert_eq!(graph.issues().len(), 3);
		assert!(matches!(
			graph.issues()[0],
			GraphError::UnresolvedEndpoint {
				link: 2,
				endpoint: Endpoint::Target,
				..
			}
		));
	}

	#[test]
	fn duplicate_and_missing_identities_are_reported() {
		let mut data = data();
		data.nodes.push(GraphNode::new("A"));
		data.nodes.push(GraphNode::default());
		data.links.push(GraphLink::new("A", "C"));
		let graph = ForceGraphState::new(&data, ForceGraphOptions::default());
		assert_eq!(graph.issues().len(), 2);
		assert_eq!(graph.scene().circles.len(), 5);
		// The last node with a duplicated identity wins.
		assert_eq!(graph.simulation().links()[2].source, 3);
	}

	#[test]
	fn ticks_move_the_scene_with_the_simulation() {
		let mut graph = ForceGraphState::new(&data(), ForceGraphOptions::default());
		assert!(graph.tick());
		let sim = graph.simulation().nodes().to_vec();
		let scene = graph.scene();
		for (circle, node) in scene.circles.iter().zip(&sim) {
			assert_eq!((circle.cx, circle.cy), (node.x, node.y));
		}
		let line = &scene.lines[1];
		assert_eq!((line.x1, line.y1), (sim[1].x, sim[1].y));
		assert_eq!((line.x2, line.y2), (sim[2].x, sim[2].y));
		assert_eq!(scene.ticks(), 1);
	}

	#[test]
	fn run_stops_when_settled() {
		let mut graph = ForceGraphState::new(&data(), ForceGraphOptions::default());
		let ticks = graph.run(10_000);
		assert!(ticks > 0 && ticks < 10_000);
		assert_eq!(graph.phase(), Phase::Settled);
		assert!(!graph.tick());
	}

	#[test]
	fn explicit_strengths_reach_the_simulation() {
		let options = ForceGraphOptions::default()
			.with_node_strength(|_, _| -30.0)
			.with_link_strength(|_, _| 0.25);
		let graph = ForceGraphState::new(&data(), options);
		assert_eq!(graph.simulation().charge_strength(0), Some(-30.0));
		assert_eq!(graph.simulation().link_strength(1), Some(0.25));
	}

	#[test]
	fn invalidation_freezes_positions() {
		let (invalidator, signal) = Invalidation::channel();
		let mut graph =
			ForceGraphState::new(&data(), ForceGraphOptions::default().with_invalidation(signal));
		graph.run(5);
		invalidator.invalidate();
		let frozen = graph.simulation().nodes().to_vec();
		assert!(!graph.drag_start(0));
		assert!(graph.is_halted());
		assert_eq!(graph.simulation().alpha_target(), 0.0);
		assert!(!graph.simulation().nodes()[0].is_pinned());
		assert!(!graph.tick());
		assert!(!graph.drag_move(0, 1.0, 1.0));
		assert!(!graph.drag_end(0));
		for _ in 0..10 {
			assert!(!graph.tick());
		}
		assert_eq!(graph.simulation().nodes(), &frozen[..]);
		assert_eq!(graph.scene().ticks(), 5);
	}

	#[test]
	fn gestures_between_invalidation_and_tick_are_ignored() {
		let (invalidator, signal) = Invalidation::channel();
		let mut graph =
			ForceGraphState::new(&data(), ForceGraphOptions::default().with_invalidation(signal));
		assert!(graph.drag_start(1));
		invalidator.invalidate();
		assert!(!graph.drag_move(1, 10.0, 10.0));
		assert!(!graph.drag_end(1));
		assert!(!graph.drag_start(2));
		assert!(graph.is_halted());
		assert!(!graph.simulation().nodes()[2].is_pinned());
		assert_ne!(graph.simulation().nodes()[1].fx, Some(10.0));
	}

	#[test]
	fn data_groups_become_the_color_domain() {
		let mut data = data();
		data.nodes[0].group = Some("second".into());
		data.groups = Some(vec!["first".into(), "second".into()]);
		let graph = ForceGraphState::new(&data, ForceGraphOptions::default());
		let scale = graph.color_scale().unwrap();
		assert_eq!(scale.domain().collect::<Vec<_>>(), ["first", "second"]);
		assert_eq!(graph.scene().circles[0].fill.to_attr().as_deref(), Some("#f28e2c"));
	}
}
