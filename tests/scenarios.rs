//! End-to-end graph construction, layout and interaction through the public API.

use mss_graph::components::force_graph::{
	Fill, ForceGraphOptions, ForceGraphState, GraphData, GraphLink, GraphNode, Invalidation, Key,
	Phase, persons_options,
};

fn chain() -> GraphData {
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
fn ungrouped_chain_draws_circles_and_weighted_lines() {
	let graph = ForceGraphState::new(&chain(), ForceGraphOptions::default());
	let scene = graph.scene();
	assert_eq!(scene.circles.len(), 3);
	assert_eq!(scene.lines.len(), 2);
	assert_eq!(scene.lines[0].stroke_width, Some(2.0));
	assert_eq!(scene.lines[1].stroke_width, Some(1.0));
	assert!(scene.gradients.is_empty());
	assert!(graph.color_scale().is_none());
	assert!(scene.circles.iter().all(|c| c.fill == Fill::Inherit));
}

#[test]
fn group_list_synthesizes_one_banded_gradient() {
	let data = GraphData {
		nodes: vec![GraphNode::new("X").with_groups(["alpha", "beta"])],
		links: Vec::new(),
		groups: None,
	};
	let graph = ForceGraphState::new(&data, ForceGraphOptions::default());
	let gradients = &graph.scene().gradients;
	assert_eq!(gradients.len(), 1);
	assert_eq!(gradients[0].id, "alpha_beta");
	let offsets: Vec<f64> = gradients[0].stops.iter().map(|s| s.offset).collect();
	assert_eq!(offsets, [0.0, 50.0, 50.0, 100.0]);
	assert_eq!(gradients[0].stops[0].color, gradients[0].stops[1].color);
	assert_ne!(gradients[0].stops[1].color, gradients[0].stops[2].color);
}

#[test]
fn identical_group_lists_share_a_gradient() {
	let data = GraphData {
		nodes: vec![
			GraphNode::new("P").with_groups(["g1", "g2"]),
			GraphNode::new("Q").with_groups(["g1", "g2"]),
			GraphNode::new("R").with_groups(["g2", "g1"]),
		],
		links: vec![GraphLink::new("P", "Q")],
		groups: None,
	};
	let graph = ForceGraphState::new(&data, ForceGraphOptions::default());
	let scene = graph.scene();
	assert_eq!(scene.gradients.len(), 2);
	assert_eq!(scene.circles[0].fill.to_attr().as_deref(), Some("url(#g1_g2)"));
	assert_eq!(scene.circles[0].fill, scene.circles[1].fill);
	assert_eq!(scene.circles[2].fill.to_attr().as_deref(), Some("url(#g2_g1)"));
}

#[test]
fn radius_grows_with_size() {
	let data = GraphData {
		nodes: vec![
			GraphNode::new("none"),
			GraphNode::new("small").with_size(1.0),
			GraphNode::new("large").with_size(50.0),
		],
		links: Vec::new(),
		groups: None,
	};
	let graph = ForceGraphState::new(&data, ForceGraphOptions::default());
	let radii: Vec<f64> = graph.scene().circles.iter().map(|c| c.r).collect();
	assert_eq!(radii[0], 5.0);
	assert!(radii[0] <= radii[1] && radii[1] <= radii[2]);
}

#[test]
fn links_resolve_to_matching_identities() {
	let mut data = chain();
	data.links.push(GraphLink::new("C", "missing"));
	let graph = ForceGraphState::new(&data, ForceGraphOptions::default());
	let sim = graph.simulation();
	assert_eq!(sim.links().len(), 2);
	assert_eq!(graph.scene().lines.len(), 2);
	assert_eq!(graph.issues().len(), 1);
	for link in sim.links() {
		let source = &sim.nodes()[link.source];
		let target = &sim.nodes()[link.target];
		assert_eq!(source.key, data.nodes[link.source].id.as_str().map(Key::from));
		assert_eq!(target.key, data.nodes[link.target].id.as_str().map(Key::from));
	}
}

#[test]
fn drag_heats_pins_and_releases() {
	let mut graph = ForceGraphState::new(&chain(), ForceGraphOptions::default());
	graph.run(1_000);
	let before = graph.simulation().nodes()[1].clone();

	assert!(graph.drag_start(1));
	assert!(graph.simulation().alpha_target() > 0.0);
	let pinned = &graph.simulation().nodes()[1];
	assert_eq!((pinned.fx, pinned.fy), (Some(before.x), Some(before.y)));

	graph.drag_move(1, 40.0, -25.0);
	assert!(graph.tick());
	let moved = &graph.simulation().nodes()[1];
	assert_eq!((moved.x, moved.y), (40.0, -25.0));
	assert_eq!(graph.scene().circles[1].cx, 40.0);

	assert!(graph.drag_end(1));
	assert_eq!(graph.simulation().alpha_target(), 0.0);
	assert!(!graph.simulation().nodes()[1].is_pinned());
}

#[test]
fn cancellation_freezes_the_layout() {
	let (invalidator, signal) = Invalidation::channel();
	let mut graph = ForceGraphState::new(
		&chain(),
		ForceGraphOptions::default().with_invalidation(signal),
	);
	assert_eq!(graph.run(3), 3);
	let frozen = graph.simulation().nodes().to_vec();
	let svg = graph.to_svg();

	invalidator.invalidate();
	assert_eq!(graph.run(100), 0);
	assert_eq!(graph.phase(), Phase::Stopped);
	assert!(!graph.drag_start(0));
	assert_eq!(graph.simulation().nodes(), &frozen[..]);
	assert_eq!(graph.to_svg(), svg);
}

#[test]
fn dropped_invalidator_never_cancels() {
	let (invalidator, signal) = Invalidation::channel();
	drop(invalidator);
	let mut graph = ForceGraphState::new(
		&chain(),
		ForceGraphOptions::default().with_invalidation(signal),
	);
	assert!(graph.tick());
	assert!(!graph.is_halted());
}

#[test]
fn persons_page_titles_colors_and_serializes() {
	let data = GraphData::from_json(
		r#"{
			"nodes": [
				{"id": "ms1", "group": "manuscript", "roles": "manuscript", "size": 4},
				{"id": 7, "group": "other", "roles": "witness"},
				{"id": "p2", "groups": ["author, editor, translator", "scribe, proofreader, annotator"], "roles": "author, scribe"}
			],
			"links": [
				{"source": "ms1", "target": 7, "value": 9},
				{"source": "ms1", "target": "p2"}
			]
		}"#,
	)
	.unwrap();
	let graph = ForceGraphState::new(&data, persons_options(800.0, 600.0));
	assert!(graph.issues().is_empty());
	assert_eq!(graph.title(1), Some("7 (witness)"));
	assert_eq!(graph.title(2), Some("p2 (author, scribe)"));

	let scale = graph.color_scale().unwrap();
	assert_eq!(scale.domain().count(), 5);
	assert_eq!(scale.domain().next(), Some("manuscript"));

	let svg = graph.to_svg();
	assert!(svg.starts_with("<svg"));
	assert!(svg.contains(r#"viewBox="-400 -300 800 600""#));
	assert_eq!(svg.matches("<circle").count(), 3);
	assert_eq!(svg.matches("<line ").count(), 2);
	assert!(svg.contains(r#"stroke-width="3""#));
	assert!(svg.contains("<desc>7 (witness)</desc>"));
	assert!(svg.contains(
		r#"<linearGradient id="author,_editor,_translator_scribe,_proofreader,_annotator">"#
	));
	assert!(svg.ends_with("</defs></svg>"));
}

#[test]
fn layout_settles_near_the_origin() {
	let mut graph = ForceGraphState::new(&chain(), ForceGraphOptions::default());
	graph.run(10_000);
	assert_eq!(graph.phase(), Phase::Settled);
	for node in graph.simulation().nodes() {
		assert!(node.x.is_finite() && node.y.is_finite());
		assert!(node.x.abs() < 1_000.0 && node.y.abs() < 1_000.0);
	}
}
