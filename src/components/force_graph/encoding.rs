//! Resolution of per-node and per-link visual encodings.
//!
//! Runs once when a graph is built: identities, radii, fills, titles and link widths are
//! computed here so the per-tick path only touches geometry.

use log::debug;

use super::gradient::GradientCache;
use super::intern::Key;
use super::options::ForceGraphOptions;
use super::scale::ColorScale;
use super::types::{LinkDatum, NodeDatum};

/// Fill of a single node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Fill {
	/// No per-node fill; the node group's fill applies.
	Inherit,
	/// A literal color.
	Color(String),
	/// Reference to a gradient definition by id.
	Gradient(String),
}

impl Fill {
	/// Attribute value for the node's `fill`, if it sets one.
	pub fn to_attr(&self) -> Option<String> {
		match self {
			Fill::Inherit => None,
			Fill::Color(c) => Some(c.clone()),
			Fill::Gradient(id) => Some(format!("url(#{id})")),
		}
	}
}

/// Resolved static attributes of one node.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeEncoding {
	/// Interned identity.
	pub key: Option<Key>,
	/// Circle radius.
	pub radius: f64,
	/// Per-node fill.
	pub fill: Fill,
	/// Tooltip text.
	pub title: Option<String>,
}

/// Resolved endpoints and width of one input link.
#[derive(Clone, Debug, PartialEq)]
pub struct LinkEncoding {
	/// Identity of the source node.
	pub source: Option<Key>,
	/// Identity of the target node.
	pub target: Option<Key>,
	/// Per-link width; `None` inherits the link group's width.
	pub stroke_width: Option<f64>,
}

/// Everything the scene needs besides positions.
#[derive(Clone, Debug)]
pub struct Encodings {
	/// One entry per input node.
	pub nodes: Vec<NodeEncoding>,
	/// One entry per input link, resolved or not.
	pub links: Vec<LinkEncoding>,
	/// Present only when group colors are in play.
	pub color: Option<ColorScale>,
	/// Gradients synthesized for group lists.
	pub gradients: GradientCache,
}

/// Resolves encodings for every node and link.
///
/// Group colors are used when a group accessor is configured or any node declares a group or
/// a group list. In that mode a single group maps through the color scale, a group list maps to
/// a shared banded gradient, and a node with neither gets the theme's ungrouped fill.
pub fn resolve<N: NodeDatum, L: LinkDatum>(
	nodes: &[N],
	links: &[L],
	options: &ForceGraphOptions<N, L>,
) -> Encodings {
	let groups: Vec<Option<String>> = nodes
		.iter()
		.enumerate()
		.map(|(i, n)| options.node_group_of(n, i))
		.collect();
	let group_lists: Vec<Option<Vec<String>>> = nodes
		.iter()
		.enumerate()
		.map(|(i, n)| options.node_groups_of(n, i))
		.collect();

	let grouped = options.node_group.is_some()
		|| groups.iter().any(Option::is_some)
		|| group_lists.iter().any(Option::is_some);

	let mut color = grouped.then(|| match &options.group_domain {
		Some(domain) => ColorScale::new(domain.iter().cloned(), options.colors.clone()),
		None => ColorScale::from_observed(
			groups.iter().flatten().map(String::as_str),
			options.colors.clone(),
		),
	});
	let mut gradients = GradientCache::default();

	let nodes = nodes
		.iter()
		.enumerate()
		.map(|(i, node)| {
			let key = options.node_key(node, i);
			let fill = match color.as_mut() {
				None => Fill::Inherit,
				Some(scale) => match (&groups[i], &group_lists[i]) {
					(Some(group), _) => Fill::Color(scale.color(group)),
					(None, Some(list)) => {
						Fill::Gradient(gradients.get_or_insert(list, scale).id.clone())
					}
					(None, None) => Fill::Color(options.theme.node.ungrouped_fill.clone()),
				},
			};
			NodeEncoding {
				title: options.node_title_of(node, i, key.as_ref()),
				radius: options.node_radius_of(node, i),
				key,
				fill,
			}
		})
		.collect();

	let links = links
		.iter()
		.enumerate()
		.map(|(i, link)| LinkEncoding {
			source: options.link_source_of(link, i),
			target: options.link_target_of(link, i),
			stroke_width: options.link_width_of(link, i),
		})
		.collect();

	debug!(
		"encoding: {} groups, {} gradients",
		color.as_ref().map_or(0, ColorScale::len),
		gradients.len()
	);

	Encodings {
		nodes,
		links,
		color,
		gradients,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::types::{GraphLink, GraphNode};

	type Options = ForceGraphOptions<GraphNode, GraphLink>;

	#[test]
	fn ungrouped_graphs_inherit_the_group_fill() {
		let nodes = [GraphNode::new("A"), GraphNode::new("B").with_size(10.0)];
		let enc = resolve(&nodes, &[] as &[GraphLink], &Options::default());
		assert!(enc.color.is_none());
		assert!(enc.gradients.is_empty());
		assert!(enc.nodes.iter().all(|n| n.fill == Fill::Inherit));
		assert_eq!(enc.nodes[0].radius, 5.0);
		assert_eq!(enc.nodes[1].radius, 9.0);
		assert_eq!(enc.nodes[1].title.as_deref(), Some("B"));
	}

	#[test]
	fn grouped_graphs_color_by_group_with_black_fallback() {
		let nodes = [
			GraphNode::new("A").with_group("b"),
			GraphNode::new("B").with_group("a"),
			GraphNode::new("C"),
		];
		let options = Options::default().with_colors(vec!["#111".into(), "#222".into()]);
		let enc = resolve(&nodes, &[] as &[GraphLink], &options);
		assert_eq!(enc.nodes[0].fill, Fill::Color("#222".into()));
		assert_eq!(enc.nodes[1].fill, Fill::Color("#111".into()));
		assert_eq!(enc.nodes[2].fill, Fill::Color("#000".into()));
	}

	#[test]
	fn single_group_wins_over_group_list() {
		let nodes = [GraphNode::new("A").with_group("x").with_groups(["y", "z"])];
		let enc = resolve(&nodes, &[] as &[GraphLink], &Options::default());
		assert!(matches!(enc.nodes[0].fill, Fill::Color(_)));
		assert!(enc.gradients.is_empty());
	}

	#[test]
	fn group_lists_share_gradients() {
		let nodes = [
			GraphNode::new("A").with_groups(["g1", "g2"]),
			GraphNode::new("B").with_groups(["g1", "g2"]),
			GraphNode::new("C").with_groups(["g2", "g 3"]),
		];
		let enc = resolve(&nodes, &[] as &[GraphLink], &Options::default());
		assert_eq!(enc.gradients.len(), 2);
		assert_eq!(enc.nodes[0].fill, Fill::Gradient("g1_g2".into()));
		assert_eq!(enc.nodes[0].fill, enc.nodes[1].fill);
		assert_eq!(enc.nodes[2].fill.to_attr().as_deref(), Some("url(#g2_g_3)"));
	}

	#[test]
	fn explicit_domain_orders_colors() {
		let nodes = [GraphNode::new("A").with_group("other")];
		let options = Options::default()
			.with_group_domain(["manuscript", "other"])
			.with_colors(vec!["#111".into(), "#222".into()]);
		let enc = resolve(&nodes, &[] as &[GraphLink], &options);
		assert_eq!(enc.nodes[0].fill, Fill::Color("#222".into()));
		let scale = enc.color.unwrap();
		assert_eq!(scale.domain().collect::<Vec<_>>(), ["manuscript", "other"]);
	}

	#[test]
	fn links_resolve_keys_and_widths() {
		let links = [GraphLink::new("A", "B").with_value(9.0), GraphLink::new("B", "C")];
		let enc = resolve(&[] as &[GraphNode], &links, &Options::default());
		assert_eq!(enc.links[0].source, Some(Key::from("A")));
		assert_eq!(enc.links[0].stroke_width, Some(3.0));
		assert_eq!(enc.links[1].stroke_width, None);
	}
}
