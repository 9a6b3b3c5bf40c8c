//! Configuration for building a force graph.
//!
//! Every field is optional in spirit: accessors left as `None` fall back to the record's
//! [`NodeDatum`] / [`LinkDatum`] methods, and constants default to the [`Theme`] and
//! [`SimulationParameters`] defaults.

use super::intern::Key;
use super::lifecycle::Invalidation;
use super::simulation::SimulationParameters;
use super::theme::Theme;
use super::types::{GraphLink, GraphNode, LinkDatum, NodeDatum};

/// Reads a value of type `T` from a node record and its input position.
pub type NodeAccessor<N, T> = Box<dyn Fn(&N, usize) -> T>;

/// Reads a value of type `T` from a link record and its input position.
pub type LinkAccessor<L, T> = Box<dyn Fn(&L, usize) -> T>;

/// Radius of a node with the given size metric: 5 without one, `7 + 0.2 · size` otherwise.
///
/// Non-positive and non-finite sizes count as absent, which keeps the radius non-negative and
/// non-decreasing in `size`.
pub fn radius_for_size(size: Option<f64>) -> f64 {
	match size {
		Some(s) if s.is_finite() && s > 0.0 => 7.0 + 0.2 * s,
		_ => 5.0,
	}
}

/// How node radii are chosen.
pub enum NodeRadius<N> {
	/// Same radius for every node.
	Fixed(f64),
	/// Radius from [`radius_for_size`] applied to the record's size metric.
	BySize,
	/// Radius from an accessor.
	PerNode(NodeAccessor<N, f64>),
}

/// How link stroke widths are chosen.
pub enum LinkWidth<L> {
	/// Same width for every link, written once on the link group.
	Fixed(f64),
	/// `sqrt(value)` for links carrying a value; the group width for the rest.
	SqrtValue,
	/// Width from an accessor.
	PerLink(LinkAccessor<L, f64>),
}

/// Options for [`ForceGraphState::build`](super::ForceGraphState::build).
pub struct ForceGraphOptions<N, L> {
	/// Identity; defaults to [`NodeDatum::id`].
	pub node_id: Option<NodeAccessor<N, Option<Key>>>,
	/// Single group; defaults to [`NodeDatum::group`].
	pub node_group: Option<NodeAccessor<N, Option<String>>>,
	/// Group list; defaults to [`NodeDatum::groups`].
	pub node_groups: Option<NodeAccessor<N, Option<Vec<String>>>>,
	/// Explicit color domain, in legend order.
	pub group_domain: Option<Vec<String>>,
	/// Tooltip text; defaults to the title field, then the identity.
	pub node_title: Option<NodeAccessor<N, String>>,
	/// Circle radius policy.
	pub node_radius: NodeRadius<N>,
	/// Per-node charge; replaces the anchor/other default and its distance band.
	pub node_strength: Option<NodeAccessor<N, f64>>,
	/// Source identity; defaults to [`LinkDatum::source`].
	pub link_source: Option<LinkAccessor<L, Option<Key>>>,
	/// Target identity; defaults to [`LinkDatum::target`].
	pub link_target: Option<LinkAccessor<L, Option<Key>>>,
	/// Link width policy.
	pub link_width: LinkWidth<L>,
	/// Spring strength; degree-based when unset.
	pub link_strength: Option<LinkAccessor<L, f64>>,
	/// Group colors, cycled when there are more groups than colors.
	pub colors: Vec<String>,
	/// Scene width.
	pub width: f64,
	/// Scene height.
	pub height: f64,
	/// Static styles.
	pub theme: Theme,
	/// Simulation tuning.
	pub simulation: SimulationParameters,
	/// Stops the simulation when it completes.
	pub invalidation: Option<Invalidation>,
}

impl<N, L> Default for ForceGraphOptions<N, L> {
	fn default() -> Self {
		let theme = Theme::default();
		Self {
			node_id: None,
			node_group: None,
			node_groups: None,
			group_domain: None,
			node_title: None,
			node_radius: NodeRadius::BySize,
			node_strength: None,
			link_source: None,
			link_target: None,
			link_width: LinkWidth::SqrtValue,
			link_strength: None,
			colors: theme.palette.to_css(),
			width: 640.0,
			height: 400.0,
			theme,
			simulation: SimulationParameters::default(),
			invalidation: None,
		}
	}
}

impl<N: NodeDatum, L: LinkDatum> ForceGraphOptions<N, L> {
	/// Identity of `node`.
	pub fn node_key(&self, node: &N, index: usize) -> Option<Key> {
		match &self.node_id {
			Some(f) => f(node, index),
			None => node.id(),
		}
	}

	/// Single group, with empty strings treated as no group.
	pub fn node_group_of(&self, node: &N, index: usize) -> Option<String> {
		let group = match &self.node_group {
			Some(f) => f(node, index),
			None => node.group().map(str::to_string),
		};
		group.filter(|g| !g.is_empty())
	}

	/// Group list, with empty lists treated as no list.
	pub fn node_groups_of(&self, node: &N, index: usize) -> Option<Vec<String>> {
		let groups = match &self.node_groups {
			Some(f) => f(node, index),
			None => node.groups().map(<[String]>::to_vec),
		};
		groups.filter(|g| !g.is_empty())
	}

	/// Tooltip text of `node`, falling back to its identity.
	pub fn node_title_of(&self, node: &N, index: usize, key: Option<&Key>) -> Option<String> {
		match &self.node_title {
			Some(f) => Some(f(node, index)),
			None => node.title().or_else(|| key.map(Key::to_string)),
		}
	}

	/// Circle radius of `node`.
	pub fn node_radius_of(&self, node: &N, index: usize) -> f64 {
		match &self.node_radius {
			NodeRadius::Fixed(r) => *r,
			NodeRadius::BySize => radius_for_size(node.size()),
			NodeRadius::PerNode(f) => f(node, index).max(0.0),
		}
	}

	/// Source identity of `link`.
	pub fn link_source_of(&self, link: &L, index: usize) -> Option<Key> {
		match &self.link_source {
			Some(f) => f(link, index),
			None => link.source(),
		}
	}

	/// Target identity of `link`.
	pub fn link_target_of(&self, link: &L, index: usize) -> Option<Key> {
		match &self.link_target {
			Some(f) => f(link, index),
			None => link.target(),
		}
	}

	/// Per-link width override; `None` inherits the group width.
	pub fn link_width_of(&self, link: &L, index: usize) -> Option<f64> {
		match &self.link_width {
			LinkWidth::Fixed(_) => None,
			LinkWidth::SqrtValue => link.value().filter(|v| *v >= 0.0).map(f64::sqrt),
			LinkWidth::PerLink(f) => Some(f(link, index)),
		}
	}

	/// Width written on the link group.
	pub fn default_link_width(&self) -> f64 {
		match &self.link_width {
			LinkWidth::Fixed(w) => *w,
			_ => self.theme.edge.stroke_width,
		}
	}
}

impl<N, L> ForceGraphOptions<N, L> {
	/// Identity accessor.
	pub fn with_node_id(mut self, f: impl Fn(&N, usize) -> Option<Key> + 'static) -> Self {
		self.node_id = Some(Box::new(f));
		self
	}

	/// Single-group accessor.
	pub fn with_node_group(mut self, f: impl Fn(&N, usize) -> Option<String> + 'static) -> Self {
		self.node_group = Some(Box::new(f));
		self
	}

	/// Group-list accessor.
	pub fn with_node_groups(
		mut self,
		f: impl Fn(&N, usize) -> Option<Vec<String>> + 'static,
	) -> Self {
		self.node_groups = Some(Box::new(f));
		self
	}

	/// Fixes the color scale's domain order.
	pub fn with_group_domain<I, S>(mut self, domain: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.group_domain = Some(domain.into_iter().map(Into::into).collect());
		self
	}

	/// Tooltip text accessor.
	pub fn with_node_title(mut self, f: impl Fn(&N, usize) -> String + 'static) -> Self {
		self.node_title = Some(Box::new(f));
		self
	}

	/// Radius policy.
	pub fn with_node_radius(mut self, radius: NodeRadius<N>) -> Self {
		self.node_radius = radius;
		self
	}

	/// Explicit charges; also opens the repulsion band.
	pub fn with_node_strength(mut self, f: impl Fn(&N, usize) -> f64 + 'static) -> Self {
		self.node_strength = Some(Box::new(f));
		self
	}

	/// Source identity accessor.
	pub fn with_link_source(mut self, f: impl Fn(&L, usize) -> Option<Key> + 'static) -> Self {
		self.link_source = Some(Box::new(f));
		self
	}

	/// Target identity accessor.
	pub fn with_link_target(mut self, f: impl Fn(&L, usize) -> Option<Key> + 'static) -> Self {
		self.link_target = Some(Box::new(f));
		self
	}

	/// Link width policy.
	pub fn with_link_width(mut self, width: LinkWidth<L>) -> Self {
		self.link_width = width;
		self
	}

	/// Spring strength accessor.
	pub fn with_link_strength(mut self, f: impl Fn(&L, usize) -> f64 + 'static) -> Self {
		self.link_strength = Some(Box::new(f));
		self
	}

	/// Color scale range.
	pub fn with_colors(mut self, colors: Vec<String>) -> Self {
		self.colors = colors;
		self
	}

	/// Scene size.
	pub fn with_size(mut self, width: f64, height: f64) -> Self {
		self.width = width;
		self.height = height;
		self
	}

	/// Static styles.
	pub fn with_theme(mut self, theme: Theme) -> Self {
		self.theme = theme;
		self
	}

	/// Simulation tuning.
	pub fn with_simulation(mut self, params: SimulationParameters) -> Self {
		self.simulation = params;
		self
	}

	/// Stops the simulation once `invalidation` completes.
	pub fn with_invalidation(mut self, invalidation: Invalidation) -> Self {
		self.invalidation = Some(invalidation);
		self
	}
}

/// Role groups of the persons network, in legend order.
pub const PERSON_ROLE_GROUPS: [&str; 5] = [
	"manuscript",
	"author, editor, translator",
	"scribe, proofreader, annotator",
	"commissioner, owner, collector",
	"other",
];

/// Configuration for the persons/manuscripts network page.
pub fn persons_options(width: f64, height: f64) -> ForceGraphOptions<GraphNode, GraphLink> {
	ForceGraphOptions::default()
		.with_group_domain(PERSON_ROLE_GROUPS)
		.with_node_title(|node: &GraphNode, _| {
			let id = node.id().map(|k| k.to_string()).unwrap_or_default();
			format!("{} ({})", id, node.roles.as_deref().unwrap_or_default())
		})
		.with_link_width(LinkWidth::SqrtValue)
		.with_size(width, height)
}
