//! Graph data structures for input to the force graph component.

use serde::Deserialize;
use serde_json::Value;

use super::intern::{Intern, Key};
use crate::error::Result;

/// Read access to the fields a node record may carry.
///
/// Every accessor in [`ForceGraphOptions`](super::ForceGraphOptions) falls back to these
/// methods, so any record type can be graphed by implementing `id` alone.
pub trait NodeDatum {
	/// Identity used to resolve link endpoints. `None` leaves the node unaddressable.
	fn id(&self) -> Option<Key>;

	/// Single categorical group.
	fn group(&self) -> Option<&str> {
		None
	}

	/// Ordered multi-group membership, used only when `group` is empty.
	fn groups(&self) -> Option<&[String]> {
		None
	}

	/// Continuous size metric.
	fn size(&self) -> Option<f64> {
		None
	}

	/// Display title. Defaults to the identity when absent.
	fn title(&self) -> Option<String> {
		None
	}
}

/// Read access to the fields a link record may carry.
pub trait LinkDatum {
	/// Identity of the source node.
	fn source(&self) -> Option<Key>;
	/// Identity of the target node.
	fn target(&self) -> Option<Key>;

	/// Weight of the relationship, drawn as `sqrt(value)` by default.
	fn value(&self) -> Option<f64> {
		None
	}
}

/// A person or manuscript node.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct GraphNode {
	/// Unique identifier. Strings, numbers and booleans are all accepted.
	#[serde(default)]
	pub id: Value,
	/// Single group (e.g. "manuscript").
	#[serde(default)]
	pub group: Option<String>,
	/// Multiple groups for nodes holding several roles at once.
	#[serde(default)]
	pub groups: Option<Vec<String>>,
	/// Size metric; larger values draw larger circles.
	#[serde(default)]
	pub size: Option<f64>,
	/// Explicit tooltip text.
	#[serde(default)]
	pub title: Option<String>,
	/// Free-text roles, shown in tooltips by the persons preset.
	#[serde(default)]
	pub roles: Option<String>,
}

impl GraphNode {
	/// Convenience constructor for a node with only an identity.
	pub fn new(id: impl Into<String>) -> Self {
		Self {
			id: Value::String(id.into()),
			..Default::default()
		}
	}

	/// Sets the single group.
	pub fn with_group(mut self, group: impl Into<String>) -> Self {
		self.group = Some(group.into());
		self
	}

	/// Sets the group list.
	pub fn with_groups<I, S>(mut self, groups: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.groups = Some(groups.into_iter().map(Into::into).collect());
		self
	}

	/// Sets the size metric.
	pub fn with_size(mut self, size: f64) -> Self {
		self.size = Some(size);
		self
	}
}

impl NodeDatum for GraphNode {
	fn id(&self) -> Option<Key> {
		self.id.intern()
	}

	fn group(&self) -> Option<&str> {
		self.group.as_deref()
	}

	fn groups(&self) -> Option<&[String]> {
		self.groups.as_deref()
	}

	fn size(&self) -> Option<f64> {
		self.size
	}

	fn title(&self) -> Option<String> {
		self.title.clone()
	}
}

/// An undirected relationship between two nodes.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct GraphLink {
	/// Source node ID.
	#[serde(default)]
	pub source: Value,
	/// Target node ID.
	#[serde(default)]
	pub target: Value,
	/// Relationship weight.
	#[serde(default)]
	pub value: Option<f64>,
}

impl GraphLink {
	/// Link between two text identities.
	pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
		Self {
			source: Value::String(source.into()),
			target: Value::String(target.into()),
			value: None,
		}
	}

	/// Sets the weight.
	pub fn with_value(mut self, value: f64) -> Self {
		self.value = Some(value);
		self
	}
}

impl LinkDatum for GraphLink {
	fn source(&self) -> Option<Key> {
		self.source.intern()
	}

	fn target(&self) -> Option<Key> {
		self.target.intern()
	}

	fn value(&self) -> Option<f64> {
		self.value
	}
}

/// Complete graph data: nodes, links and an optional explicit group domain.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct GraphData {
	/// Node records.
	pub nodes: Vec<GraphNode>,
	/// Link records.
	pub links: Vec<GraphLink>,
	/// Group order for the color scale. Derived from the nodes when absent.
	#[serde(default)]
	pub groups: Option<Vec<String>>,
}

impl GraphData {
	/// Parses `{ nodes, links, groups? }` JSON.
	pub fn from_json(text: &str) -> Result<Self> {
		Ok(serde_json::from_str(text)?)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_mixed_identity_types() {
		let data = GraphData::from_json(
			r#"{
				"nodes": [{"id": "A", "group": "manuscript"}, {"id": 2, "groups": ["a", "b"], "size": 3}],
				"links": [{"source": "A", "target": 2, "value": 4}]
			}"#,
		)
		.unwrap();
		assert_eq!(data.nodes[0].id(), Some(Key::from("A")));
		assert_eq!(data.nodes[1].id(), Some(Key::Integer(2)));
		assert_eq!(data.nodes[1].groups().map(<[String]>::len), Some(2));
		assert_eq!(data.links[0].target(), Some(Key::Integer(2)));
		assert_eq!(data.links[0].value(), Some(4.0));
		assert!(data.groups.is_none());
	}

	#[test]
	fn missing_id_is_unaddressable() {
		let data = GraphData::from_json(r#"{"nodes": [{"group": "x"}], "links": []}"#).unwrap();
		assert_eq!(data.nodes[0].id(), None);
	}

	#[test]
	fn malformed_json_is_a_parse_error() {
		let err = GraphData::from_json("{\"nodes\": [").unwrap_err();
		assert!(matches!(err, crate::error::GraphError::Parse(_)));
	}
}
