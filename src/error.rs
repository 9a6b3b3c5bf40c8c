//! Error type shared by data loading and graph construction.

use crate::components::force_graph::Key;

/// Which end of a link failed to resolve.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Endpoint {
	/// The link source.
	Source,
	/// The link target.
	Target,
}

impl std::fmt::Display for Endpoint {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Endpoint::Source => f.write_str("source"),
			Endpoint::Target => f.write_str("target"),
		}
	}
}

/// Problems found while loading graph data or building a graph from it.
///
/// Building never aborts on these; they are collected on the built graph and logged so the
/// view degrades instead of failing.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
	/// Embedded graph JSON could not be read.
	#[error("failed to parse graph data: {0}")]
	Parse(#[from] serde_json::Error),
	/// A node's identity is missing or null.
	#[error("node {node} has no usable identity")]
	MissingIdentity {
		/// Index of the node.
		node: usize,
	},
	/// Several nodes share an identity; the last one is linked.
	#[error("identity {key} is used by more than one node")]
	DuplicateIdentity {
		/// The shared identity.
		key: Key,
	},
	/// A link endpoint names no node.
	#[error("link {link} has an unresolved {endpoint}: {}", display_key(.key))]
	UnresolvedEndpoint {
		/// Index of the input link.
		link: usize,
		/// Which end failed.
		endpoint: Endpoint,
		/// The identity that was looked up, if any.
		key: Option<Key>,
	},
}

fn display_key(key: &Option<Key>) -> String {
	key.as_ref()
		.map(Key::to_string)
		.unwrap_or_else(|| "<missing>".to_string())
}

/// Result alias for graph loading.
pub type Result<T> = std::result::Result<T, GraphError>;
