//! Force-directed graph visualization component.
//!
//! Renders an interactive force-directed graph as SVG with:
//! - A d3-style force simulation (many-body repulsion, link springs, centering)
//! - Group colors, with banded gradients for nodes that belong to several groups
//! - Node dragging that pins the node and reheats the layout
//! - Cancellation through an [`Invalidation`] signal that tears the simulation down
//!
//! The engine is usable without a browser: [`ForceGraphState`] builds a graph from records and
//! [`Scene::to_svg`] serializes it.
//!
//! # Example
//!
//! ```ignore
//! use mss_graph::{ForceGraphSvg, GraphData, GraphNode, GraphLink};
//!
//! let data = GraphData {
//!     nodes: vec![GraphNode::new("a").with_group("author"), GraphNode::new("b")],
//!     links: vec![GraphLink::new("a", "b").with_value(4.0)],
//!     groups: None,
//! };
//!
//! view! { <ForceGraphSvg data=data fullscreen=true /> }
//! ```

mod component;
pub mod drag;
pub mod encoding;
pub mod forces;
pub mod gradient;
pub mod intern;
pub mod lifecycle;
pub mod options;
pub mod scale;
pub mod scene;
pub mod simulation;
mod state;
pub mod theme;
mod types;

pub use component::ForceGraphSvg;
pub use encoding::Fill;
pub use gradient::{Gradient, GradientStop};
pub use intern::{Intern, Key};
pub use lifecycle::{Invalidation, Invalidator};
pub use options::{ForceGraphOptions, PERSON_ROLE_GROUPS, persons_options};
pub use scale::ColorScale;
pub use scene::Scene;
pub use simulation::{Phase, SimulationParameters};
pub use state::ForceGraphState;
pub use theme::Theme;
pub use types::{GraphData, GraphLink, GraphNode, LinkDatum, NodeDatum};
