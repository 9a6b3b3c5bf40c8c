//! UI components.

pub mod force_graph;
pub mod legend;
pub mod tooltip;
