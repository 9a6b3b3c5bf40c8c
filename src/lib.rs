//! mss-graph: Interactive force-directed graph of persons and manuscripts.
//!
//! This crate provides a WASM-based graph visualization component that renders
//! a persons network as SVG with physics-based layout, group colors, node dragging and
//! hover tooltips. The layout engine itself is platform independent.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

pub mod components;
pub mod error;

pub use components::force_graph::{
	ForceGraphOptions, ForceGraphState, ForceGraphSvg, GraphData, GraphLink, GraphNode,
	Invalidation, Key, Theme, persons_options,
};
pub use error::{GraphError, Result};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("mss-graph: logging initialized");
}

/// Load graph data from a script element with id="graph-data".
/// Expected format: JSON with { nodes: [...], links: [...], groups?: [...] }
pub fn load_graph_data() -> Option<GraphData> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id("graph-data")?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	let json_text = script.text().ok()?;

	match GraphData::from_json(&json_text) {
		Ok(data) => {
			info!(
				"mss-graph: loaded {} nodes, {} links",
				data.nodes.len(),
				data.links.len()
			);
			Some(data)
		}
		Err(e) => {
			warn!("mss-graph: {e}");
			None
		}
	}
}

/// Main application component.
/// Loads graph data from DOM and renders the persons network.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let graph_data = load_graph_data().unwrap_or_default();
	let graph_signal = Signal::derive(move || graph_data.clone());

	view! {
		<Html attr:lang="en" attr:dir="ltr" />
		<Title text="Persons Network" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="fullscreen-graph">
			<ForceGraphSvg data=graph_signal fullscreen=true />
			<div class="graph-overlay">
				<h1>"Persons Network"</h1>
				<p class="subtitle">"Drag nodes to reposition. Hover a node for its roles."</p>
			</div>
		</div>
	}
}
