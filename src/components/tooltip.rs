//! Hover tooltips for graph nodes.
//!
//! Hovering a node adds its description to a floating box; hovering further nodes before the
//! first is left stacks their descriptions below a rule. Each node appears at most once and is
//! removed when the pointer leaves it.

use leptos::prelude::*;

/// Vertical offset of the box below the pointer, in pixels.
const POINTER_OFFSET: f64 = 10.0;

/// One node's text in the tooltip box.
#[derive(Clone, Debug, PartialEq)]
pub struct TooltipEntry {
	/// Node index the text was read from.
	pub target: usize,
	/// Text shown for the node.
	pub text: String,
}

/// Contents and placement of the tooltip box.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TooltipStack {
	anchor: Option<(f64, f64)>,
	entries: Vec<TooltipEntry>,
}

impl TooltipStack {
	/// Adds `target`'s text. Returns `false` for empty text or a node already shown.
	pub fn enter(&mut self, target: usize, text: &str, client_x: f64, client_y: f64) -> bool {
		if text.is_empty() || self.entries.iter().any(|e| e.target == target) {
			return false;
		}
		if self.entries.is_empty() {
			self.anchor = Some((client_x, client_y + POINTER_OFFSET));
		}
		self.entries.push(TooltipEntry {
			target,
			text: text.to_string(),
		});
		true
	}

	/// Removes `target`'s text, closing the box when it was the last entry.
	pub fn leave(&mut self, target: usize) -> bool {
		let before = self.entries.len();
		self.entries.retain(|e| e.target != target);
		if self.entries.is_empty() {
			self.anchor = None;
		}
		self.entries.len() != before
	}

	/// Top-left corner of the box in client coordinates, while it is open.
	pub fn anchor(&self) -> Option<(f64, f64)> {
		self.anchor
	}

	/// Open entries, oldest first.
	pub fn entries(&self) -> &[TooltipEntry] {
		&self.entries
	}

	/// Whether there are no entries.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

/// Floating box rendering a [`TooltipStack`].
#[component]
pub fn Tooltip(#[prop(into)] stack: Signal<TooltipStack>) -> impl IntoView {
	move || {
		let stack = stack.get();
		stack.anchor().map(|(x, y)| {
			let entries = stack
				.entries()
				.iter()
				.enumerate()
				.map(|(i, entry)| {
					let text = entry.text.clone();
					view! {
						<div>
							{(i > 0).then(|| view! { <hr /> })}
							{text}
						</div>
					}
				})
				.collect_view();
			view! {
				<div id="tooltip" style=format!("top: {y}px; left: {x}px;")>
					{entries}
				</div>
			}
		})
	}
}
