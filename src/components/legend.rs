//! Color legend for node groups.

use leptos::prelude::*;

use super::force_graph::ColorScale;

/// One swatch of the legend.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LegendItem {
	/// Group name.
	pub label: String,
	/// Swatch color.
	pub color: String,
}

/// Domain/range pairs of a color scale, in domain order.
pub fn legend_items(scale: &ColorScale) -> Vec<LegendItem> {
	scale
		.domain()
		.zip(scale.range())
		.map(|(label, color)| LegendItem {
			label: label.to_string(),
			color: color.to_string(),
		})
		.collect()
}

/// Static swatches, one per group.
#[component]
pub fn Legend(#[prop(into)] items: Signal<Vec<LegendItem>>) -> impl IntoView {
	view! {
		<div id="legend">
			{move || {
				items
					.get()
					.into_iter()
					.map(|item| {
						view! {
							<div class="legend-item">
								<div
									class="legend-square"
									style=format!("background: {};", item.color)
								></div>
								<div class="legend-label">{item.label}</div>
							</div>
						}
					})
					.collect_view()
			}}
		</div>
	}
}
