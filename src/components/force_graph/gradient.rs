//! Multi-group gradient fills.
//!
//! A node that belongs to several groups is painted with a linear gradient split into equal,
//! hard-edged bands, one per group. Nodes sharing the same ordered group list share a single
//! gradient definition.

use indexmap::IndexMap;

use super::scale::ColorScale;

/// Canonical key for an ordered group list: groups joined with `_`, whitespace replaced by `_`.
///
/// The key doubles as the gradient's element id.
pub fn gradient_key<S: AsRef<str>>(groups: &[S]) -> String {
	groups
		.iter()
		.map(AsRef::as_ref)
		.collect::<Vec<_>>()
		.join("_")
		.chars()
		.map(|c| if c.is_whitespace() { '_' } else { c })
		.collect()
}

/// One color stop of a gradient, offset in percent.
#[derive(Clone, Debug, PartialEq)]
pub struct GradientStop {
	/// Band color.
	pub color: String,
	/// Offset in percent.
	pub offset: f64,
}

/// A `linearGradient` definition.
#[derive(Clone, Debug, PartialEq)]
pub struct Gradient {
	/// Element id, equal to the group-list key.
	pub id: String,
	/// Two stops per band.
	pub stops: Vec<GradientStop>,
}

impl Gradient {
	/// Two stops per group so adjacent bands meet without blending.
	pub fn banded(id: String, colors: &[String]) -> Self {
		let step = 100.0 / colors.len() as f64;
		let stops = colors
			.iter()
			.enumerate()
			.flat_map(|(i, color)| {
				[
					GradientStop {
						color: color.clone(),
						offset: step * i as f64,
					},
					GradientStop {
						color: color.clone(),
						offset: step * (i + 1) as f64,
					},
				]
			})
			.collect();
		Self { id, stops }
	}
}

/// Gradients keyed by canonical group-list key, in first-seen order.
#[derive(Clone, Debug, Default)]
pub struct GradientCache {
	gradients: IndexMap<String, Gradient>,
}

impl GradientCache {
	/// Returns the gradient for `groups`, synthesizing it on first use.
	pub fn get_or_insert<S: AsRef<str>>(
		&mut self,
		groups: &[S],
		colors: &mut ColorScale,
	) -> &Gradient {
		let key = gradient_key(groups);
		self.gradients.entry(key).or_insert_with_key(|key| {
			let stops: Vec<String> = groups.iter().map(|g| colors.color(g.as_ref())).collect();
			Gradient::banded(key.clone(), &stops)
		})
	}

	/// Gradients in first-seen order.
	pub fn iter(&self) -> impl Iterator<Item = &Gradient> {
		self.gradients.values()
	}

	/// Number of distinct group lists seen.
	pub fn len(&self) -> usize {
		self.gradients.len()
	}

	/// Whether there are no entries.
	pub fn is_empty(&self) -> bool {
		self.gradients.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn scale() -> ColorScale {
		ColorScale::new(["alpha", "beta", "gamma"], vec!["#a".into(), "#b".into(), "#c".into()])
	}

	#[test]
	fn key_joins_and_strips_whitespace() {
		assert_eq!(gradient_key(&["alpha", "beta"]), "alpha_beta");
		assert_eq!(
			gradient_key(&["author, editor", "other"]),
			"author,_editor_other"
		);
	}

	#[test]
	fn stops_partition_the_range_into_hard_bands() {
		let mut cache = GradientCache::default();
		let mut colors = scale();
		let g = cache.get_or_insert(&["alpha", "beta", "gamma"], &mut colors);
		assert_eq!(g.stops.len(), 6);
		let offsets: Vec<f64> = g.stops.iter().map(|s| s.offset).collect();
		assert!((offsets[1] - 100.0 / 3.0).abs() < 1e-9);
		assert_eq!(offsets[1], offsets[2]);
		assert_eq!(offsets[5], 100.0);
		assert_eq!(g.stops[0].color, g.stops[1].color);
		assert_eq!(g.stops[4].color, "#c");
	}

	#[test]
	fn identical_group_lists_share_one_definition() {
		let mut cache = GradientCache::default();
		let mut colors = scale();
		cache.get_or_insert(&["alpha", "beta"], &mut colors);
		cache.get_or_insert(&["alpha", "beta"], &mut colors);
		cache.get_or_insert(&["beta", "alpha"], &mut colors);
		assert_eq!(cache.len(), 2);
		let ids: Vec<&str> = cache.iter().map(|g| g.id.as_str()).collect();
		assert_eq!(ids, ["alpha_beta", "beta_alpha"]);
	}
}
