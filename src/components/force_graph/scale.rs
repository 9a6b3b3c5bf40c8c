//! Ordinal color scale mapping node groups to palette colors.
//!
//! Groups map to colors by their position in the domain; the range cycles when the domain is
//! longer than the palette. Looking up a group outside the domain appends it, so the first
//! lookup of an unseen group fixes its color for the rest of the build.

use indexmap::IndexSet;

use super::theme::NodePalette;

/// Group → color mapping exposed to legend builders.
#[derive(Clone, Debug)]
pub struct ColorScale {
	domain: IndexSet<String>,
	range: Vec<String>,
}

impl ColorScale {
	/// Build from an explicit domain. Duplicates keep their first position; empty groups are
	/// dropped.
	pub fn new<I, S>(domain: I, range: Vec<String>) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		let domain = domain
			.into_iter()
			.map(Into::into)
			.filter(|g: &String| !g.is_empty())
			.collect();
		let range = if range.is_empty() {
			NodePalette::default().to_css()
		} else {
			range
		};
		Self { domain, range }
	}

	/// Build the default domain from observed groups: sorted, distinct, non-empty.
	pub fn from_observed<'a, I>(groups: I, range: Vec<String>) -> Self
	where
		I: IntoIterator<Item = &'a str>,
	{
		let mut observed: Vec<&str> = groups.into_iter().collect();
		observed.sort_unstable();
		Self::new(observed, range)
	}

	/// Color for `group`, extending the domain if the group is new.
	pub fn color(&mut self, group: &str) -> String {
		let (index, _) = self.domain.insert_full(group.to_string());
		self.range[index % self.range.len()].clone()
	}

	/// Groups in scale order.
	pub fn domain(&self) -> impl Iterator<Item = &str> {
		self.domain.iter().map(String::as_str)
	}

	/// Range colors paired with the domain, in domain order.
	pub fn range(&self) -> impl Iterator<Item = &str> {
		(0..self.domain.len()).map(|i| self.range[i % self.range.len()].as_str())
	}

	/// Number of groups in the domain.
	pub fn len(&self) -> usize {
		self.domain.len()
	}

	/// Whether there are no entries.
	pub fn is_empty(&self) -> bool {
		self.domain.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn color_of<'a>(scale: &'a ColorScale, group: &str) -> Option<&'a str> {
		scale.domain().zip(scale.range()).find(|(g, _)| *g == group).map(|(_, c)| c)
	}

	fn palette() -> Vec<String> {
		vec!["red".into(), "green".into(), "blue".into()]
	}

	#[test]
	fn observed_domain_is_sorted_distinct_and_non_empty() {
		let scale = ColorScale::from_observed(["b", "", "a", "b"], palette());
		assert_eq!(scale.domain().collect::<Vec<_>>(), ["a", "b"]);
		assert_eq!(color_of(&scale, "a"), Some("red"));
		assert_eq!(color_of(&scale, "b"), Some("green"));
	}

	#[test]
	fn explicit_domain_keeps_caller_order() {
		let scale = ColorScale::new(["z", "a"], palette());
		assert_eq!(color_of(&scale, "z"), Some("red"));
		assert_eq!(color_of(&scale, "a"), Some("green"));
	}

	#[test]
	fn unknown_groups_are_appended_and_range_cycles() {
		let mut scale = ColorScale::new(["a", "b", "c"], palette());
		assert_eq!(scale.color("d"), "red");
		assert_eq!(scale.len(), 4);
		assert_eq!(scale.color("d"), "red");
		assert_eq!(scale.range().collect::<Vec<_>>(), ["red", "green", "blue", "red"]);
	}

	#[test]
	fn empty_range_falls_back_to_group_palette() {
		let scale = ColorScale::new(["a"], Vec::new());
		assert_eq!(color_of(&scale, "a"), Some("#4e79a7"));
	}
}
