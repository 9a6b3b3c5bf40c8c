//! Visual theming for the force graph.
//!
//! Holds the static, tick-invariant style of the scene: group-level node and link strokes and
//! the categorical palette used by the group color scale.

/// RGB color representation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Color {
	/// Red channel.
	pub r: u8,
	/// Green channel.
	pub g: u8,
	/// Blue channel.
	pub b: u8,
}

impl Color {
	/// Color from channel values.
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b }
	}

	/// `#rrggbb` form.
	pub fn to_css_rgb(self) -> String {
		format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
	}
}

/// A categorical color palette for node groups.
#[derive(Clone, Debug)]
pub struct NodePalette {
	/// Palette colors, in order.
	pub colors: Vec<Color>,
}

impl NodePalette {
	/// Tableau's ten categorical colors.
	pub fn tableau10() -> Self {
		Self {
			colors: vec![
				Color::rgb(0x4e, 0x79, 0xa7), // Blue
				Color::rgb(0xf2, 0x8e, 0x2c), // Orange
				Color::rgb(0xe1, 0x57, 0x59), // Red
				Color::rgb(0x76, 0xb7, 0xb2), // Teal
				Color::rgb(0x59, 0xa1, 0x4f), // Green
				Color::rgb(0xed, 0xc9, 0x49), // Yellow
				Color::rgb(0xaf, 0x7a, 0xa1), // Purple
				Color::rgb(0xff, 0x9d, 0xa7), // Pink
				Color::rgb(0x9c, 0x75, 0x5f), // Brown
				Color::rgb(0xba, 0xb0, 0xab), // Gray
			],
		}
	}

	/// The classic ten-color category scheme.
	pub fn category10() -> Self {
		Self {
			colors: vec![
				Color::rgb(0x1f, 0x77, 0xb4),
				Color::rgb(0xff, 0x7f, 0x0e),
				Color::rgb(0x2c, 0xa0, 0x2c),
				Color::rgb(0xd6, 0x27, 0x28),
				Color::rgb(0x94, 0x67, 0xbd),
				Color::rgb(0x8c, 0x56, 0x4b),
				Color::rgb(0xe3, 0x77, 0xc2),
				Color::rgb(0x7f, 0x7f, 0x7f),
				Color::rgb(0xbc, 0xbd, 0x22),
				Color::rgb(0x17, 0xbe, 0xcf),
			],
		}
	}

	/// Tableau10 followed by Category10: twenty distinct group colors before cycling.
	pub fn groups() -> Self {
		let mut colors = Self::tableau10().colors;
		colors.extend(Self::category10().colors);
		Self { colors }
	}

	/// CSS hex strings, in palette order.
	pub fn to_css(&self) -> Vec<String> {
		self.colors.iter().map(|c| c.to_css_rgb()).collect()
	}
}

impl Default for NodePalette {
	fn default() -> Self {
		Self::groups()
	}
}

/// Group-level node style, written once onto the node container.
#[derive(Clone, Debug)]
pub struct NodeStyle {
	/// Fill used when group colors are not in play.
	pub fill: String,
	/// Stroke color.
	pub stroke: String,
	/// Stroke width.
	pub stroke_width: f64,
	/// Stroke opacity.
	pub stroke_opacity: f64,
	/// Fill for grouped graphs' nodes that belong to no group at all.
	pub ungrouped_fill: String,
}

/// Group-level link style, written once onto the link container.
#[derive(Clone, Debug)]
pub struct EdgeStyle {
	/// Stroke color.
	pub stroke: String,
	/// Stroke opacity.
	pub stroke_opacity: f64,
	/// Width for links without a per-link width.
	pub stroke_width: f64,
	/// Line cap.
	pub linecap: String,
}

/// Complete visual theme.
#[derive(Clone, Debug)]
pub struct Theme {
	/// Node container style.
	pub node: NodeStyle,
	/// Link container style.
	pub edge: EdgeStyle,
	/// Group color scale range.
	pub palette: NodePalette,
}

impl Theme {
	/// Plain theme that inherits the page's text color for ungrouped graphs.
	pub fn default_theme() -> Self {
		Self {
			node: NodeStyle {
				fill: "currentColor".to_string(),
				stroke: "#fff".to_string(),
				stroke_width: 1.5,
				stroke_opacity: 1.0,
				ungrouped_fill: "#000".to_string(),
			},
			edge: EdgeStyle {
				stroke: "#999".to_string(),
				stroke_opacity: 0.6,
				stroke_width: 1.5,
				linecap: "round".to_string(),
			},
			palette: NodePalette::groups(),
		}
	}
}

impl Default for Theme {
	fn default() -> Self {
		Self::default_theme()
	}
}
