//! SVG scene bound to the simulation.
//!
//! One `line` per resolved link and one `circle` per node, created once at build time. Static
//! style (radius, fill, widths, gradient references, descriptions) is fixed at construction;
//! [`Scene::update`] only rewrites line endpoints and circle centers.

use std::fmt::Write;

use super::encoding::{Encodings, Fill};
use super::gradient::Gradient;
use super::simulation::Simulation;
use super::theme::Theme;

/// A link's line element.
#[derive(Clone, Debug, PartialEq)]
pub struct LineElement {
	/// Index into the simulation's links.
	pub link: usize,
	/// Source x.
	pub x1: f64,
	/// Source y.
	pub y1: f64,
	/// Target x.
	pub x2: f64,
	/// Target y.
	pub y2: f64,
	/// Per-link width; `None` inherits the link group's.
	pub stroke_width: Option<f64>,
}

/// A node's circle element.
#[derive(Clone, Debug, PartialEq)]
pub struct CircleElement {
	/// Index into the simulation's nodes.
	pub node: usize,
	/// Center x.
	pub cx: f64,
	/// Center y.
	pub cy: f64,
	/// Radius.
	pub r: f64,
	/// Fill, or inherit the group fill.
	pub fill: Fill,
	/// Hidden description read by tooltips.
	pub desc: Option<String>,
}

/// Attributes shared by every element of a group.
#[derive(Clone, Debug, PartialEq)]
pub struct GroupStyle {
	/// Fill attribute.
	pub fill: Option<String>,
	/// Stroke color.
	pub stroke: String,
	/// Stroke opacity.
	pub stroke_opacity: f64,
	/// Stroke width.
	pub stroke_width: f64,
	/// Line cap, for link containers.
	pub stroke_linecap: Option<String>,
}

/// The rendered graph.
#[derive(Clone, Debug)]
pub struct Scene {
	/// Viewport width.
	pub width: f64,
	/// Viewport height.
	pub height: f64,
	/// Attributes of the link container.
	pub link_style: GroupStyle,
	/// Attributes of the node container.
	pub node_style: GroupStyle,
	/// One line per resolved link.
	pub lines: Vec<LineElement>,
	/// One circle per node.
	pub circles: Vec<CircleElement>,
	/// Gradient definitions referenced by node fills.
	pub gradients: Vec<Gradient>,
	ticks: u64,
}

impl Scene {
	/// Binds elements to the simulation's nodes and links and draws their initial positions.
	///
	/// Only links the simulation resolved get a line; unresolved input links are never drawn.
	pub fn new(
		simulation: &Simulation,
		encodings: &Encodings,
		theme: &Theme,
		default_link_width: f64,
		width: f64,
		height: f64,
	) -> Self {
		let lines = simulation
			.links()
			.iter()
			.enumerate()
			.map(|(i, link)| LineElement {
				link: i,
				x1: 0.0,
				y1: 0.0,
				x2: 0.0,
				y2: 0.0,
				stroke_width: encodings
					.links
					.get(link.index)
					.and_then(|l| l.stroke_width),
			})
			.collect();
		let circles = simulation
			.nodes()
			.iter()
			.map(|node| {
				let enc = &encodings.nodes[node.index];
				CircleElement {
					node: node.index,
					cx: 0.0,
					cy: 0.0,
					r: enc.radius,
					fill: enc.fill.clone(),
					desc: enc.title.clone(),
				}
			})
			.collect();

		let mut scene = Self {
			width,
			height,
			link_style: GroupStyle {
				fill: None,
				stroke: theme.edge.stroke.clone(),
				stroke_opacity: theme.edge.stroke_opacity,
				stroke_width: default_link_width,
				stroke_linecap: Some(theme.edge.linecap.clone()),
			},
			node_style: GroupStyle {
				fill: Some(theme.node.fill.clone()),
				stroke: theme.node.stroke.clone(),
				stroke_opacity: theme.node.stroke_opacity,
				stroke_width: theme.node.stroke_width,
				stroke_linecap: None,
			},
			lines,
			circles,
			gradients: encodings.gradients.iter().cloned().collect(),
			ticks: 0,
		};
		scene.sync(simulation);
		scene
	}

	/// Rewrites geometry from the simulation's current positions. Called after every tick.
	pub fn update(&mut self, simulation: &Simulation) {
		self.sync(simulation);
		self.ticks += 1;
	}

	fn sync(&mut self, simulation: &Simulation) {
		for line in &mut self.lines {
			if let Some((x1, y1, x2, y2)) = simulation.link_endpoints(line.link) {
				line.x1 = x1;
				line.y1 = y1;
				line.x2 = x2;
				line.y2 = y2;
			}
		}
		for circle in &mut self.circles {
			if let Some(node) = simulation.node(circle.node) {
				circle.cx = node.x;
				circle.cy = node.y;
			}
		}
	}

	/// Number of ticks rendered since construction.
	pub fn ticks(&self) -> u64 {
		self.ticks
	}

	/// `viewBox` centering the origin.
	pub fn view_box(&self) -> [f64; 4] {
		[-self.width / 2.0, -self.height / 2.0, self.width, self.height]
	}

	/// Serializes the scene as a standalone SVG document.
	pub fn to_svg(&self) -> String {
		let mut out = String::with_capacity(256 + 96 * (self.lines.len() + self.circles.len()));
		let [vx, vy, vw, vh] = self.view_box();
		let _ = write!(
			out,
			r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="{} {} {} {}" style="max-width: 100%; height: auto; height: intrinsic;">"#,
			num(self.width),
			num(self.height),
			num(vx),
			num(vy),
			num(vw),
			num(vh)
		);

		write_group_open(&mut out, &self.link_style);
		for line in &self.lines {
			let _ = write!(
				out,
				r#"<line x1="{}" y1="{}" x2="{}" y2="{}""#,
				num(line.x1),
				num(line.y1),
				num(line.x2),
				num(line.y2)
			);
			if let Some(w) = line.stroke_width {
				let _ = write!(out, r#" stroke-width="{}""#, num(w));
			}
			out.push_str("/>");
		}
		out.push_str("</g>");

		write_group_open(&mut out, &self.node_style);
		for circle in &self.circles {
			let _ = write!(
				out,
				r#"<circle data-index="{}" cx="{}" cy="{}" r="{}""#,
				circle.node,
				num(circle.cx),
				num(circle.cy),
				num(circle.r)
			);
			if let Some(fill) = circle.fill.to_attr() {
				let _ = write!(out, r#" fill="{}""#, escape_xml(&fill));
			}
			match &circle.desc {
				Some(desc) => {
					let _ = write!(out, "><desc>{}</desc></circle>", escape_xml(desc));
				}
				None => out.push_str("/>"),
			}
		}
		out.push_str("</g>");

		out.push_str("<defs>");
		for gradient in &self.gradients {
			let _ = write!(out, r#"<linearGradient id="{}">"#, escape_xml(&gradient.id));
			for stop in &gradient.stops {
				let _ = write!(
					out,
					r#"<stop offset="{}%" stop-color="{}"/>"#,
					num(stop.offset),
					escape_xml(&stop.color)
				);
			}
			out.push_str("</linearGradient>");
		}
		out.push_str("</defs></svg>");
		out
	}
}

fn write_group_open(out: &mut String, style: &GroupStyle) {
	out.push_str("<g");
	if let Some(fill) = &style.fill {
		let _ = write!(out, r#" fill="{}""#, escape_xml(fill));
	}
	let _ = write!(
		out,
		r#" stroke="{}" stroke-opacity="{}" stroke-width="{}""#,
		escape_xml(&style.stroke),
		num(style.stroke_opacity),
		num(style.stroke_width)
	);
	if let Some(cap) = &style.stroke_linecap {
		let _ = write!(out, r#" stroke-linecap="{}""#, escape_xml(cap));
	}
	out.push('>');
}

/// Compact number formatting: at most three decimals, trailing zeros trimmed, non-finite as 0.
pub fn num(value: f64) -> String {
	if !value.is_finite() {
		return "0".to_string();
	}
	let mut s = format!("{value:.3}");
	if s.contains('.') {
		let trimmed = s.trim_end_matches('0').trim_end_matches('.').len();
		s.truncate(trimmed);
	}
	if s == "-0" {
		s = "0".to_string();
	}
	s
}

/// Escapes text for XML content and attribute values.
pub fn escape_xml(text: &str) -> String {
	let mut out = String::with_capacity(text.len());
	for c in text.chars() {
		match c {
			'&' => out.push_str("&amp;"),
			'<' => out.push_str("&lt;"),
			'>' => out.push_str("&gt;"),
			'"' => out.push_str("&quot;"),
			'\'' => out.push_str("&#39;"),
			_ => out.push(c),
		}
	}
	out
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn numbers_are_compact() {
		assert_eq!(num(1.5), "1.5");
		assert_eq!(num(2.0), "2");
		assert_eq!(num(-0.0001), "0");
		assert_eq!(num(100.0 / 3.0), "33.333");
		assert_eq!(num(f64::NAN), "0");
		assert_eq!(num(-320.0), "-320");
	}

	#[test]
	fn text_is_escaped() {
		assert_eq!(escape_xml(r#"a<b & "c""#), "a&lt;b &amp; &quot;c&quot;");
	}
}
