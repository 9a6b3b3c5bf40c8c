//! Leptos component wrapping the force-directed graph SVG.
//!
//! The component builds the SVG elements once, then runs the scheduler on
//! `requestAnimationFrame`, rewriting only line endpoints and circle centers after each tick.
//! Node dragging and tooltips use mouse events delegated from the host element to the circle
//! under the pointer.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::warn;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, MouseEvent, Window};

use super::lifecycle::Invalidation;
use super::options::{ForceGraphOptions, persons_options};
use super::scene::{Scene, num};
use super::state::ForceGraphState;
use super::types::GraphData;
use crate::components::legend::{Legend, LegendItem, legend_items};
use crate::components::tooltip::{Tooltip, TooltipStack};

const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// DOM elements bound one-to-one to the scene's lines and circles.
struct SvgElements {
	root: Element,
	lines: Vec<Element>,
	circles: Vec<Element>,
}

/// Bundles graph state with its DOM binding and the node being dragged.
struct GraphContext {
	state: ForceGraphState,
	svg: SvgElements,
	dragging: Option<usize>,
}

fn set_attrs(el: &Element, attrs: &[(&str, String)]) -> Result<(), JsValue> {
	for (name, value) in attrs {
		el.set_attribute(name, value)?;
	}
	Ok(())
}

fn create(document: &Document, tag: &str) -> Result<Element, JsValue> {
	document.create_element_ns(Some(SVG_NS), tag)
}

/// Creates the SVG tree for `scene` inside `host`.
fn build_svg(document: &Document, host: &Element, scene: &Scene) -> Result<SvgElements, JsValue> {
	let root = create(document, "svg")?;
	let [vx, vy, vw, vh] = scene.view_box();
	set_attrs(
		&root,
		&[
			("width", num(scene.width)),
			("height", num(scene.height)),
			("viewBox", format!("{} {} {} {}", num(vx), num(vy), num(vw), num(vh))),
			(
				"style",
				"max-width: 100%; height: auto; height: intrinsic;".to_string(),
			),
		],
	)?;

	let link_group = create(document, "g")?;
	let style = &scene.link_style;
	set_attrs(
		&link_group,
		&[
			("stroke", style.stroke.clone()),
			("stroke-opacity", num(style.stroke_opacity)),
			("stroke-width", num(style.stroke_width)),
			("stroke-linecap", style.stroke_linecap.clone().unwrap_or_default()),
		],
	)?;
	let mut lines = Vec::with_capacity(scene.lines.len());
	for line in &scene.lines {
		let el = create(document, "line")?;
		if let Some(w) = line.stroke_width {
			el.set_attribute("stroke-width", &num(w))?;
		}
		link_group.append_child(&el)?;
		lines.push(el);
	}
	root.append_child(&link_group)?;

	let node_group = create(document, "g")?;
	let style = &scene.node_style;
	set_attrs(
		&node_group,
		&[
			("fill", style.fill.clone().unwrap_or_default()),
			("stroke", style.stroke.clone()),
			("stroke-opacity", num(style.stroke_opacity)),
			("stroke-width", num(style.stroke_width)),
		],
	)?;
	let mut circles = Vec::with_capacity(scene.circles.len());
	for circle in &scene.circles {
		let el = create(document, "circle")?;
		set_attrs(
			&el,
			&[
				("data-index", circle.node.to_string()),
				("r", num(circle.r)),
				("cursor", "grab".to_string()),
			],
		)?;
		if let Some(fill) = circle.fill.to_attr() {
			el.set_attribute("fill", &fill)?;
		}
		if let Some(text) = &circle.desc {
			let desc = create(document, "desc")?;
			desc.set_text_content(Some(text));
			el.append_child(&desc)?;
		}
		node_group.append_child(&el)?;
		circles.push(el);
	}
	root.append_child(&node_group)?;

	let defs = create(document, "defs")?;
	for gradient in &scene.gradients {
		let el = create(document, "linearGradient")?;
		el.set_attribute("id", &gradient.id)?;
		for stop in &gradient.stops {
			let stop_el = create(document, "stop")?;
			set_attrs(
				&stop_el,
				&[
					("offset", format!("{}%", num(stop.offset))),
					("stop-color", stop.color.clone()),
				],
			)?;
			el.append_child(&stop_el)?;
		}
		defs.append_child(&el)?;
	}
	root.append_child(&defs)?;

	host.append_child(&root)?;
	let svg = SvgElements {
		root,
		lines,
		circles,
	};
	sync_geometry(scene, &svg);
	Ok(svg)
}

/// Writes the scene's current geometry onto the bound elements.
fn sync_geometry(scene: &Scene, svg: &SvgElements) {
	for (line, el) in scene.lines.iter().zip(&svg.lines) {
		let _ = el.set_attribute("x1", &num(line.x1));
		let _ = el.set_attribute("y1", &num(line.y1));
		let _ = el.set_attribute("x2", &num(line.x2));
		let _ = el.set_attribute("y2", &num(line.y2));
	}
	for (circle, el) in scene.circles.iter().zip(&svg.circles) {
		let _ = el.set_attribute("cx", &num(circle.cx));
		let _ = el.set_attribute("cy", &num(circle.cy));
	}
}

/// Index of the graph node under a mouse event, if any.
fn node_under(ev: &MouseEvent) -> Option<usize> {
	let target: Element = ev.target()?.dyn_into().ok()?;
	let circle = target.closest("circle").ok()??;
	circle.get_attribute("data-index")?.parse().ok()
}

/// Converts client coordinates into graph coordinates through the SVG's `viewBox`.
fn graph_point(ctx: &GraphContext, ev: &MouseEvent) -> Option<(f64, f64)> {
	let rect = ctx.svg.root.get_bounding_client_rect();
	if rect.width() <= 0.0 || rect.height() <= 0.0 {
		return None;
	}
	let scene = ctx.state.scene();
	let [vx, vy, vw, vh] = scene.view_box();
	Some((
		vx + (ev.client_x() as f64 - rect.left()) / rect.width() * vw,
		vy + (ev.client_y() as f64 - rect.top()) / rect.height() * vh,
	))
}

/// Renders an interactive force-directed graph as SVG, with a group legend and hover tooltips.
///
/// The component sizes itself to its parent container by default; set `fullscreen = true` to
/// use the window's size. Explicit `width`/`height` override automatic sizing. With
/// `persons = true` (the default) the persons-network titles and role groups are used.
#[component]
pub fn ForceGraphSvg(
	#[prop(into)] data: Signal<GraphData>,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = true)] persons: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let host_ref = NodeRef::<leptos::html::Div>::new();
	let context: Rc<RefCell<Option<GraphContext>>> = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let legend = RwSignal::new(Vec::<LegendItem>::new());
	let tooltip = RwSignal::new(TooltipStack::default());

	let (invalidator, invalidation) = Invalidation::channel();
	let invalidation = Rc::new(RefCell::new(Some(invalidation)));
	on_cleanup(move || invalidator.invalidate());

	let (context_init, animate_init) = (context.clone(), animate.clone());
	Effect::new(move |_| {
		let Some(host) = host_ref.get() else {
			return;
		};
		let Some(signal) = invalidation.borrow_mut().take() else {
			return;
		};
		let host: Element = host.into();
		let Some(window): Option<Window> = web_sys::window() else {
			return;
		};
		let Some(document) = window.document() else {
			return;
		};

		let (w, h) = if fullscreen {
			(
				window
					.inner_width()
					.ok()
					.and_then(|v| v.as_f64())
					.unwrap_or(640.0),
				window
					.inner_height()
					.ok()
					.and_then(|v| v.as_f64())
					.unwrap_or(400.0),
			)
		} else {
			(
				width.unwrap_or_else(|| match host.client_width() {
					0 => 640.0,
					w => w as f64,
				}),
				height.unwrap_or_else(|| match host.client_height() {
					0 => 400.0,
					h => h as f64,
				}),
			)
		};

		let options = if persons {
			persons_options(w, h)
		} else {
			ForceGraphOptions::default().with_size(w, h)
		};
		let state = ForceGraphState::new(&data.get_untracked(), options.with_invalidation(signal));
		legend.set(state.color_scale().map(legend_items).unwrap_or_default());

		let svg = match build_svg(&document, &host, state.scene()) {
			Ok(svg) => svg,
			Err(e) => {
				warn!("force graph: failed to build svg: {e:?}");
				return;
			}
		};
		*context_init.borrow_mut() = Some(GraphContext {
			state,
			svg,
			dragging: None,
		});

		let (context_anim, animate_inner) = (context_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			let mut halted = true;
			if let Some(ref mut c) = *context_anim.borrow_mut() {
				if c.state.tick() {
					sync_geometry(c.state.scene(), &c.svg);
				}
				halted = c.state.is_halted();
			}
			if halted {
				return;
			}
			if let (Some(cb), Some(win)) = (animate_inner.borrow().as_ref(), web_sys::window()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let context_md = context.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some(idx) = node_under(&ev) else {
			return;
		};
		if let Some(ref mut c) = *context_md.borrow_mut() {
			if c.dragging.is_none() && c.state.drag_start(idx) {
				ev.prevent_default();
				c.dragging = Some(idx);
			}
		}
	};

	let context_mm = context.clone();
	let on_mousemove = move |ev: MouseEvent| {
		if let Some(ref mut c) = *context_mm.borrow_mut() {
			let Some(idx) = c.dragging else {
				return;
			};
			if let Some((x, y)) = graph_point(c, &ev) {
				c.state.drag_move(idx, x, y);
			}
		}
	};

	let context_mu = context.clone();
	let end_drag = move || {
		if let Some(ref mut c) = *context_mu.borrow_mut() {
			if let Some(idx) = c.dragging.take() {
				c.state.drag_end(idx);
			}
		}
	};
	let end_drag_leave = end_drag.clone();
	let on_mouseup = move |_: MouseEvent| end_drag();
	let on_mouseleave = move |_: MouseEvent| {
		end_drag_leave();
		tooltip.set(TooltipStack::default());
	};

	let context_mo = context.clone();
	let on_mouseover = move |ev: MouseEvent| {
		let Some(idx) = node_under(&ev) else {
			return;
		};
		let text = context_mo
			.borrow()
			.as_ref()
			.and_then(|c| c.state.title(idx).map(str::to_string));
		if let Some(text) = text {
			tooltip.update(|t| {
				t.enter(idx, &text, ev.client_x() as f64, ev.client_y() as f64);
			});
		}
	};
	let on_mouseout = move |ev: MouseEvent| {
		if let Some(idx) = node_under(&ev) {
			tooltip.update(|t| {
				t.leave(idx);
			});
		}
	};

	view! {
		<div
			node_ref=host_ref
			class="force-graph-svg"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:mouseover=on_mouseover
			on:mouseout=on_mouseout
		></div>
		<Legend items=legend />
		<Tooltip stack=tooltip />
	}
}
