//! Leptos component hosting a [`Graph`] on an HTML canvas.
//!
//! The component owns the browser plumbing only: it sizes the canvas, turns
//! DOM mouse, wheel and keyboard events into [`InputEvent`]s for the current
//! mode, and drives [`Graph::tick`] from `requestAnimationFrame`. Everything
//! else (hit testing, pan/zoom, selection, painting) happens in the engine.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::{error, info, warn};
use wasm_bindgen::prelude::*;
use web_sys::{HtmlCanvasElement, KeyboardEvent, MouseEvent, WheelEvent, Window};

use super::render::CanvasSurface;
use super::theme::{Theme, ThemeStyles};
use crate::graph::{Graph, GraphData, GraphOptions, InputEvent, InputKind, Modifiers, Point};
use crate::layouts;

type Shared<T> = Rc<RefCell<Option<T>>>;

fn window_size(window: &Window) -> Option<(f64, f64)> {
	Some((
		window.inner_width().ok()?.as_f64()?,
		window.inner_height().ok()?.as_f64()?,
	))
}

fn mouse_modifiers(ev: &MouseEvent) -> Modifiers {
	Modifiers {
		shift: ev.shift_key(),
		ctrl: ev.ctrl_key(),
		alt: ev.alt_key(),
		meta: ev.meta_key(),
	}
}

fn mouse_event(kind: InputKind, ev: &MouseEvent) -> InputEvent {
	let client = Point::new(ev.client_x() as f64, ev.client_y() as f64);
	InputEvent::pointer(kind, client).with_modifiers(mouse_modifiers(ev))
}

fn build_graph(canvas: &HtmlCanvasElement, options: GraphOptions, theme: Theme, data: GraphData) -> Option<Graph> {
	let surface = match CanvasSurface::new(canvas.clone(), theme.clone()) {
		Ok(surface) => surface,
		Err(e) => {
			error!("graph-canvas: {e}");
			return None;
		}
	};
	let layout = match options.layout.as_ref().map(layouts::from_config).transpose() {
		Ok(layout) => layout,
		Err(e) => {
			warn!("graph-canvas: layout disabled: {e}");
			None
		}
	};
	let mut graph = match Graph::new(options, surface) {
		Ok(graph) => graph.with_styles(ThemeStyles::new(theme)),
		Err(e) => {
			error!("graph-canvas: failed to create graph: {e}");
			return None;
		}
	};
	graph.set_layout(layout);
	graph.on_error(|e| error!("graph-canvas: {e}"));
	if let Err(e) = graph.read(data) {
		warn!("graph-canvas: initial data rejected: {e}");
	}
	Some(graph)
}

/// Renders an interactive graph on a canvas element.
///
/// Pass graph data via the reactive `data` signal; later values are diffed
/// into the scene with [`Graph::change_data`], so item states and running
/// animations survive updates. The component sizes itself to its parent
/// container by default; set `fullscreen = true` to fill the viewport and
/// resize with the window. Explicit `width`/`height` override both.
#[component]
pub fn GraphCanvas(
	#[prop(into)] data: Signal<GraphData>,
	#[prop(default = GraphOptions::default())] options: GraphOptions,
	#[prop(default = Theme::default())] theme: Theme,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let graph: Shared<Graph> = Rc::new(RefCell::new(None));
	let animate: Shared<Closure<dyn FnMut(f64)>> = Rc::new(RefCell::new(None));
	let resize_cb: Shared<Closure<dyn FnMut()>> = Rc::new(RefCell::new(None));
	let (graph_init, animate_init, resize_cb_init) = (graph.clone(), animate.clone(), resize_cb.clone());

	Effect::new(move |_| {
		let payload = data.get();
		{
			let mut slot = graph_init.borrow_mut();
			if let Some(g) = slot.as_mut() {
				if let Err(e) = g.change_data(payload) {
					warn!("graph-canvas: data update rejected: {e}");
				}
				return;
			}
		}

		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};

		let (w, h) = if fullscreen {
			window_size(&window).unwrap_or((800.0, 600.0))
		} else {
			let parent = canvas.parent_element();
			(
				width.unwrap_or_else(|| parent.as_ref().map(|p| p.client_width() as f64).unwrap_or(800.0)),
				height.unwrap_or_else(|| parent.as_ref().map(|p| p.client_height() as f64).unwrap_or(600.0)),
			)
		};
		let (w, h) = (w.max(1.0), h.max(1.0));
		let mut opts = options.clone().with_size(w, h);
		if opts.pixel_ratio == GraphOptions::default().pixel_ratio {
			opts.pixel_ratio = window.device_pixel_ratio();
		}

		let Some(mut g) = build_graph(&canvas, opts, theme.clone(), payload) else {
			return;
		};
		let rect = canvas.get_bounding_client_rect();
		g.set_client_origin(Point::new(rect.left(), rect.top()));
		info!("graph-canvas: mounted at {w}x{h}");
		*graph_init.borrow_mut() = Some(g);

		if fullscreen {
			let graph_resize = graph_init.clone();
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let Some((nw, nh)) = web_sys::window().as_ref().and_then(window_size) else {
					return;
				};
				if let Some(g) = graph_resize.borrow_mut().as_mut() {
					if let Err(e) = g.change_size(nw, nh) {
						warn!("graph-canvas: resize failed: {e}");
					}
				}
			}));
			if let Some(cb) = resize_cb_init.borrow().as_ref() {
				let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		let (graph_anim, animate_inner) = (graph_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move |now: f64| {
			if let Some(g) = graph_anim.borrow_mut().as_mut() {
				g.tick(now);
			}
			if let (Some(cb), Some(win)) = (animate_inner.borrow().as_ref(), web_sys::window()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(cb) = animate_init.borrow().as_ref() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	// Every DOM event goes through here: refresh the canvas origin, then let
	// the current mode handle it.
	let forward = {
		let graph = graph.clone();
		move |event: InputEvent| {
			let Some(mut slot) = graph.try_borrow_mut().ok() else {
				return;
			};
			let Some(g) = slot.as_mut() else {
				return;
			};
			if let Some(canvas) = canvas_ref.get() {
				let canvas: HtmlCanvasElement = canvas.into();
				let rect = canvas.get_bounding_client_rect();
				g.set_client_origin(Point::new(rect.left(), rect.top()));
			}
			if let Err(e) = g.dispatch_input(event) {
				warn!("graph-canvas: input handling failed: {e}");
			}
		}
	};

	let fwd = forward.clone();
	let on_mousedown = move |ev: MouseEvent| fwd(mouse_event(InputKind::PointerDown, &ev));
	let fwd = forward.clone();
	let on_mousemove = move |ev: MouseEvent| fwd(mouse_event(InputKind::PointerMove, &ev));
	let fwd = forward.clone();
	let on_mouseup = move |ev: MouseEvent| fwd(mouse_event(InputKind::PointerUp, &ev));
	let fwd = forward.clone();
	let on_mouseleave = move |ev: MouseEvent| fwd(mouse_event(InputKind::PointerLeave, &ev));

	let fwd = forward.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let client = Point::new(ev.client_x() as f64, ev.client_y() as f64);
		fwd(InputEvent::wheel(client, ev.delta_y()).with_modifiers(mouse_modifiers(&ev)));
	};

	let key_event = |kind: InputKind, ev: &KeyboardEvent| {
		InputEvent::key(kind, ev.key()).with_modifiers(Modifiers {
			shift: ev.shift_key(),
			ctrl: ev.ctrl_key(),
			alt: ev.alt_key(),
			meta: ev.meta_key(),
		})
	};
	let fwd = forward.clone();
	let on_keydown = move |ev: KeyboardEvent| fwd(key_event(InputKind::KeyDown, &ev));
	let fwd = forward;
	let on_keyup = move |ev: KeyboardEvent| fwd(key_event(InputKind::KeyUp, &ev));

	view! {
		<canvas
			node_ref=canvas_ref
			class="graph-canvas"
			tabindex="0"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			on:keydown=on_keydown
			on:keyup=on_keyup
			style="display: block; cursor: grab; outline: none;"
		/>
	}
}
