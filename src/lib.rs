//! graph-canvas: interactive node-link graph engine with a canvas host.
//!
//! [`graph`] is the engine: item registry, viewport transforms, interaction
//! modes, animation and frame-coalesced painting, independent of the browser.
//! [`layouts`] supplies layout providers and [`components`] hosts a graph on
//! an HTML canvas as a Leptos component.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use serde::de::DeserializeOwned;
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

pub mod components;
pub mod graph;
pub mod layouts;

pub use components::graph_canvas::{CanvasSurface, GraphCanvas, Theme, ThemeStyles};
pub use graph::{
	BehaviorSpec, DEFAULT_MODE, Graph, GraphData, GraphError, GraphEvent, GraphOptions, GraphResult,
	ItemModel,
};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("graph-canvas: logging initialized");
}

/// Parse the JSON body of the `<script>` element with the given id.
fn load_json<T: DeserializeOwned>(id: &str) -> Option<T> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id(id)?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	let json_text = script.text().ok()?;

	match serde_json::from_str::<T>(&json_text) {
		Ok(value) => Some(value),
		Err(e) => {
			warn!("graph-canvas: failed to parse #{id}: {e}");
			None
		}
	}
}

/// Options for the standalone page: whatever `#graph-options` holds, with a
/// default mode covering selection, hover, dragging, panning and zooming.
fn page_options() -> GraphOptions {
	let mut options = load_json::<GraphOptions>("graph-options").unwrap_or_default();
	if options.modes.is_empty() {
		let behaviors = [
			"click-select",
			"activate-relations",
			"drag-node",
			"drag-canvas",
			"zoom-canvas",
		];
		options = options.with_mode(DEFAULT_MODE, behaviors.into_iter().map(BehaviorSpec::new).collect());
	}
	options
}

/// Main application component.
/// Loads graph data and options from the DOM and renders them full screen.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let graph_data = load_json::<GraphData>("graph-data").unwrap_or_default();
	info!(
		"graph-canvas: loaded {} nodes, {} edges, {} groups",
		graph_data.nodes.len(),
		graph_data.edges.len(),
		graph_data.groups.len()
	);
	let graph_signal = Signal::derive(move || graph_data.clone());

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />
		<Title text="Graph Canvas" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="fullscreen-graph">
			<GraphCanvas data=graph_signal options=page_options() fullscreen=true />
			<div class="graph-overlay">
				<h1>"Graph Canvas"</h1>
				<p class="subtitle">"Click to select, shift-click to add. Drag nodes to move them. Scroll to zoom. Drag background to pan."</p>
			</div>
		</div>
	}
}
