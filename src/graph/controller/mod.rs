//! The graph controller.
//!
//! [`Graph`] owns the item registry, state store, viewport, mode dispatcher,
//! render scheduler and animation runtime, and is the only way to mutate
//! any of them. Its operations are split by concern:
//!
//! - `items`: add/update/remove, lookups, item states
//! - `data`: whole-payload ingestion, diffing and export
//! - `viewport`: pan, zoom, sizing and coordinate conversion
//! - `paint`: scheduling ticks, paints and animation
//! - `input`: mode switching and input dispatch

mod data;
mod input;
mod items;
mod paint;
mod viewport;

use log::info;

use super::animate::AnimationRuntime;
use super::behaviors;
use super::config::GraphOptions;
use super::error::{GraphError, GraphResult};
use super::events::{GraphEvent, ObserverId, Observers};
use super::layout::LayoutProvider;
use super::mode::{DEFAULT_MODE, ModeDispatcher};
use super::registry::{GeometryConfig, ItemRegistry};
use super::scheduler::RenderScheduler;
use super::state::StateStore;
use super::style::{PlainStyles, StyleDefaults, StyleProvider};
use super::surface::DrawingSurface;
use super::transform::Viewport;
use super::types::{GraphData, ItemModel};

/// Per-model hook applied to node or edge models as they are added.
pub type ModelMapper = Box<dyn Fn(&mut ItemModel)>;

/// An interactive graph bound to one drawing surface.
pub struct Graph {
	options: GraphOptions,
	viewport: Viewport,
	registry: ItemRegistry,
	states: StateStore,
	modes: ModeDispatcher,
	scheduler: RenderScheduler,
	animation: AnimationRuntime,
	surface: Box<dyn DrawingSurface>,
	layout: Option<Box<dyn LayoutProvider>>,
	styles: Box<dyn StyleProvider>,
	style_defaults: StyleDefaults,
	geometry: GeometryConfig,
	observers: Observers,
	pending_data: Option<GraphData>,
	node_mapper: Option<ModelMapper>,
	edge_mapper: Option<ModelMapper>,
}

impl std::fmt::Debug for Graph {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Graph")
			.field("viewport", &self.viewport)
			.field("items", &self.registry.len())
			.field("modes", &self.modes)
			.field("scheduler", &self.scheduler)
			.field("animation", &self.animation)
			.finish_non_exhaustive()
	}
}

impl Graph {
	/// Validate `options`, size the surface and enter the `default` mode.
	pub fn new(options: GraphOptions, surface: impl DrawingSurface + 'static) -> GraphResult<Self> {
		options.validate()?;

		let mut surface: Box<dyn DrawingSurface> = Box::new(surface);
		surface.resize(options.width, options.height, options.pixel_ratio)?;

		let mut modes = ModeDispatcher::new(options.modes.clone());
		behaviors::register_builtins(&mut modes);
		modes.validate_all()?;

		let geometry = GeometryConfig {
			node_radius: options
				.default_node
				.size
				.map(|s| s.radius())
				.unwrap_or(GeometryConfig::default().node_radius),
			link_center: options.link_center,
			..GeometryConfig::default()
		};

		let mut graph = Self {
			viewport: Viewport::new(
				options.width,
				options.height,
				options.pixel_ratio,
				options.min_zoom,
				options.max_zoom,
			),
			registry: ItemRegistry::new(),
			states: StateStore::new(),
			modes,
			scheduler: RenderScheduler::new(options.auto_paint),
			animation: AnimationRuntime::new(options.animate_cfg.duration, options.animate_cfg.easing),
			surface,
			layout: None,
			styles: Box::new(PlainStyles),
			style_defaults: StyleDefaults::from(&options),
			geometry,
			observers: Observers::default(),
			pending_data: None,
			node_mapper: None,
			edge_mapper: None,
			options,
		};
		graph.switch_mode(DEFAULT_MODE)?;
		info!(
			"graph: created {}x{} ({:?} renderer)",
			graph.options.width, graph.options.height, graph.options.renderer
		);
		Ok(graph)
	}

	/// Use `provider` for `render`, `change_data` and `layout`.
	pub fn with_layout(mut self, provider: impl LayoutProvider + 'static) -> Self {
		self.layout = Some(Box::new(provider));
		self
	}

	/// Use `provider` as the theme layer of style resolution.
	pub fn with_styles(mut self, provider: impl StyleProvider + 'static) -> Self {
		self.styles = Box::new(provider);
		self
	}

	/// Replace the layout provider; `None` disables layout.
	pub fn set_layout(&mut self, provider: Option<Box<dyn LayoutProvider>>) {
		self.layout = provider;
	}

	/// Options the graph was built with.
	pub fn options(&self) -> &GraphOptions {
		&self.options
	}

	/// Apply `mapper` to every node model added from now on.
	pub fn set_node_mapper(&mut self, mapper: impl Fn(&mut ItemModel) + 'static) {
		self.node_mapper = Some(Box::new(mapper));
	}

	/// Apply `mapper` to every edge model added from now on.
	pub fn set_edge_mapper(&mut self, mapper: impl Fn(&mut ItemModel) + 'static) {
		self.edge_mapper = Some(Box::new(mapper));
	}

	/// Observe graph events. Observers run synchronously in registration order.
	pub fn on(&mut self, listener: impl FnMut(&GraphEvent) + 'static) -> ObserverId {
		self.observers.subscribe(listener)
	}

	/// Observe failures raised while a tick paints or animates.
	pub fn on_error(&mut self, listener: impl FnMut(&GraphError) + 'static) -> ObserverId {
		self.observers.subscribe_errors(listener)
	}

	/// Remove an observer. Returns whether it was registered.
	pub fn off(&mut self, id: ObserverId) -> bool {
		self.observers.unsubscribe(id)
	}

	fn emit(&mut self, event: GraphEvent) {
		self.observers.emit(&event);
	}
}
