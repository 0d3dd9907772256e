//! Construction options.
//!
//! [`GraphOptions`] deserializes from the camelCase JSON configuration the
//! browser host embeds in the page; every field has a default so partial
//! documents are fine.

use std::collections::{BTreeMap, HashMap};

use log::warn;
use serde::Deserialize;
use serde_json::Value;

use super::animate::Easing;
use super::error::{GraphError, GraphResult};
use super::item::GroupType;
use super::layout::LayoutConfig;
use super::mode::BehaviorSpec;
use super::types::{NodeSize, Style};

/// Rendering backend the host should create.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Renderer {
	/// HTML canvas.
	#[default]
	Canvas,
	/// SVG document.
	Svg,
}

/// Padding used by `fitView`: one value for every side, or
/// `[top, right, bottom, left]`.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Padding {
	/// Same padding on every side.
	Uniform(f64),
	/// `[top, right, bottom, left]`.
	Sides([f64; 4]),
}

impl Default for Padding {
	fn default() -> Self {
		Padding::Uniform(0.0)
	}
}

impl Padding {
	/// `[top, right, bottom, left]`.
	pub fn sides(self) -> [f64; 4] {
		match self {
			Padding::Uniform(p) => [p; 4],
			Padding::Sides(s) => s,
		}
	}
}

/// Defaults merged under every node or edge model.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ItemDefaults {
	/// Shape name for the host.
	pub shape: Option<String>,
	/// Node size when the model has none.
	pub size: Option<NodeSize>,
	/// Stroke color.
	pub color: Option<String>,
	/// Base style keys.
	pub style: Style,
}

/// Animation settings for `positionsAnimate`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct AnimateConfig {
	/// Milliseconds.
	pub duration: f64,
	/// Progress curve.
	pub easing: Easing,
}

impl Default for AnimateConfig {
	fn default() -> Self {
		Self {
			duration: 500.0,
			easing: Easing::Linear,
		}
	}
}

/// Everything [`Graph::new`](super::Graph::new) accepts.
#[derive(Clone, Debug, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GraphOptions {
	/// Id of the host element; only meaningful to the browser host.
	pub container: String,
	/// Canvas width in CSS pixels.
	pub width: f64,
	/// Canvas height in CSS pixels.
	pub height: f64,
	/// Requested backend.
	pub renderer: Renderer,
	/// Fit the items into the canvas after every render.
	pub fit_view: bool,
	/// Padding kept free by fit view.
	pub fit_view_padding: Padding,
	/// Draw groups, then edges, then nodes. Otherwise draw in insertion order.
	pub group_by_types: bool,
	/// Give edges an end arrow by default.
	pub directed: bool,
	/// Paint on the next tick after a mutation. Off means callers paint.
	pub auto_paint: bool,
	/// Mode name to ordered behavior descriptors. `default` is always present.
	pub modes: HashMap<String, Vec<BehaviorSpec>>,
	/// Defaults for node models.
	pub default_node: ItemDefaults,
	/// Defaults for edge models.
	pub default_edge: ItemDefaults,
	/// State name to style overlay for nodes.
	pub node_state_styles: BTreeMap<String, Style>,
	/// State name to style overlay for edges.
	pub edge_state_styles: BTreeMap<String, Style>,
	/// Accepted for compatibility; plugins are not supported.
	pub plugins: Vec<Value>,
	/// Animate position changes from layout and changeData.
	pub animate: bool,
	/// Duration and easing of position animations.
	pub animate_cfg: AnimateConfig,
	/// Lower zoom bound.
	pub min_zoom: f64,
	/// Upper zoom bound.
	pub max_zoom: f64,
	/// Backing-store pixels per CSS pixel.
	pub pixel_ratio: f64,
	/// Container shape for groups.
	pub group_type: GroupType,
	/// Attach edges at node centres rather than their boundary.
	pub link_center: bool,
	/// Layout to run on render.
	pub layout: Option<LayoutConfig>,
}

impl Default for GraphOptions {
	fn default() -> Self {
		Self {
			container: String::new(),
			width: 800.0,
			height: 600.0,
			renderer: Renderer::Canvas,
			fit_view: false,
			fit_view_padding: Padding::default(),
			group_by_types: true,
			directed: false,
			auto_paint: true,
			modes: HashMap::new(),
			default_node: ItemDefaults::default(),
			default_edge: ItemDefaults::default(),
			node_state_styles: BTreeMap::new(),
			edge_state_styles: BTreeMap::new(),
			plugins: Vec::new(),
			animate: false,
			animate_cfg: AnimateConfig::default(),
			min_zoom: 0.2,
			max_zoom: 10.0,
			pixel_ratio: 1.0,
			group_type: GroupType::Circle,
			link_center: false,
			layout: None,
		}
	}
}

fn positive(name: &str, value: f64) -> GraphResult<()> {
	if value.is_finite() && value > 0.0 {
		Ok(())
	} else {
		Err(GraphError::InvalidConfiguration(format!(
			"{name} must be a positive number, got {value}"
		)))
	}
}

impl GraphOptions {
	/// Replace `width` and `height`.
	pub fn with_size(mut self, width: f64, height: f64) -> Self {
		self.width = width;
		self.height = height;
		self
	}

	/// Add or replace a mode.
	pub fn with_mode(mut self, name: impl Into<String>, behaviors: Vec<BehaviorSpec>) -> Self {
		self.modes.insert(name.into(), behaviors);
		self
	}

	/// Check numeric options. Behavior names are checked against the
	/// behavior registry when the graph is built.
	pub fn validate(&self) -> GraphResult<()> {
		positive("width", self.width)?;
		positive("height", self.height)?;
		positive("pixelRatio", self.pixel_ratio)?;
		positive("minZoom", self.min_zoom)?;
		positive("maxZoom", self.max_zoom)?;
		if self.min_zoom > self.max_zoom {
			return Err(GraphError::InvalidConfiguration(format!(
				"minZoom ({}) exceeds maxZoom ({})",
				self.min_zoom, self.max_zoom
			)));
		}
		let duration = self.animate_cfg.duration;
		if !duration.is_finite() || duration < 0.0 {
			return Err(GraphError::InvalidConfiguration(format!(
				"animateCfg.duration must be non-negative, got {duration}"
			)));
		}
		if self.fit_view_padding.sides().iter().any(|p| !p.is_finite() || *p < 0.0) {
			return Err(GraphError::InvalidConfiguration(
				"fitViewPadding must be non-negative".into(),
			));
		}
		if !self.plugins.is_empty() {
			warn!("graph: ignoring {} plugin(s); plugins are not supported", self.plugins.len());
		}
		Ok(())
	}
}
