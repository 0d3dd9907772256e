//! Canvas 2D drawing surface.
//!
//! Paints are layered the same way every frame:
//! 1. Background (screen space)
//! 2. Items in the engine's draw order (world space, pan/zoom applied)
//! 3. Vignette (screen space)

use std::f64::consts::PI;

use serde_json::Value;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::theme::{Color, Theme};
use crate::graph::item::{EdgeShape, GroupShape, NodeShape};
use crate::graph::{DrawingSurface, GroupType, Item, ItemShape, Style, SurfaceError, Viewport};

const ARROW_SIZE: f64 = 6.0;
const LABEL_FONT: &str = "11px system-ui, sans-serif";

fn js_err(err: JsValue) -> SurfaceError {
	SurfaceError::new(err.as_string().unwrap_or_else(|| format!("{err:?}")))
}

fn style_str<'a>(style: &'a Style, key: &str) -> Option<&'a str> {
	style.get(key).and_then(Value::as_str)
}

fn style_f64(style: &Style, key: &str) -> Option<f64> {
	style.get(key).and_then(Value::as_f64)
}

/// [`DrawingSurface`] over an HTML canvas.
pub struct CanvasSurface {
	canvas: HtmlCanvasElement,
	ctx: CanvasRenderingContext2d,
	theme: Theme,
	width: f64,
	height: f64,
	pixel_ratio: f64,
	/// A `save()` from `begin_frame` that no `end_frame` has restored yet.
	frame_open: bool,
}

impl CanvasSurface {
	/// Wrap `canvas`, taking its 2D context.
	pub fn new(canvas: HtmlCanvasElement, theme: Theme) -> Result<Self, SurfaceError> {
		let ctx = canvas
			.get_context("2d")
			.map_err(js_err)?
			.ok_or_else(|| SurfaceError::new("canvas has no 2d context"))?
			.dyn_into::<CanvasRenderingContext2d>()
			.map_err(|_| SurfaceError::new("2d context has an unexpected type"))?;
		let width = canvas.width() as f64;
		let height = canvas.height() as f64;
		Ok(Self {
			canvas,
			ctx,
			theme,
			width,
			height,
			pixel_ratio: 1.0,
			frame_open: false,
		})
	}

	fn draw_background(&self) -> Result<(), SurfaceError> {
		let ctx = &self.ctx;
		let bg = &self.theme.background;
		let (cx, cy) = (self.width / 2.0, self.height / 2.0);
		if bg.use_gradient {
			let gradient = ctx
				.create_radial_gradient(cx, cy, 0.0, cx, cy, self.width.max(self.height) * 0.8)
				.map_err(js_err)?;
			gradient
				.add_color_stop(0.0, &bg.color_secondary.to_css())
				.map_err(js_err)?;
			gradient.add_color_stop(1.0, &bg.color.to_css()).map_err(js_err)?;
			#[allow(deprecated)]
			ctx.set_fill_style(&gradient);
		} else {
			ctx.set_fill_style_str(&bg.color.to_css());
		}
		ctx.fill_rect(0.0, 0.0, self.width, self.height);
		Ok(())
	}

	fn draw_vignette(&self) -> Result<(), SurfaceError> {
		let ctx = &self.ctx;
		let (cx, cy) = (self.width / 2.0, self.height / 2.0);
		let gradient = ctx
			.create_radial_gradient(
				cx,
				cy,
				self.width.min(self.height) * 0.3,
				cx,
				cy,
				self.width.max(self.height) * 0.7,
			)
			.map_err(js_err)?;
		gradient.add_color_stop(0.0, "rgba(0, 0, 0, 0)").map_err(js_err)?;
		gradient
			.add_color_stop(1.0, &format!("rgba(0, 0, 0, {})", self.theme.background.vignette))
			.map_err(js_err)?;
		#[allow(deprecated)]
		ctx.set_fill_style(&gradient);
		ctx.fill_rect(0.0, 0.0, self.width, self.height);
		Ok(())
	}

	fn screen_transform(&self) -> Result<(), SurfaceError> {
		let pr = self.pixel_ratio;
		self.ctx
			.set_transform(pr, 0.0, 0.0, pr, 0.0, 0.0)
			.map_err(js_err)
	}

	fn draw_node(&self, node: &NodeShape, item: &Item, zoom: f64) -> Result<(), SurfaceError> {
		let ctx = &self.ctx;
		let style = item.style();
		let (x, y, radius) = (node.center.x, node.center.y, node.radius);
		let fill = style_str(style, "fill").and_then(Color::parse);
		let alpha = style_f64(style, "opacity").unwrap_or(1.0);

		ctx.set_global_alpha(alpha);
		ctx.begin_path();
		ctx.arc(x, y, radius, 0.0, 2.0 * PI).map_err(js_err)?;
		match fill {
			Some(base) if self.theme.node_gradient => {
				let gradient = ctx
					.create_radial_gradient(x - radius * 0.3, y - radius * 0.3, 0.0, x, y, radius)
					.map_err(js_err)?;
				gradient
					.add_color_stop(0.0, &base.lighten(0.4).to_css())
					.map_err(js_err)?;
				gradient.add_color_stop(0.7, &base.to_css()).map_err(js_err)?;
				gradient
					.add_color_stop(1.0, &base.darken(0.2).to_css())
					.map_err(js_err)?;
				#[allow(deprecated)]
				ctx.set_fill_style(&gradient);
			}
			_ => ctx.set_fill_style_str(style_str(style, "fill").unwrap_or("#8899aa")),
		}
		ctx.fill();

		if let Some(stroke) = style_str(style, "stroke") {
			ctx.set_stroke_style_str(stroke);
			ctx.set_line_width(style_f64(style, "lineWidth").unwrap_or(1.0) / zoom);
			ctx.stroke();
		}
		ctx.set_global_alpha(1.0);

		if let Some(label) = &item.model().label {
			ctx.set_global_alpha(alpha * 0.8);
			ctx.set_fill_style_str(style_str(style, "labelColor").unwrap_or("rgba(255, 255, 255, 0.85)"));
			ctx.set_font(LABEL_FONT);
			ctx.fill_text(label, x + radius + 4.0, y + 3.0).map_err(js_err)?;
			ctx.set_global_alpha(1.0);
		}
		Ok(())
	}

	fn draw_edge(&self, edge: &EdgeShape, style: &Style, zoom: f64) {
		let ctx = &self.ctx;
		let (x1, y1, x2, y2) = (edge.start.x, edge.start.y, edge.end.x, edge.end.y);
		let (dx, dy) = (x2 - x1, y2 - y1);
		let dist = (dx * dx + dy * dy).sqrt();
		if dist < 0.001 {
			return;
		}
		let (ux, uy) = (dx / dist, dy / dist);
		let stroke = style_str(style, "stroke").unwrap_or("rgba(140, 160, 180, 0.5)");
		let arrow = style.get("endArrow").and_then(Value::as_bool).unwrap_or(false);
		let arrow_size = ARROW_SIZE / zoom.max(0.5);

		ctx.set_global_alpha(style_f64(style, "opacity").unwrap_or(1.0));
		ctx.set_stroke_style_str(stroke);
		ctx.set_line_width(style_f64(style, "lineWidth").unwrap_or(1.0) / zoom);
		ctx.begin_path();
		ctx.move_to(x1, y1);
		if arrow {
			ctx.line_to(x2 - ux * arrow_size, y2 - uy * arrow_size);
		} else {
			ctx.line_to(x2, y2);
		}
		ctx.stroke();

		if arrow {
			let (back_x, back_y) = (x2 - ux * arrow_size, y2 - uy * arrow_size);
			let (px, py) = (-uy * arrow_size * 0.5, ux * arrow_size * 0.5);
			ctx.set_fill_style_str(stroke);
			ctx.begin_path();
			ctx.move_to(x2, y2);
			ctx.line_to(back_x + px, back_y + py);
			ctx.line_to(back_x - px, back_y - py);
			ctx.close_path();
			ctx.fill();
		}
		ctx.set_global_alpha(1.0);
	}

	fn draw_group(&self, group: &GroupShape, style: &Style, zoom: f64) -> Result<(), SurfaceError> {
		if group.members.is_empty() {
			return Ok(());
		}
		let ctx = &self.ctx;
		let b = group.bounds;
		ctx.begin_path();
		match group.group_type {
			GroupType::Rect => ctx.rect(b.min_x, b.min_y, b.width(), b.height()),
			GroupType::Circle => {
				let c = b.center();
				let r = b.width().max(b.height()) / 2.0;
				ctx.arc(c.x, c.y, r, 0.0, 2.0 * PI).map_err(js_err)?;
			}
		}
		if let Some(fill) = style_str(style, "fill") {
			ctx.set_fill_style_str(fill);
			ctx.fill();
		}
		if let Some(stroke) = style_str(style, "stroke") {
			ctx.set_stroke_style_str(stroke);
			ctx.set_line_width(style_f64(style, "lineWidth").unwrap_or(1.0) / zoom);
			if let Some(dash) = style.get("lineDash").and_then(Value::as_array) {
				let segments = js_sys::Array::new();
				for len in dash.iter().filter_map(Value::as_f64) {
					segments.push(&JsValue::from_f64(len / zoom));
				}
				let _ = ctx.set_line_dash(&segments);
			}
			ctx.stroke();
			let _ = ctx.set_line_dash(&js_sys::Array::new());
		}
		Ok(())
	}
}

impl DrawingSurface for CanvasSurface {
	fn resize(&mut self, width: f64, height: f64, pixel_ratio: f64) -> Result<(), SurfaceError> {
		self.width = width;
		self.height = height;
		self.pixel_ratio = pixel_ratio;
		self.canvas.set_width((width * pixel_ratio).round() as u32);
		self.canvas.set_height((height * pixel_ratio).round() as u32);
		let css = self.canvas.style();
		css.set_property("width", &format!("{width}px")).map_err(js_err)?;
		css.set_property("height", &format!("{height}px")).map_err(js_err)
	}

	fn clear(&mut self) -> Result<(), SurfaceError> {
		self.screen_transform()?;
		self.draw_background()
	}

	fn begin_frame(&mut self, viewport: &Viewport) -> Result<(), SurfaceError> {
		// an earlier frame failed part way through
		if self.frame_open {
			self.ctx.restore();
			self.frame_open = false;
		}
		self.clear()?;
		let (pr, k, t) = (self.pixel_ratio, viewport.zoom(), viewport.translation());
		self.ctx.save();
		self.frame_open = true;
		self.ctx
			.set_transform(pr * k, 0.0, 0.0, pr * k, pr * t.x, pr * t.y)
			.map_err(js_err)
	}

	fn draw_item(&mut self, item: &Item, viewport: &Viewport) -> Result<(), SurfaceError> {
		let zoom = viewport.zoom();
		match item.shape() {
			ItemShape::Node(node) => self.draw_node(node, item, zoom),
			ItemShape::Edge(edge) => {
				self.draw_edge(edge, item.style(), zoom);
				Ok(())
			}
			ItemShape::Group(group) => self.draw_group(group, item.style(), zoom),
		}
	}

	fn end_frame(&mut self) -> Result<(), SurfaceError> {
		if self.frame_open {
			self.ctx.restore();
			self.frame_open = false;
		}
		self.screen_transform()?;
		if self.theme.background.vignette > 0.0 {
			self.draw_vignette()?;
		}
		Ok(())
	}
}
