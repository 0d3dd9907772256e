use log::debug;

use super::Graph;
use crate::graph::error::{GraphError, GraphResult};
use crate::graph::events::GraphEvent;
use crate::graph::scheduler::Dirty;
use crate::graph::transform::Viewport;
use crate::graph::types::Point;

impl Graph {
	/// Current pan/zoom state.
	pub fn viewport(&self) -> &Viewport {
		&self.viewport
	}

	/// Current zoom ratio.
	pub fn get_zoom(&self) -> f64 {
		self.viewport.zoom()
	}

	/// Pan by a canvas-space delta.
	pub fn translate(&mut self, dx: f64, dy: f64) {
		self.viewport.translate(dx, dy);
		self.viewport_changed();
	}

	/// Multiply the zoom by `ratio` around `center` (canvas space), clamped
	/// to `[minZoom, maxZoom]`. Returns whether the zoom changed.
	pub fn zoom(&mut self, ratio: f64, center: Point) -> bool {
		let changed = self.viewport.zoom_by(ratio, center);
		if changed {
			self.viewport_changed();
		}
		changed
	}

	/// Set an absolute zoom around `center` (canvas space), clamped.
	pub fn zoom_to(&mut self, zoom: f64, center: Point) -> bool {
		let changed = self.viewport.zoom_to(zoom, center);
		if changed {
			self.viewport_changed();
		}
		changed
	}

	/// Translate so the top-left of the scene's bounds lands on canvas
	/// point `(x, y)`.
	pub fn move_to(&mut self, x: f64, y: f64) {
		let Some(bounds) = self.registry.bounds() else {
			return;
		};
		let corner = self.viewport.canvas_by_point(bounds.min());
		self.translate(x - corner.x, y - corner.y);
	}

	/// Zoom and centre the scene inside the canvas minus `fitViewPadding`.
	pub fn fit_view(&mut self) {
		let Some(bounds) = self.registry.bounds() else {
			return;
		};
		self.viewport.fit(bounds, self.options.fit_view_padding.sides());
		self.viewport_changed();
	}

	/// Resize the canvas. Zoom and translation are kept; everything is
	/// redrawn but nothing is laid out again.
	pub fn change_size(&mut self, width: f64, height: f64) -> GraphResult<()> {
		if !(width.is_finite() && width > 0.0 && height.is_finite() && height > 0.0) {
			return Err(GraphError::InvalidConfiguration(format!(
				"canvas size must be positive, got {width}x{height}"
			)));
		}
		self.surface
			.resize(width, height, self.viewport.pixel_ratio())?;
		self.viewport.resize(width, height);
		self.options.width = width;
		self.options.height = height;
		self.scheduler.request(Dirty::FULL);
		debug!("graph: resized to {width}x{height}");
		Ok(())
	}

	/// Where the drawing surface sits in client space; hosts update this
	/// whenever the surface moves on the page.
	pub fn set_client_origin(&mut self, origin: Point) {
		self.viewport.set_client_origin(origin);
	}

	/// Client position to viewport coordinates.
	pub fn point_by_client(&self, client: Point) -> Point {
		self.viewport.point_by_client(client)
	}

	/// Viewport coordinates to client position.
	pub fn client_by_point(&self, point: Point) -> Point {
		self.viewport.client_by_point(point)
	}

	/// Canvas position to viewport coordinates.
	pub fn point_by_canvas(&self, canvas: Point) -> Point {
		self.viewport.point_by_canvas(canvas)
	}

	/// Viewport coordinates to canvas position.
	pub fn canvas_by_point(&self, point: Point) -> Point {
		self.viewport.canvas_by_point(point)
	}

	/// Client position to canvas position.
	pub fn canvas_by_client(&self, client: Point) -> Point {
		self.viewport.canvas_by_client(client)
	}

	/// Canvas position to client position.
	pub fn client_by_canvas(&self, canvas: Point) -> Point {
		self.viewport.client_by_canvas(canvas)
	}

	fn viewport_changed(&mut self) {
		self.scheduler.request(Dirty::REDRAW);
		self.emit(GraphEvent::ViewportChange {
			zoom: self.viewport.zoom(),
			translation: self.viewport.translation(),
		});
	}
}
