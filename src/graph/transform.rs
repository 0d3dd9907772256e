//! Viewport state and coordinate conversions.
//!
//! # Coordinate Spaces
//!
//! - **Client**: pixel position relative to the page, as delivered by input
//!   events. Offset from canvas space by the surface's client origin.
//! - **Canvas**: pixel position inside the drawing surface, before pan/zoom.
//! - **Viewport** (a.k.a. "point"): logical graph coordinates after the
//!   pan/zoom transform is undone. Item positions live here.
//!
//! `canvas = point * zoom + translation` and `client = canvas + origin`.
//! Every conversion is a pure function of the current state and each pair is
//! an exact inverse.

use super::types::{Point, Rect};

/// Pan/zoom state plus canvas dimensions.
#[derive(Clone, Debug, PartialEq)]
pub struct Viewport {
	zoom: f64,
	translation: Point,
	width: f64,
	height: f64,
	pixel_ratio: f64,
	min_zoom: f64,
	max_zoom: f64,
	client_origin: Point,
}

impl Viewport {
	/// Bounds and dimensions are expected to be validated by the caller.
	pub fn new(width: f64, height: f64, pixel_ratio: f64, min_zoom: f64, max_zoom: f64) -> Self {
		Self {
			zoom: 1.0_f64.clamp(min_zoom, max_zoom),
			translation: Point::default(),
			width,
			height,
			pixel_ratio,
			min_zoom,
			max_zoom,
			client_origin: Point::default(),
		}
	}

	/// Current zoom ratio.
	pub fn zoom(&self) -> f64 {
		self.zoom
	}

	/// Canvas offset of the viewport origin.
	pub fn translation(&self) -> Point {
		self.translation
	}

	/// Canvas width in CSS pixels.
	pub fn width(&self) -> f64 {
		self.width
	}

	/// Canvas height in CSS pixels.
	pub fn height(&self) -> f64 {
		self.height
	}

	/// Backing-store pixels per CSS pixel.
	pub fn pixel_ratio(&self) -> f64 {
		self.pixel_ratio
	}

	/// Client position of the canvas' top-left corner.
	pub fn client_origin(&self) -> Point {
		self.client_origin
	}

	/// Where the drawing surface's top-left corner sits in client space.
	pub fn set_client_origin(&mut self, origin: Point) {
		self.client_origin = origin;
	}

	/// Shift the translation by a delta. Not clamped.
	pub fn translate(&mut self, dx: f64, dy: f64) {
		self.translation.x += dx;
		self.translation.y += dy;
	}

	/// Multiply the zoom by `ratio`, keeping the point under `center`
	/// (canvas space) stationary.
	///
	/// The result is clamped to the zoom bounds and the anchor math uses the
	/// ratio that was actually applied. Returns `false` if nothing changed.
	pub fn zoom_by(&mut self, ratio: f64, center: Point) -> bool {
		if !ratio.is_finite() || ratio <= 0.0 {
			return false;
		}
		self.zoom_to(self.zoom * ratio, center)
	}

	/// Set an absolute zoom (clamped), anchored at `center` in canvas space.
	pub fn zoom_to(&mut self, zoom: f64, center: Point) -> bool {
		if !zoom.is_finite() {
			return false;
		}
		let clamped = zoom.clamp(self.min_zoom, self.max_zoom);
		if clamped == self.zoom {
			return false;
		}
		let effective = clamped / self.zoom;
		self.translation = Point::new(
			center.x - (center.x - self.translation.x) * effective,
			center.y - (center.y - self.translation.y) * effective,
		);
		self.zoom = clamped;
		true
	}

	/// Change the canvas dimensions; zoom and translation are untouched.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}

	/// Zoom and centre `bounds` (viewport space) inside the canvas minus
	/// `[top, right, bottom, left]` padding.
	pub fn fit(&mut self, bounds: Rect, padding: [f64; 4]) {
		let [top, right, bottom, left] = padding;
		let avail_w = (self.width - left - right).max(1.0);
		let avail_h = (self.height - top - bottom).max(1.0);
		let (bw, bh) = (bounds.width(), bounds.height());

		let zoom = if bw <= f64::EPSILON && bh <= f64::EPSILON {
			1.0
		} else if bw <= f64::EPSILON {
			avail_h / bh
		} else if bh <= f64::EPSILON {
			avail_w / bw
		} else {
			(avail_w / bw).min(avail_h / bh)
		};
		self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);

		let target = Point::new(left + avail_w / 2.0, top + avail_h / 2.0);
		let center = bounds.center();
		self.translation = Point::new(
			target.x - center.x * self.zoom,
			target.y - center.y * self.zoom,
		);
	}

	/// Viewport to canvas.
	pub fn canvas_by_point(&self, p: Point) -> Point {
		Point::new(
			p.x * self.zoom + self.translation.x,
			p.y * self.zoom + self.translation.y,
		)
	}

	/// Canvas to viewport.
	pub fn point_by_canvas(&self, c: Point) -> Point {
		Point::new(
			(c.x - self.translation.x) / self.zoom,
			(c.y - self.translation.y) / self.zoom,
		)
	}

	/// Canvas to client.
	pub fn client_by_canvas(&self, c: Point) -> Point {
		c + self.client_origin
	}

	/// Client to canvas.
	pub fn canvas_by_client(&self, c: Point) -> Point {
		c - self.client_origin
	}

	/// Client to viewport.
	pub fn point_by_client(&self, c: Point) -> Point {
		self.point_by_canvas(self.canvas_by_client(c))
	}

	/// Viewport to client.
	pub fn client_by_point(&self, p: Point) -> Point {
		self.client_by_canvas(self.canvas_by_point(p))
	}
}
