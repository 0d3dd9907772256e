//! Drawing-surface collaborator.
//!
//! The engine never draws pixels itself. Each paint is one
//! `begin_frame` / `draw_item`* / `end_frame` sequence against whatever
//! surface the host supplied.

use thiserror::Error;

use super::item::Item;
use super::transform::Viewport;

/// A backend failure, carried as text so any backend can report one.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("drawing surface error: {0}")]
pub struct SurfaceError(pub String);

impl SurfaceError {
	/// Wrap a backend message.
	pub fn new(message: impl Into<String>) -> Self {
		Self(message.into())
	}
}

/// Abstract drawing target.
pub trait DrawingSurface {
	/// Resize the backing store. Sizes are in CSS pixels; the backing store
	/// is `size * pixel_ratio`.
	fn resize(&mut self, width: f64, height: f64, pixel_ratio: f64) -> Result<(), SurfaceError>;

	/// Wipe everything.
	fn clear(&mut self) -> Result<(), SurfaceError>;

	/// Start a paint with the current pan/zoom. Clears by default.
	fn begin_frame(&mut self, _viewport: &Viewport) -> Result<(), SurfaceError> {
		self.clear()
	}

	/// Draw one item; called in draw order.
	fn draw_item(&mut self, item: &Item, viewport: &Viewport) -> Result<(), SurfaceError>;

	/// Finish a paint. Also called after a failed `draw_item`, so every
	/// successful `begin_frame` is matched.
	fn end_frame(&mut self) -> Result<(), SurfaceError> {
		Ok(())
	}
}

/// Surface that draws nothing, for headless use.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSurface;

impl DrawingSurface for NullSurface {
	fn resize(&mut self, _width: f64, _height: f64, _pixel_ratio: f64) -> Result<(), SurfaceError> {
		Ok(())
	}

	fn clear(&mut self) -> Result<(), SurfaceError> {
		Ok(())
	}

	fn draw_item(&mut self, _item: &Item, _viewport: &Viewport) -> Result<(), SurfaceError> {
		Ok(())
	}
}
