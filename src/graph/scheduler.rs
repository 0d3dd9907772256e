//! Paint coalescing.
//!
//! Mutations record what kind of work the next paint needs. The host's tick
//! flushes once per frame no matter how many mutations happened, and the
//! cheapest granularity that covers every request wins.

use std::ops::{BitOr, BitOrAssign};

/// Pending paint work, as a set of flags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Dirty(u8);

impl Dirty {
	pub const NONE: Dirty = Dirty(0);
	/// Redraw as is (viewport moved, styles changed).
	pub const REDRAW: Dirty = Dirty(1);
	/// Dirty items need their dependent geometry (edges, groups) recomputed.
	pub const ITEMS: Dirty = Dirty(1 << 1);
	/// Node positions changed outside the engine; recompute every position.
	pub const POSITIONS: Dirty = Dirty(1 << 2);
	/// Items were added or removed; rebuild draw order.
	pub const LAYERING: Dirty = Dirty(1 << 3);
	/// Everything: geometry, styles and layering.
	pub const FULL: Dirty = Dirty(1 << 4);

	pub fn is_empty(self) -> bool {
		self.0 == 0
	}

	pub fn contains(self, other: Dirty) -> bool {
		self.0 & other.0 == other.0
	}
}

impl BitOr for Dirty {
	type Output = Dirty;

	fn bitor(self, rhs: Dirty) -> Dirty {
		Dirty(self.0 | rhs.0)
	}
}

impl BitOrAssign for Dirty {
	fn bitor_assign(&mut self, rhs: Dirty) {
		self.0 |= rhs.0;
	}
}

/// Decides whether and what to paint on the next tick.
#[derive(Clone, Debug)]
pub struct RenderScheduler {
	pending: Dirty,
	auto_paint: bool,
	paints: u64,
}

impl RenderScheduler {
	pub fn new(auto_paint: bool) -> Self {
		Self {
			pending: Dirty::NONE,
			auto_paint,
			paints: 0,
		}
	}

	pub fn request(&mut self, dirty: Dirty) {
		self.pending |= dirty;
	}

	pub fn pending(&self) -> Dirty {
		self.pending
	}

	/// The next tick should paint.
	pub fn should_flush(&self) -> bool {
		self.auto_paint && !self.pending.is_empty()
	}

	pub fn take(&mut self) -> Dirty {
		std::mem::take(&mut self.pending)
	}

	/// Drop pending work without painting (after a failed paint).
	pub fn discard(&mut self) {
		self.pending = Dirty::NONE;
	}

	pub fn auto_paint(&self) -> bool {
		self.auto_paint
	}

	pub fn set_auto_paint(&mut self, enabled: bool) {
		self.auto_paint = enabled;
	}

	pub fn record_paint(&mut self) {
		self.paints += 1;
	}

	/// Surface flushes since construction.
	pub fn paint_count(&self) -> u64 {
		self.paints
	}
}
