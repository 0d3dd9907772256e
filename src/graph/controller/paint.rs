use log::debug;

use super::Graph;
use crate::graph::animate::FrameCallback;
use crate::graph::error::GraphResult;
use crate::graph::events::GraphEvent;
use crate::graph::item::ItemKind;
use crate::graph::scheduler::Dirty;
use crate::graph::types::{ItemId, Point};

impl Graph {
	/// Redraw with current styles and geometry. No layout, no geometry work.
	pub fn refresh(&mut self) {
		self.scheduler.request(Dirty::REDRAW);
	}

	/// Recompute every node position from its model, then edge endpoints and
	/// group bounds, and redraw. No layout.
	pub fn refresh_positions(&mut self) {
		self.scheduler.request(Dirty::POSITIONS);
	}

	/// Suspend or resume painting from [`tick`](Self::tick). Resuming does
	/// not paint by itself.
	pub fn set_auto_paint(&mut self, enabled: bool) {
		self.scheduler.set_auto_paint(enabled);
	}

	/// Whether ticks paint pending work.
	pub fn auto_paint(&self) -> bool {
		self.scheduler.auto_paint()
	}

	/// Apply all pending work and flush the surface once, whether or not
	/// anything is pending.
	pub fn paint(&mut self) -> GraphResult<()> {
		let work = self.scheduler.take();
		self.flush(work)
	}

	/// Surface flushes so far.
	pub fn paint_count(&self) -> u64 {
		self.scheduler.paint_count()
	}

	/// Whether the host should keep scheduling ticks.
	pub fn needs_tick(&self) -> bool {
		self.animation.is_animating() || self.scheduler.should_flush()
	}

	/// One scheduling tick at host time `now` (milliseconds).
	///
	/// Advances animations, then paints if auto-paint is on and anything is
	/// pending. Failures go to error observers and the pending work is
	/// dropped, so the next mutation paints again. Returns whether a paint
	/// happened.
	pub fn tick(&mut self, now: f64) -> bool {
		if let Some(step) = self.animation.step(now) {
			for (id, p) in &step.positions {
				self.registry.place_node(id, *p);
			}
			self.scheduler.request(Dirty::ITEMS);
			if step.finished {
				self.emit(GraphEvent::AnimateEnd);
			}
		}
		if !self.scheduler.should_flush() {
			return false;
		}
		let work = self.scheduler.take();
		match self.flush(work) {
			Ok(()) => true,
			Err(err) => {
				self.scheduler.discard();
				self.observers.emit_error(&err);
				false
			}
		}
	}

	fn flush(&mut self, work: Dirty) -> GraphResult<()> {
		if work.contains(Dirty::FULL) {
			self.restyle_all();
		}
		if work.contains(Dirty::FULL) || work.contains(Dirty::POSITIONS) {
			self.registry.refresh_all(&self.geometry);
			self.registry.take_dirty();
		} else {
			let dirty = self.registry.take_dirty();
			self.registry.refresh_dependents(&dirty, &self.geometry);
		}
		if work.contains(Dirty::FULL) || work.contains(Dirty::LAYERING) {
			self.registry.rebuild_draw_order(self.options.group_by_types);
		}

		self.surface.begin_frame(&self.viewport)?;
		let drawn = self
			.registry
			.draw_order()
			.iter()
			.filter_map(|id| self.registry.get(id))
			.try_for_each(|item| self.surface.draw_item(item, &self.viewport));
		if let Err(err) = drawn {
			// close the frame so the surface is balanced for the next one
			let _ = self.surface.end_frame();
			return Err(err.into());
		}
		self.surface.end_frame()?;
		self.scheduler.record_paint();
		self.emit(GraphEvent::AfterPaint);
		Ok(())
	}

	/// Animate every node from where it is drawn to where its model says it
	/// should be, using `animateCfg`.
	pub fn positions_animate(&mut self) {
		let moves: Vec<(ItemId, Point, Point)> = self
			.registry
			.iter(ItemKind::Node)
			.filter_map(|item| {
				let from = item.as_node()?.center;
				let to = item.model.position()?;
				(from != to).then(|| (item.id.clone(), from, to))
			})
			.collect();
		if moves.is_empty() {
			return;
		}
		let was_animating = self.animation.is_animating();
		debug!("graph: animating {} node(s)", moves.len());
		for (id, from, to) in moves {
			self.animation.animate_to(&id, from, to);
		}
		if !was_animating {
			self.emit(GraphEvent::AnimateStart);
		}
	}

	/// Whether any position animation is in flight.
	pub fn is_animating(&self) -> bool {
		self.animation.is_animating()
	}

	/// Cancel every animation, leaving nodes where they were last drawn.
	/// Safe to call when nothing is animating.
	pub fn stop_animate(&mut self) {
		if !self.animation.is_animating() {
			return;
		}
		for (id, p) in self.animation.stop() {
			self.registry.place_node(&id, p);
		}
		self.scheduler.request(Dirty::ITEMS);
		self.emit(GraphEvent::AnimateEnd);
	}

	/// Per-frame hook that may override interpolated positions.
	pub fn on_frame(&mut self, callback: Option<FrameCallback>) {
		self.animation.set_on_frame(callback);
	}
}
