use log::{debug, warn};

use super::Graph;
use crate::graph::error::{GraphError, GraphResult};
use crate::graph::events::GraphEvent;
use crate::graph::mode::{BehaviorFactory, BehaviorSpec, EventFlow, InputEvent, route};

impl Graph {
	/// Name of the current mode.
	pub fn current_mode(&self) -> &str {
		self.modes.current()
	}

	/// Switch the current mode.
	///
	/// Every behavior of the old mode is deactivated before any behavior of
	/// the new one is activated. Called from inside a behavior handler, the
	/// switch happens once the current event has finished propagating.
	pub fn set_mode(&mut self, mode: &str) -> GraphResult<()> {
		if !self.modes.has_mode(mode) {
			return Err(GraphError::UnknownMode(mode.to_string()));
		}
		if self.modes.is_dispatching() {
			self.modes.defer(mode);
			return Ok(());
		}
		if self.modes.current() == mode {
			return Ok(());
		}
		self.switch_mode(mode)
	}

	pub(super) fn switch_mode(&mut self, mode: &str) -> GraphResult<()> {
		let mut next = self.modes.instantiate(mode)?;
		let mut first_err = None;

		let mut old = self.modes.take_active();
		for active in &mut old {
			if let Err(err) = active.behavior.deactivate(self) {
				warn!("graph: deactivating `{}` failed: {err}", active.kind);
				first_err.get_or_insert(err);
			}
		}
		drop(old);
		for active in &mut next {
			if let Err(err) = active.behavior.activate(self) {
				warn!("graph: activating `{}` failed: {err}", active.kind);
				first_err.get_or_insert(err);
			}
		}
		self.modes.install(mode, next);
		debug!("graph: mode `{mode}` active: {:?}", self.modes.active_kinds());
		self.emit(GraphEvent::AfterModeChange {
			mode: mode.to_string(),
		});
		first_err.map_or(Ok(()), Err)
	}

	/// Make `factory` available to modes under `name`.
	pub fn register_behavior(&mut self, name: impl Into<String>, factory: BehaviorFactory) {
		self.modes.register_factory(name, factory);
	}

	/// Add or replace a mode. Every behavior it names must be registered.
	/// Replacing the current mode takes effect on the next switch.
	pub fn register_mode(&mut self, name: impl Into<String>, behaviors: Vec<BehaviorSpec>) -> GraphResult<()> {
		let name = name.into();
		self.modes.validate_specs(&name, &behaviors)?;
		self.modes.insert_mode(name, behaviors);
		Ok(())
	}

	/// Offer an input event to the current mode's behaviors, in order,
	/// until one consumes it.
	///
	/// Hosts fill the client position (and key or wheel fields); canvas and
	/// viewport positions and the hit-tested target are filled in here.
	pub fn dispatch_input(&mut self, mut event: InputEvent) -> GraphResult<EventFlow> {
		if event.is_pointer() {
			event.canvas = self.viewport.canvas_by_client(event.client);
			event.point = self.viewport.point_by_canvas(event.canvas);
			event.target = self.registry.node_at(event.point).map(|n| n.id.clone());
		}

		let mut active = self.modes.take_active();
		self.modes.enter_dispatch();
		let mut outcome = Ok(EventFlow::Continue);
		for behavior in &mut active {
			if !behavior.accepts(&event, self) {
				continue;
			}
			match route(behavior.behavior.as_mut(), self, &event) {
				Ok(EventFlow::Continue) => {}
				other => {
					outcome = other;
					break;
				}
			}
		}
		self.modes.leave_dispatch();
		self.modes.restore_active(active);

		if let Some(mode) = self.modes.take_pending() {
			if mode != self.modes.current() {
				self.switch_mode(&mode)?;
			}
		}
		outcome
	}
}
