//! Observable graph events.
//!
//! Observers are plain callbacks invoked synchronously, in registration
//! order, after the operation that produced the event has committed.

use std::fmt;

use log::error;

use super::error::GraphError;
use super::item::ItemKind;
use super::types::{ItemId, Point};

/// Something that happened to the graph.
#[derive(Clone, Debug, PartialEq)]
pub enum GraphEvent {
	/// An item was added.
	AfterAddItem {
		/// New item.
		id: ItemId,
		/// Its kind.
		kind: ItemKind,
	},
	/// An item was removed, directly or by cascade.
	AfterRemoveItem {
		/// Removed item.
		id: ItemId,
		/// Its kind.
		kind: ItemKind,
	},
	/// An item's model changed.
	AfterUpdateItem {
		/// Updated item.
		id: ItemId,
	},
	/// A state was enabled or disabled on an item.
	AfterItemStateChange {
		/// Affected item.
		id: ItemId,
		/// State name.
		state: String,
		/// Whether the state is now active.
		enabled: bool,
	},
	/// A new mode became current.
	AfterModeChange {
		/// The new current mode.
		mode: String,
	},
	/// `change_data` finished applying a payload.
	AfterChangeData,
	/// `render` rebuilt the scene.
	AfterRender,
	/// The surface finished a frame.
	AfterPaint,
	/// Zoom or translation changed.
	ViewportChange {
		/// Zoom after the change.
		zoom: f64,
		/// Translation after the change.
		translation: Point,
	},
	/// Position animation started.
	AnimateStart,
	/// Every position animation finished or was stopped.
	AnimateEnd,
}

impl GraphEvent {
	/// Conventional lowercase event name.
	pub fn name(&self) -> &'static str {
		match self {
			GraphEvent::AfterAddItem { .. } => "afteradditem",
			GraphEvent::AfterRemoveItem { .. } => "afterremoveitem",
			GraphEvent::AfterUpdateItem { .. } => "afterupdateitem",
			GraphEvent::AfterItemStateChange { .. } => "afteritemstatechange",
			GraphEvent::AfterModeChange { .. } => "aftermodechange",
			GraphEvent::AfterChangeData => "afterchangedata",
			GraphEvent::AfterRender => "afterrender",
			GraphEvent::AfterPaint => "afterpaint",
			GraphEvent::ViewportChange { .. } => "viewportchange",
			GraphEvent::AnimateStart => "animatestart",
			GraphEvent::AnimateEnd => "animateend",
		}
	}
}

/// Handle returned by [`Graph::on`](super::Graph::on).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

type Listener = Box<dyn FnMut(&GraphEvent)>;
type ErrorListener = Box<dyn FnMut(&GraphError)>;

/// Registered observers.
#[derive(Default)]
pub(crate) struct Observers {
	next: u64,
	listeners: Vec<(ObserverId, Listener)>,
	error_listeners: Vec<(ObserverId, ErrorListener)>,
}

impl fmt::Debug for Observers {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Observers")
			.field("listeners", &self.listeners.len())
			.field("error_listeners", &self.error_listeners.len())
			.finish()
	}
}

impl Observers {
	fn next_id(&mut self) -> ObserverId {
		self.next += 1;
		ObserverId(self.next)
	}

	pub fn subscribe(&mut self, listener: impl FnMut(&GraphEvent) + 'static) -> ObserverId {
		let id = self.next_id();
		self.listeners.push((id, Box::new(listener)));
		id
	}

	pub fn subscribe_errors(&mut self, listener: impl FnMut(&GraphError) + 'static) -> ObserverId {
		let id = self.next_id();
		self.error_listeners.push((id, Box::new(listener)));
		id
	}

	/// Remove a listener of either kind. Returns whether it existed.
	pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
		let before = self.listeners.len() + self.error_listeners.len();
		self.listeners.retain(|(lid, _)| *lid != id);
		self.error_listeners.retain(|(lid, _)| *lid != id);
		before != self.listeners.len() + self.error_listeners.len()
	}

	pub fn emit(&mut self, event: &GraphEvent) {
		for (_, listener) in &mut self.listeners {
			listener(event);
		}
	}

	/// Hand a tick failure to the error observers, or log it if there are none.
	pub fn emit_error(&mut self, err: &GraphError) {
		if self.error_listeners.is_empty() {
			error!("graph: {err}");
			return;
		}
		for (_, listener) in &mut self.error_listeners {
			listener(err);
		}
	}
}
