//! Interaction modes.
//!
//! A mode is a named, ordered list of behavior descriptors. Exactly one mode
//! is current; its behaviors are instantiated from registered factories when
//! the mode is entered and dropped when it is left. Input events are offered
//! to the active behaviors in declaration order until one consumes them.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use serde::Deserialize;
use serde_json::{Map, Value};

use super::controller::Graph;
use super::error::{GraphError, GraphResult};
use super::types::{ItemId, Point};

/// The reserved mode every graph starts in.
pub const DEFAULT_MODE: &str = "default";

/// Per-event gate attached to a behavior descriptor.
pub type ShouldUpdate = Rc<dyn Fn(&InputEvent) -> bool>;

/// Builds a behavior from its descriptor's configuration.
pub type BehaviorFactory = Rc<dyn Fn(&Map<String, Value>) -> GraphResult<Box<dyn Behavior>>>;

#[derive(Deserialize)]
#[serde(untagged)]
enum RawBehaviorSpec {
	Name(String),
	Full {
		#[serde(rename = "type")]
		kind: String,
		#[serde(flatten)]
		config: Map<String, Value>,
	},
}

/// One entry of a mode: a behavior name plus its configuration.
#[derive(Clone, Deserialize)]
#[serde(from = "RawBehaviorSpec")]
pub struct BehaviorSpec {
	/// Registered behavior name.
	pub kind: String,
	/// Options passed to the behavior factory.
	pub config: Map<String, Value>,
	/// Extra per-event gate.
	pub should_update: Option<ShouldUpdate>,
}

impl From<RawBehaviorSpec> for BehaviorSpec {
	fn from(raw: RawBehaviorSpec) -> Self {
		match raw {
			RawBehaviorSpec::Name(kind) => BehaviorSpec::new(kind),
			RawBehaviorSpec::Full { kind, config } => BehaviorSpec {
				kind,
				config,
				should_update: None,
			},
		}
	}
}

impl fmt::Debug for BehaviorSpec {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("BehaviorSpec")
			.field("kind", &self.kind)
			.field("config", &self.config)
			.field("should_update", &self.should_update.is_some())
			.finish()
	}
}

impl BehaviorSpec {
	/// Descriptor for `kind` with no options.
	pub fn new(kind: impl Into<String>) -> Self {
		Self {
			kind: kind.into(),
			config: Map::new(),
			should_update: None,
		}
	}

	/// Replace the options.
	pub fn with_config(mut self, config: Map<String, Value>) -> Self {
		self.config = config;
		self
	}

	/// Only run this behavior's handlers for events `gate` accepts.
	pub fn with_should_update(mut self, gate: impl Fn(&InputEvent) -> bool + 'static) -> Self {
		self.should_update = Some(Rc::new(gate));
		self
	}
}

/// Input event kinds routed through modes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputKind {
	/// Button pressed.
	PointerDown,
	/// Pointer moved.
	PointerMove,
	/// Button released.
	PointerUp,
	/// Pointer left the surface.
	PointerLeave,
	/// Wheel scrolled.
	Wheel,
	/// Key pressed.
	KeyDown,
	/// Key released.
	KeyUp,
}

/// Modifier keys held during an event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
	/// Shift key.
	pub shift: bool,
	/// Control key.
	pub ctrl: bool,
	/// Alt or Option key.
	pub alt: bool,
	/// Command or Windows key.
	pub meta: bool,
}

/// An input event in all three coordinate spaces.
///
/// Hosts fill `kind`, `client` and the key/wheel fields; the graph fills
/// `canvas`, `point` and `target` before dispatch.
#[derive(Clone, Debug, PartialEq)]
pub struct InputEvent {
	/// What happened.
	pub kind: InputKind,
	/// Position relative to the page.
	pub client: Point,
	/// Position on the drawing surface.
	pub canvas: Point,
	/// Position in viewport space.
	pub point: Point,
	/// Topmost node under the pointer.
	pub target: Option<ItemId>,
	/// Wheel delta (`deltaY`; positive scrolls down).
	pub delta: f64,
	/// Key name for keyboard events.
	pub key: Option<String>,
	/// Modifier keys held.
	pub modifiers: Modifiers,
}

impl InputEvent {
	/// Pointer event at a client position.
	pub fn pointer(kind: InputKind, client: Point) -> Self {
		Self {
			kind,
			client,
			canvas: Point::default(),
			point: Point::default(),
			target: None,
			delta: 0.0,
			key: None,
			modifiers: Modifiers::default(),
		}
	}

	/// Wheel event at a client position.
	pub fn wheel(client: Point, delta: f64) -> Self {
		Self {
			delta,
			..Self::pointer(InputKind::Wheel, client)
		}
	}

	/// Keyboard event.
	pub fn key(kind: InputKind, key: impl Into<String>) -> Self {
		Self {
			key: Some(key.into()),
			..Self::pointer(kind, Point::default())
		}
	}

	/// Set the held modifiers.
	pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
		self.modifiers = modifiers;
		self
	}

	/// Whether the event carries a position.
	pub fn is_pointer(&self) -> bool {
		!matches!(self.kind, InputKind::KeyDown | InputKind::KeyUp)
	}
}

/// Whether later behaviors still see the event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EventFlow {
	/// Offer the event to the next behavior.
	#[default]
	Continue,
	/// Stop here.
	Consumed,
}

/// A unit of interaction logic, live while its mode is current.
///
/// Handlers mutate the graph only through its public operations.
pub trait Behavior {
	/// Called when the owning mode becomes current.
	fn activate(&mut self, _graph: &mut Graph) -> GraphResult<()> {
		Ok(())
	}

	/// Called when the owning mode stops being current. Release any drag or
	/// hover state here.
	fn deactivate(&mut self, _graph: &mut Graph) -> GraphResult<()> {
		Ok(())
	}

	/// Evaluated right before every handler call.
	fn should_update(&self, _event: &InputEvent, _graph: &Graph) -> bool {
		true
	}

	/// Button pressed.
	fn on_pointer_down(&mut self, _graph: &mut Graph, _event: &InputEvent) -> GraphResult<EventFlow> {
		Ok(EventFlow::Continue)
	}

	/// Pointer moved.
	fn on_pointer_move(&mut self, _graph: &mut Graph, _event: &InputEvent) -> GraphResult<EventFlow> {
		Ok(EventFlow::Continue)
	}

	/// Button released.
	fn on_pointer_up(&mut self, _graph: &mut Graph, _event: &InputEvent) -> GraphResult<EventFlow> {
		Ok(EventFlow::Continue)
	}

	/// Pointer left the surface.
	fn on_pointer_leave(&mut self, _graph: &mut Graph, _event: &InputEvent) -> GraphResult<EventFlow> {
		Ok(EventFlow::Continue)
	}

	/// Wheel scrolled.
	fn on_wheel(&mut self, _graph: &mut Graph, _event: &InputEvent) -> GraphResult<EventFlow> {
		Ok(EventFlow::Continue)
	}

	/// Key pressed.
	fn on_key_down(&mut self, _graph: &mut Graph, _event: &InputEvent) -> GraphResult<EventFlow> {
		Ok(EventFlow::Continue)
	}

	/// Key released.
	fn on_key_up(&mut self, _graph: &mut Graph, _event: &InputEvent) -> GraphResult<EventFlow> {
		Ok(EventFlow::Continue)
	}
}

/// Call the handler matching `event.kind`.
pub(crate) fn route(
	behavior: &mut dyn Behavior,
	graph: &mut Graph,
	event: &InputEvent,
) -> GraphResult<EventFlow> {
	match event.kind {
		InputKind::PointerDown => behavior.on_pointer_down(graph, event),
		InputKind::PointerMove => behavior.on_pointer_move(graph, event),
		InputKind::PointerUp => behavior.on_pointer_up(graph, event),
		InputKind::PointerLeave => behavior.on_pointer_leave(graph, event),
		InputKind::Wheel => behavior.on_wheel(graph, event),
		InputKind::KeyDown => behavior.on_key_down(graph, event),
		InputKind::KeyUp => behavior.on_key_up(graph, event),
	}
}

/// A live behavior plus the descriptor-level gate it was built with.
pub(crate) struct ActiveBehavior {
	pub(crate) kind: String,
	pub(crate) should_update: Option<ShouldUpdate>,
	pub(crate) behavior: Box<dyn Behavior>,
}

impl ActiveBehavior {
	pub(crate) fn accepts(&self, event: &InputEvent, graph: &Graph) -> bool {
		self.should_update.as_ref().is_none_or(|gate| gate(event))
			&& self.behavior.should_update(event, graph)
	}
}

/// Mode table, behavior factories and the current mode's live behaviors.
pub(crate) struct ModeDispatcher {
	modes: HashMap<String, Vec<BehaviorSpec>>,
	factories: HashMap<String, BehaviorFactory>,
	current: String,
	active: Vec<ActiveBehavior>,
	pending: Option<String>,
	depth: usize,
}

impl fmt::Debug for ModeDispatcher {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let active: Vec<&str> = self.active.iter().map(|b| b.kind.as_str()).collect();
		f.debug_struct("ModeDispatcher")
			.field("modes", &self.modes)
			.field("factories", &self.factories.keys().collect::<Vec<_>>())
			.field("current", &self.current)
			.field("active", &active)
			.field("pending", &self.pending)
			.finish()
	}
}

impl Default for ModeDispatcher {
	fn default() -> Self {
		Self::new(HashMap::new())
	}
}

impl ModeDispatcher {
	/// Start with `modes`; `default` is added (empty) when missing. No
	/// behaviors are live until the first switch.
	pub fn new(mut modes: HashMap<String, Vec<BehaviorSpec>>) -> Self {
		modes.entry(DEFAULT_MODE.to_string()).or_default();
		Self {
			modes,
			factories: HashMap::new(),
			current: DEFAULT_MODE.to_string(),
			active: Vec::new(),
			pending: None,
			depth: 0,
		}
	}

	pub fn current(&self) -> &str {
		&self.current
	}

	pub fn has_mode(&self, name: &str) -> bool {
		self.modes.contains_key(name)
	}

	/// Behavior names live right now, in activation order.
	pub fn active_kinds(&self) -> Vec<&str> {
		self.active.iter().map(|b| b.kind.as_str()).collect()
	}

	pub fn register_factory(&mut self, name: impl Into<String>, factory: BehaviorFactory) {
		self.factories.insert(name.into(), factory);
	}

	/// Check that every descriptor names a registered behavior.
	pub fn validate_specs(&self, mode: &str, specs: &[BehaviorSpec]) -> GraphResult<()> {
		match specs.iter().find(|s| !self.factories.contains_key(&s.kind)) {
			Some(spec) => Err(GraphError::InvalidConfiguration(format!(
				"mode `{mode}` uses unknown behavior `{}`",
				spec.kind
			))),
			None => Ok(()),
		}
	}

	pub fn validate_all(&self) -> GraphResult<()> {
		self.modes
			.iter()
			.try_for_each(|(name, specs)| self.validate_specs(name, specs))
	}

	pub(crate) fn insert_mode(&mut self, name: String, specs: Vec<BehaviorSpec>) {
		self.modes.insert(name, specs);
	}

	/// Build fresh behaviors for `mode`, in declaration order.
	pub(crate) fn instantiate(&self, mode: &str) -> GraphResult<Vec<ActiveBehavior>> {
		let specs = self
			.modes
			.get(mode)
			.ok_or_else(|| GraphError::UnknownMode(mode.to_string()))?;
		specs
			.iter()
			.map(|spec| {
				let factory = self.factories.get(&spec.kind).ok_or_else(|| {
					GraphError::InvalidConfiguration(format!("unknown behavior `{}`", spec.kind))
				})?;
				Ok(ActiveBehavior {
					kind: spec.kind.clone(),
					should_update: spec.should_update.clone(),
					behavior: factory(&spec.config)?,
				})
			})
			.collect()
	}

	/// Take the live behaviors out for a dispatch or a switch.
	pub(crate) fn take_active(&mut self) -> Vec<ActiveBehavior> {
		std::mem::take(&mut self.active)
	}

	/// Put behaviors back after dispatch. Anything installed meanwhile wins.
	pub(crate) fn restore_active(&mut self, active: Vec<ActiveBehavior>) {
		if self.active.is_empty() {
			self.active = active;
		}
	}

	pub(crate) fn install(&mut self, mode: &str, active: Vec<ActiveBehavior>) {
		self.current = mode.to_string();
		self.active = active;
	}

	pub(crate) fn is_dispatching(&self) -> bool {
		self.depth > 0
	}

	pub(crate) fn enter_dispatch(&mut self) {
		self.depth += 1;
	}

	pub(crate) fn leave_dispatch(&mut self) {
		self.depth = self.depth.saturating_sub(1);
	}

	pub(crate) fn defer(&mut self, mode: &str) {
		self.pending = Some(mode.to_string());
	}

	pub(crate) fn take_pending(&mut self) -> Option<String> {
		if self.depth == 0 {
			self.pending.take()
		} else {
			None
		}
	}
}
