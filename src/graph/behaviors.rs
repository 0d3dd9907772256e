//! Built-in behaviors.
//!
//! Registered under their conventional names by [`register_builtins`]:
//! `drag-canvas`, `zoom-canvas`, `drag-node`, `click-select` and
//! `activate-relations`. Each reads an optional camelCase configuration
//! object from its mode descriptor.

use std::rc::Rc;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use super::controller::Graph;
use super::error::{GraphError, GraphResult};
use super::item::{Item, ItemKind};
use super::mode::{Behavior, BehaviorFactory, EventFlow, InputEvent, ModeDispatcher};
use super::types::{ItemId, Point};

/// Pointer travel (client pixels) below which a press-release is a click.
const CLICK_TOLERANCE: f64 = 3.0;

/// A behavior built from a typed configuration.
trait Configured: Behavior + Sized + 'static {
	type Config: DeserializeOwned;

	fn with_config(config: Self::Config) -> Self;
}

fn factory_for<B: Configured>(kind: &'static str) -> BehaviorFactory {
	Rc::new(move |config| {
		let parsed: B::Config = serde_json::from_value(Value::Object(config.clone()))
			.map_err(|e| GraphError::InvalidConfiguration(format!("{kind}: {e}")))?;
		Ok(Box::new(B::with_config(parsed)) as Box<dyn Behavior>)
	})
}

/// Register every built-in behavior factory.
pub fn register_builtins(modes: &mut ModeDispatcher) {
	modes.register_factory("drag-canvas", factory_for::<DragCanvas>("drag-canvas"));
	modes.register_factory("zoom-canvas", factory_for::<ZoomCanvas>("zoom-canvas"));
	modes.register_factory("drag-node", factory_for::<DragNode>("drag-node"));
	modes.register_factory("click-select", factory_for::<ClickSelect>("click-select"));
	modes.register_factory(
		"activate-relations",
		factory_for::<ActivateRelations>("activate-relations"),
	);
}

/// Axes a canvas drag may move along.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DragDirection {
	#[default]
	Both,
	X,
	Y,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DragCanvasConfig {
	pub direction: DragDirection,
}

/// Pan by dragging empty canvas.
#[derive(Debug, Default)]
pub struct DragCanvas {
	config: DragCanvasConfig,
	last: Option<Point>,
}

impl Configured for DragCanvas {
	type Config = DragCanvasConfig;

	fn with_config(config: DragCanvasConfig) -> Self {
		Self { config, last: None }
	}
}

impl Behavior for DragCanvas {
	fn deactivate(&mut self, _graph: &mut Graph) -> GraphResult<()> {
		self.last = None;
		Ok(())
	}

	fn on_pointer_down(&mut self, _graph: &mut Graph, event: &InputEvent) -> GraphResult<EventFlow> {
		if event.target.is_none() {
			self.last = Some(event.client);
		}
		Ok(EventFlow::Continue)
	}

	fn on_pointer_move(&mut self, graph: &mut Graph, event: &InputEvent) -> GraphResult<EventFlow> {
		let Some(last) = self.last else {
			return Ok(EventFlow::Continue);
		};
		let (mut dx, mut dy) = (event.client.x - last.x, event.client.y - last.y);
		match self.config.direction {
			DragDirection::Both => {}
			DragDirection::X => dy = 0.0,
			DragDirection::Y => dx = 0.0,
		}
		graph.translate(dx, dy);
		self.last = Some(event.client);
		Ok(EventFlow::Consumed)
	}

	fn on_pointer_up(&mut self, _graph: &mut Graph, _event: &InputEvent) -> GraphResult<EventFlow> {
		self.last = None;
		Ok(EventFlow::Continue)
	}

	fn on_pointer_leave(&mut self, _graph: &mut Graph, _event: &InputEvent) -> GraphResult<EventFlow> {
		self.last = None;
		Ok(EventFlow::Continue)
	}
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ZoomCanvasConfig {
	/// Zoom change per wheel notch.
	pub sensitivity: f64,
}

impl Default for ZoomCanvasConfig {
	fn default() -> Self {
		Self { sensitivity: 0.1 }
	}
}

/// Zoom around the pointer with the wheel.
#[derive(Debug, Default)]
pub struct ZoomCanvas {
	config: ZoomCanvasConfig,
}

impl Configured for ZoomCanvas {
	type Config = ZoomCanvasConfig;

	fn with_config(config: ZoomCanvasConfig) -> Self {
		Self { config }
	}
}

impl Behavior for ZoomCanvas {
	fn on_wheel(&mut self, graph: &mut Graph, event: &InputEvent) -> GraphResult<EventFlow> {
		if event.delta == 0.0 {
			return Ok(EventFlow::Continue);
		}
		let s = self.config.sensitivity.clamp(0.0, 0.9);
		let ratio = if event.delta > 0.0 { 1.0 - s } else { 1.0 + s };
		graph.zoom(ratio, event.canvas);
		Ok(EventFlow::Consumed)
	}
}

#[derive(Debug)]
struct NodeDrag {
	id: ItemId,
	start_client: Point,
	start_position: Point,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DragNodeConfig {
	/// State held by the node while it is being dragged.
	pub drag_state: Option<String>,
}

/// Move nodes by dragging them.
#[derive(Debug, Default)]
pub struct DragNode {
	config: DragNodeConfig,
	drag: Option<NodeDrag>,
}

impl Configured for DragNode {
	type Config = DragNodeConfig;

	fn with_config(config: DragNodeConfig) -> Self {
		Self { config, drag: None }
	}
}

impl DragNode {
	fn release(&mut self, graph: &mut Graph) -> GraphResult<()> {
		let Some(drag) = self.drag.take() else {
			return Ok(());
		};
		if let Some(state) = &self.config.drag_state {
			if graph.find_by_id(&drag.id).is_some() {
				graph.set_item_state(&drag.id, state, false)?;
			}
		}
		Ok(())
	}
}

impl Behavior for DragNode {
	fn deactivate(&mut self, graph: &mut Graph) -> GraphResult<()> {
		self.release(graph)
	}

	fn on_pointer_down(&mut self, graph: &mut Graph, event: &InputEvent) -> GraphResult<EventFlow> {
		let Some(id) = &event.target else {
			return Ok(EventFlow::Continue);
		};
		let Some(start_position) = graph.find_by_id(id).and_then(Item::as_node).map(|n| n.center) else {
			return Ok(EventFlow::Continue);
		};
		if let Some(state) = &self.config.drag_state {
			graph.set_item_state(id, state, true)?;
		}
		self.drag = Some(NodeDrag {
			id: id.clone(),
			start_client: event.client,
			start_position,
		});
		Ok(EventFlow::Continue)
	}

	fn on_pointer_move(&mut self, graph: &mut Graph, event: &InputEvent) -> GraphResult<EventFlow> {
		let Some(drag) = &self.drag else {
			return Ok(EventFlow::Continue);
		};
		if graph.find_by_id(&drag.id).is_none() {
			self.drag = None;
			return Ok(EventFlow::Continue);
		}
		let zoom = graph.get_zoom();
		let x = drag.start_position.x + (event.client.x - drag.start_client.x) / zoom;
		let y = drag.start_position.y + (event.client.y - drag.start_client.y) / zoom;
		graph.update_item(&drag.id, json!({ "x": x, "y": y }))?;
		Ok(EventFlow::Consumed)
	}

	fn on_pointer_up(&mut self, graph: &mut Graph, _event: &InputEvent) -> GraphResult<EventFlow> {
		self.release(graph)?;
		Ok(EventFlow::Continue)
	}

	fn on_pointer_leave(&mut self, graph: &mut Graph, _event: &InputEvent) -> GraphResult<EventFlow> {
		self.release(graph)?;
		Ok(EventFlow::Continue)
	}
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClickSelectConfig {
	/// Allow several selected nodes, added with shift-click.
	pub multiple: bool,
	pub selected_state: String,
}

impl Default for ClickSelectConfig {
	fn default() -> Self {
		Self {
			multiple: true,
			selected_state: "selected".into(),
		}
	}
}

/// Toggle a selection state on clicked nodes; clicking empty canvas clears it.
#[derive(Debug, Default)]
pub struct ClickSelect {
	config: ClickSelectConfig,
	pressed: Option<(Point, Option<ItemId>)>,
}

impl Configured for ClickSelect {
	type Config = ClickSelectConfig;

	fn with_config(config: ClickSelectConfig) -> Self {
		Self {
			config,
			pressed: None,
		}
	}
}

impl Behavior for ClickSelect {
	fn deactivate(&mut self, _graph: &mut Graph) -> GraphResult<()> {
		self.pressed = None;
		Ok(())
	}

	fn on_pointer_down(&mut self, _graph: &mut Graph, event: &InputEvent) -> GraphResult<EventFlow> {
		self.pressed = Some((event.client, event.target.clone()));
		Ok(EventFlow::Continue)
	}

	fn on_pointer_up(&mut self, graph: &mut Graph, event: &InputEvent) -> GraphResult<EventFlow> {
		let Some((at, target)) = self.pressed.take() else {
			return Ok(EventFlow::Continue);
		};
		if at.distance(event.client) > CLICK_TOLERANCE || target != event.target {
			return Ok(EventFlow::Continue);
		}
		let state = self.config.selected_state.as_str();
		let Some(id) = target else {
			graph.clear_state(state)?;
			return Ok(EventFlow::Continue);
		};
		let selected = graph
			.find_by_id(&id)
			.is_some_and(|item| item.has_state(state));
		if !(self.config.multiple && event.modifiers.shift) {
			let others: Vec<ItemId> = graph
				.find_all_by_state(ItemKind::Node, state)
				.into_iter()
				.map(|item| item.id().to_string())
				.filter(|other| *other != id)
				.collect();
			for other in others {
				graph.set_item_state(&other, state, false)?;
			}
		}
		graph.set_item_state(&id, state, !selected)?;
		Ok(EventFlow::Continue)
	}
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ActivateRelationsConfig {
	pub active_state: String,
	pub inactive_state: String,
}

impl Default for ActivateRelationsConfig {
	fn default() -> Self {
		Self {
			active_state: "active".into(),
			inactive_state: "inactive".into(),
		}
	}
}

/// Highlight the hovered node with its neighbours and edges; dim the rest.
#[derive(Debug, Default)]
pub struct ActivateRelations {
	config: ActivateRelationsConfig,
	focus: Option<ItemId>,
}

impl Configured for ActivateRelations {
	type Config = ActivateRelationsConfig;

	fn with_config(config: ActivateRelationsConfig) -> Self {
		Self {
			config,
			focus: None,
		}
	}
}

impl ActivateRelations {
	fn clear(&mut self, graph: &mut Graph) -> GraphResult<()> {
		self.focus = None;
		graph.clear_state(&self.config.active_state)?;
		graph.clear_state(&self.config.inactive_state)
	}

	fn focus(&mut self, graph: &mut Graph, node: &str) -> GraphResult<()> {
		let mut related: Vec<ItemId> = vec![node.to_string()];
		related.extend(graph.neighbors(node).into_iter().map(|n| n.id().to_string()));
		related.extend(graph.incident_edges(node).into_iter().map(|e| e.id().to_string()));
		let everything: Vec<ItemId> = graph
			.nodes()
			.into_iter()
			.chain(graph.edges())
			.map(|item| item.id().to_string())
			.collect();

		let (active, inactive) = (&self.config.active_state, &self.config.inactive_state);
		for id in everything {
			let on = related.contains(&id);
			graph.set_item_state(&id, active, on)?;
			graph.set_item_state(&id, inactive, !on)?;
		}
		self.focus = Some(node.to_string());
		Ok(())
	}
}

impl Behavior for ActivateRelations {
	fn deactivate(&mut self, graph: &mut Graph) -> GraphResult<()> {
		self.clear(graph)
	}

	fn on_pointer_move(&mut self, graph: &mut Graph, event: &InputEvent) -> GraphResult<EventFlow> {
		if event.target == self.focus {
			return Ok(EventFlow::Continue);
		}
		match event.target.clone() {
			Some(node) => self.focus(graph, &node)?,
			None => self.clear(graph)?,
		}
		Ok(EventFlow::Continue)
	}

	fn on_pointer_leave(&mut self, graph: &mut Graph, _event: &InputEvent) -> GraphResult<EventFlow> {
		if self.focus.is_some() {
			self.clear(graph)?;
		}
		Ok(EventFlow::Continue)
	}
}
