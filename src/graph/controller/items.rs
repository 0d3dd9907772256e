use log::{debug, warn};
use serde_json::Value;

use super::Graph;
use crate::graph::error::{GraphError, GraphResult};
use crate::graph::events::GraphEvent;
use crate::graph::item::{GroupType, Item, ItemKind, ItemShape};
use crate::graph::registry::shape_for;
use crate::graph::scheduler::Dirty;
use crate::graph::types::{ItemId, ItemModel, Point};

impl Graph {
	/// Add a node, edge or group.
	///
	/// Edges without an id get `source->target` (suffixed on collision).
	/// Nothing is inserted if validation fails.
	pub fn add_item(&mut self, kind: ItemKind, model: ItemModel) -> GraphResult<&Item> {
		let model = self.prepare_model(kind, model, |id| self.registry.contains(id));
		self.registry.validate(kind, &model)?;
		let id = self.insert_model(kind, model, self.options.group_type);
		self.scheduler.request(Dirty::LAYERING | Dirty::ITEMS);
		debug!("graph: added {kind} `{id}`");
		self.emit(GraphEvent::AfterAddItem {
			id: id.clone(),
			kind,
		});
		self.registry
			.get(&id)
			.ok_or(GraphError::ItemNotFound(id))
	}

	/// Apply the per-kind mapper and fill in a missing edge id not `taken`.
	pub(super) fn prepare_model(
		&self,
		kind: ItemKind,
		mut model: ItemModel,
		taken: impl Fn(&str) -> bool,
	) -> ItemModel {
		let mapper = match kind {
			ItemKind::Node => self.node_mapper.as_ref(),
			ItemKind::Edge => self.edge_mapper.as_ref(),
			ItemKind::Group => None,
		};
		if let Some(mapper) = mapper {
			mapper(&mut model);
		}
		if kind == ItemKind::Edge && model.id.is_empty() {
			if let (Some(s), Some(t)) = (&model.source, &model.target) {
				let base = format!("{s}->{t}");
				let mut id = base.clone();
				let mut n = 1;
				while taken(&id) {
					id = format!("{base}#{n}");
					n += 1;
				}
				model.id = id;
			}
		}
		model
	}

	/// Insert an already validated model and derive its style and geometry.
	pub(super) fn insert_model(&mut self, kind: ItemKind, model: ItemModel, group_type: GroupType) -> ItemId {
		let seq = self.registry.next_seq();
		let shape = shape_for(kind, &model, group_type);
		let id = self.registry.insert(Item::new(seq, model, shape)).id.clone();
		self.refresh_geometry(&id);
		self.restyle(&id);
		id
	}

	/// Merge `patch` (a JSON object) into an item's model.
	///
	/// Edge endpoints and node groups are re-validated; on failure the item
	/// is left untouched.
	pub fn update_item(&mut self, id: &str, patch: Value) -> GraphResult<()> {
		let Value::Object(patch) = patch else {
			return Err(GraphError::InvalidPatch);
		};
		let item = self
			.registry
			.get(id)
			.ok_or_else(|| GraphError::ItemNotFound(id.to_string()))?;
		let mut model = item.model.clone();
		model.merge(&patch)?;
		if patch.contains_key("x") || patch.contains_key("y") {
			self.animation.drop_item(id);
		}
		self.replace_model(id, model)
	}

	/// Swap in a new model for an existing item, keeping identity and kind.
	pub(super) fn replace_model(&mut self, id: &str, mut model: ItemModel) -> GraphResult<()> {
		let kind = self
			.registry
			.get(id)
			.map(Item::kind)
			.ok_or_else(|| GraphError::ItemNotFound(id.to_string()))?;
		model.id = id.to_string();
		self.check_references(kind, &model)?;

		match kind {
			ItemKind::Node => self.registry.set_group(id, model.group_id.as_deref()),
			ItemKind::Edge => {
				if let (Some(s), Some(t)) = (&model.source, &model.target) {
					self.registry.set_endpoints(id, s, t);
				}
			}
			ItemKind::Group => {}
		}
		if let Some(item) = self.registry.get_mut(id) {
			item.model = model;
		}
		self.refresh_geometry(id);
		self.restyle(id);
		self.scheduler.request(Dirty::ITEMS);
		self.emit(GraphEvent::AfterUpdateItem { id: id.to_string() });
		Ok(())
	}

	fn check_references(&self, kind: ItemKind, model: &ItemModel) -> GraphResult<()> {
		match kind {
			ItemKind::Edge => {
				for (field, reference) in [("source", &model.source), ("target", &model.target)] {
					let reference = reference
						.as_deref()
						.ok_or(GraphError::MissingField { kind, field })?;
					self.registry
						.expect_kind(&model.id, kind, reference, ItemKind::Node)?;
				}
			}
			ItemKind::Node => {
				if let Some(group) = &model.group_id {
					self.registry
						.expect_kind(&model.id, kind, group, ItemKind::Group)?;
				}
			}
			ItemKind::Group => {}
		}
		Ok(())
	}

	/// Remove an item. Removing a node also removes its edges and leaves its
	/// group; removing a group releases its members. Missing ids are ignored.
	///
	/// Returns whether anything was removed.
	pub fn remove_item(&mut self, id: &str) -> bool {
		let removed = self.registry.remove(id);
		if removed.is_empty() {
			warn!("graph: remove of missing item `{id}` ignored");
			return false;
		}
		for item in &removed {
			self.states
				.remove_item(&item.id, item.states.iter().map(String::as_str));
			self.animation.drop_item(&item.id);
		}
		self.scheduler.request(Dirty::LAYERING | Dirty::ITEMS);
		debug!("graph: removed `{id}` ({} item(s))", removed.len());
		for item in removed {
			let kind = item.kind();
			self.emit(GraphEvent::AfterRemoveItem { id: item.id, kind });
		}
		true
	}

	/// Re-resolve one item's style and geometry from its model.
	pub fn refresh_item(&mut self, id: &str) -> GraphResult<()> {
		if !self.registry.contains(id) {
			return Err(GraphError::ItemNotFound(id.to_string()));
		}
		self.refresh_geometry(id);
		self.restyle(id);
		self.scheduler.request(Dirty::ITEMS);
		Ok(())
	}

	pub(super) fn refresh_geometry(&mut self, id: &str) {
		let Some(kind) = self.registry.get(id).map(Item::kind) else {
			return;
		};
		match kind {
			ItemKind::Node => self.registry.refresh_node(id, &self.geometry),
			ItemKind::Edge => self.registry.refresh_edge(id, &self.geometry),
			ItemKind::Group => self.registry.refresh_group(id, &self.geometry),
		}
		self.registry.mark_dirty(id);
	}

	pub(super) fn restyle(&mut self, id: &str) {
		let Some(item) = self.registry.get(id) else {
			return;
		};
		let style = self.style_defaults.resolve(
			item.kind(),
			&item.model,
			&item.states,
			self.styles.as_ref(),
		);
		if let Some(item) = self.registry.get_mut(id) {
			item.style = style;
		}
		self.registry.mark_dirty(id);
	}

	pub(super) fn restyle_all(&mut self) {
		for kind in [ItemKind::Group, ItemKind::Edge, ItemKind::Node] {
			for id in self.registry.ids(kind).to_vec() {
				self.restyle(&id);
			}
		}
	}

	/// Look an item up by id.
	pub fn find_by_id(&self, id: &str) -> Option<&Item> {
		self.registry.get(id)
	}

	/// First item of `kind` matching `pred`, in insertion order.
	pub fn find(&self, kind: ItemKind, pred: impl FnMut(&Item) -> bool) -> Option<&Item> {
		self.registry.find(kind, pred)
	}

	/// Every item of `kind` matching `pred`, in insertion order.
	pub fn find_all(&self, kind: ItemKind, pred: impl FnMut(&Item) -> bool) -> Vec<&Item> {
		self.registry.find_all(kind, pred)
	}

	/// Items of `kind` currently in `state`, in the order they entered it.
	pub fn find_all_by_state(&self, kind: ItemKind, state: &str) -> Vec<&Item> {
		self.states
			.members(state)
			.iter()
			.filter_map(|id| self.registry.get(id))
			.filter(|item| item.kind() == kind)
			.collect()
	}

	/// Nodes in insertion order.
	pub fn nodes(&self) -> Vec<&Item> {
		self.registry.iter(ItemKind::Node).collect()
	}

	/// Edges in insertion order.
	pub fn edges(&self) -> Vec<&Item> {
		self.registry.iter(ItemKind::Edge).collect()
	}

	/// Groups in insertion order.
	pub fn groups(&self) -> Vec<&Item> {
		self.registry.iter(ItemKind::Group).collect()
	}

	/// Nodes sharing an edge with `node`.
	pub fn neighbors(&self, node: &str) -> Vec<&Item> {
		self.registry
			.neighbors(node)
			.iter()
			.filter_map(|id| self.registry.get(id))
			.collect()
	}

	/// Edges with `node` as source or target.
	pub fn incident_edges(&self, node: &str) -> Vec<&Item> {
		self.registry
			.incident_edges(node)
			.iter()
			.filter_map(|id| self.registry.get(id))
			.collect()
	}

	/// Topmost node at a viewport point.
	pub fn node_at(&self, point: Point) -> Option<&Item> {
		self.registry.node_at(point)
	}

	/// Turn a named state on or off for one item and re-resolve its style.
	///
	/// Re-enabling an active state makes it the most recent one.
	pub fn set_item_state(&mut self, id: &str, state: &str, enabled: bool) -> GraphResult<()> {
		let item = self
			.registry
			.get_mut(id)
			.ok_or_else(|| GraphError::ItemNotFound(id.to_string()))?;
		let changed = if enabled {
			if item.states.last().is_some_and(|s| s == state) {
				false
			} else {
				item.states.retain(|s| s != state);
				item.states.push(state.to_string());
				true
			}
		} else {
			let before = item.states.len();
			item.states.retain(|s| s != state);
			item.states.len() != before
		};
		self.states.set(id, state, enabled);
		if !changed {
			return Ok(());
		}
		self.restyle(id);
		self.scheduler.request(Dirty::ITEMS);
		self.emit(GraphEvent::AfterItemStateChange {
			id: id.to_string(),
			state: state.to_string(),
			enabled,
		});
		Ok(())
	}

	/// Turn off the listed states for one item, or every state if `states`
	/// is empty.
	pub fn clear_item_states(&mut self, id: &str, states: &[&str]) -> GraphResult<()> {
		let item = self
			.registry
			.get(id)
			.ok_or_else(|| GraphError::ItemNotFound(id.to_string()))?;
		let targets: Vec<String> = if states.is_empty() {
			item.states.clone()
		} else {
			states.iter().map(|s| s.to_string()).collect()
		};
		for state in targets {
			self.set_item_state(id, &state, false)?;
		}
		Ok(())
	}

	/// Clear `state` from every item holding it.
	pub fn clear_state(&mut self, state: &str) -> GraphResult<()> {
		for id in self.states.members(state).to_vec() {
			self.set_item_state(&id, state, false)?;
		}
		Ok(())
	}

	pub(super) fn set_group_type(&mut self, id: &str, group_type: GroupType) {
		if let Some(item) = self.registry.get_mut(id) {
			if let ItemShape::Group(group) = &mut item.shape {
				group.group_type = group_type;
			}
		}
		self.registry.mark_dirty(id);
	}
}
