//! Authoritative item storage.
//!
//! Items are keyed by id. Per-kind insertion order is kept separately so
//! lookups by predicate visit items in the order they were added, and a node
//! to incident-edge index makes cascading removal proportional to degree.

use std::collections::{HashMap, HashSet};

use super::error::{GraphError, GraphResult};
use super::item::{EdgeShape, GroupShape, GroupType, Item, ItemKind, ItemShape, NodeShape};
use super::types::{ItemId, ItemModel, Point, Rect};

/// Defaults needed to derive geometry from a model.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeometryConfig {
	/// Radius for nodes whose model has no size.
	pub node_radius: f64,
	/// Attach edges at node centres instead of node boundaries.
	pub link_center: bool,
	/// Space between group bounds and member nodes.
	pub group_padding: f64,
}

impl Default for GeometryConfig {
	fn default() -> Self {
		Self {
			node_radius: 10.0,
			link_center: false,
			group_padding: 10.0,
		}
	}
}

/// Storage for every item in the graph.
#[derive(Debug, Default)]
pub struct ItemRegistry {
	items: HashMap<ItemId, Item>,
	nodes: Vec<ItemId>,
	edges: Vec<ItemId>,
	groups: Vec<ItemId>,
	incident: HashMap<ItemId, Vec<ItemId>>,
	dirty: HashSet<ItemId>,
	draw_order: Vec<ItemId>,
	next_seq: u64,
}

impl ItemRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn len(&self) -> usize {
		self.items.len()
	}

	pub fn is_empty(&self) -> bool {
		self.items.is_empty()
	}

	pub fn contains(&self, id: &str) -> bool {
		self.items.contains_key(id)
	}

	pub fn get(&self, id: &str) -> Option<&Item> {
		self.items.get(id)
	}

	pub(crate) fn get_mut(&mut self, id: &str) -> Option<&mut Item> {
		self.items.get_mut(id)
	}

	/// Ids of one kind, in insertion order.
	pub fn ids(&self, kind: ItemKind) -> &[ItemId] {
		match kind {
			ItemKind::Node => &self.nodes,
			ItemKind::Edge => &self.edges,
			ItemKind::Group => &self.groups,
		}
	}

	/// Items of one kind, in insertion order.
	pub fn iter(&self, kind: ItemKind) -> impl Iterator<Item = &Item> + '_ {
		self.ids(kind).iter().filter_map(|id| self.items.get(id))
	}

	pub fn find(&self, kind: ItemKind, mut pred: impl FnMut(&Item) -> bool) -> Option<&Item> {
		self.iter(kind).find(|item| pred(item))
	}

	pub fn find_all(&self, kind: ItemKind, mut pred: impl FnMut(&Item) -> bool) -> Vec<&Item> {
		self.iter(kind).filter(|item| pred(item)).collect()
	}

	/// Items in the order the last layering pass decided to draw them.
	pub fn draw_order(&self) -> &[ItemId] {
		&self.draw_order
	}

	pub(crate) fn next_seq(&mut self) -> u64 {
		let seq = self.next_seq;
		self.next_seq += 1;
		seq
	}

	/// Check that `model` can be inserted as `kind` right now.
	pub fn validate(&self, kind: ItemKind, model: &ItemModel) -> GraphResult<()> {
		if model.id.is_empty() {
			return Err(GraphError::MissingField { kind, field: "id" });
		}
		if self.items.contains_key(&model.id) {
			return Err(GraphError::DuplicateItem(model.id.clone()));
		}
		match kind {
			ItemKind::Edge => {
				let source = model.source.as_ref().ok_or(GraphError::MissingField {
					kind,
					field: "source",
				})?;
				let target = model.target.as_ref().ok_or(GraphError::MissingField {
					kind,
					field: "target",
				})?;
				self.expect_kind(&model.id, kind, source, ItemKind::Node)?;
				self.expect_kind(&model.id, kind, target, ItemKind::Node)?;
			}
			ItemKind::Node => {
				if let Some(group) = &model.group_id {
					self.expect_kind(&model.id, kind, group, ItemKind::Group)?;
				}
			}
			ItemKind::Group => {}
		}
		Ok(())
	}

	pub(crate) fn expect_kind(
		&self,
		id: &str,
		kind: ItemKind,
		reference: &str,
		expected: ItemKind,
	) -> GraphResult<()> {
		match self.items.get(reference) {
			Some(item) if item.kind() == expected => Ok(()),
			_ => Err(GraphError::InvalidReference {
				item: format!("{kind} `{id}`"),
				reference: reference.to_string(),
			}),
		}
	}

	/// Insert a validated item and wire up its relations.
	pub(crate) fn insert(&mut self, item: Item) -> &Item {
		let id = item.id.clone();
		match &item.shape {
			ItemShape::Node(_) => {
				self.nodes.push(id.clone());
				self.incident.entry(id.clone()).or_default();
				if let Some(group) = item.model.group_id.clone() {
					self.join_group(&id, &group);
				}
			}
			ItemShape::Edge(edge) => {
				self.edges.push(id.clone());
				self.link(&edge.source, &id);
				if edge.target != edge.source {
					self.link(&edge.target, &id);
				}
			}
			ItemShape::Group(_) => self.groups.push(id.clone()),
		}
		self.dirty.insert(id.clone());
		self.items.entry(id).or_insert(item)
	}

	/// Remove an item, cascading to edges that reference a removed node.
	///
	/// Returns every removed item, cascaded edges first. Unknown ids yield an
	/// empty list.
	pub(crate) fn remove(&mut self, id: &str) -> Vec<Item> {
		let Some(kind) = self.items.get(id).map(Item::kind) else {
			return Vec::new();
		};
		let mut removed = Vec::new();
		match kind {
			ItemKind::Node => {
				for edge in self.incident.remove(id).unwrap_or_default() {
					removed.extend(self.remove_edge(&edge));
				}
				if let Some(group) = self.items.get(id).and_then(|n| n.model.group_id.clone()) {
					self.leave_group(id, &group);
				}
				self.nodes.retain(|n| n != id);
			}
			ItemKind::Edge => {
				removed.extend(self.remove_edge(id));
				return removed;
			}
			ItemKind::Group => {
				let members = match self.items.get(id).map(|g| &g.shape) {
					Some(ItemShape::Group(g)) => g.members.clone(),
					_ => Vec::new(),
				};
				for member in members {
					if let Some(node) = self.items.get_mut(&member) {
						node.model.group_id = None;
						self.dirty.insert(member);
					}
				}
				self.groups.retain(|g| g != id);
			}
		}
		self.dirty.remove(id);
		self.draw_order.retain(|d| d != id);
		removed.extend(self.items.remove(id));
		removed
	}

	fn remove_edge(&mut self, id: &str) -> Option<Item> {
		let edge = self.items.remove(id)?;
		if let ItemShape::Edge(shape) = &edge.shape {
			self.unlink(&shape.source, id);
			self.unlink(&shape.target, id);
		}
		self.edges.retain(|e| e != id);
		self.dirty.remove(id);
		self.draw_order.retain(|d| d != id);
		Some(edge)
	}

	fn link(&mut self, node: &str, edge: &str) {
		self.incident
			.entry(node.to_string())
			.or_default()
			.push(edge.to_string());
	}

	fn unlink(&mut self, node: &str, edge: &str) {
		if let Some(edges) = self.incident.get_mut(node) {
			edges.retain(|e| e != edge);
		}
	}

	fn join_group(&mut self, node: &str, group: &str) {
		if let Some(ItemShape::Group(g)) = self.items.get_mut(group).map(|g| &mut g.shape) {
			if !g.members.iter().any(|m| m == node) {
				g.members.push(node.to_string());
			}
			self.dirty.insert(group.to_string());
		}
	}

	fn leave_group(&mut self, node: &str, group: &str) {
		if let Some(ItemShape::Group(g)) = self.items.get_mut(group).map(|g| &mut g.shape) {
			g.members.retain(|m| m != node);
			self.dirty.insert(group.to_string());
		}
	}

	/// Re-point an edge. Both endpoints must already be validated as nodes.
	pub(crate) fn set_endpoints(&mut self, edge: &str, source: &str, target: &str) {
		let old = match self.items.get(edge).map(|e| &e.shape) {
			Some(ItemShape::Edge(shape)) => (shape.source.clone(), shape.target.clone()),
			_ => return,
		};
		if old.0 == source && old.1 == target {
			return;
		}
		self.unlink(&old.0, edge);
		self.unlink(&old.1, edge);
		self.link(source, edge);
		if source != target {
			self.link(target, edge);
		}
		if let Some(ItemShape::Edge(shape)) = self.items.get_mut(edge).map(|e| &mut e.shape) {
			shape.source = source.to_string();
			shape.target = target.to_string();
		}
		self.dirty.insert(edge.to_string());
	}

	/// Move a node to another group (or none). The group must exist.
	pub(crate) fn set_group(&mut self, node: &str, group: Option<&str>) {
		let Some(current) = self.items.get(node).map(|n| n.model.group_id.clone()) else {
			return;
		};
		if current.as_deref() == group {
			return;
		}
		if let Some(old) = &current {
			self.leave_group(node, old);
		}
		if let Some(new) = group {
			self.join_group(node, new);
		}
		if let Some(item) = self.items.get_mut(node) {
			item.model.group_id = group.map(str::to_string);
		}
		self.dirty.insert(node.to_string());
	}

	/// Edges with `node` as source or target, in the order they were linked.
	pub fn incident_edges(&self, node: &str) -> &[ItemId] {
		self.incident.get(node).map(Vec::as_slice).unwrap_or_default()
	}

	/// Nodes sharing an edge with `node`, without duplicates.
	pub fn neighbors(&self, node: &str) -> Vec<ItemId> {
		let mut out: Vec<ItemId> = Vec::new();
		for edge in self.incident_edges(node) {
			let Some(ItemShape::Edge(shape)) = self.items.get(edge).map(|e| &e.shape) else {
				continue;
			};
			let other = if shape.source == node {
				&shape.target
			} else {
				&shape.source
			};
			if other != node && !out.contains(other) {
				out.push(other.clone());
			}
		}
		out
	}

	pub(crate) fn mark_dirty(&mut self, id: &str) {
		if self.items.contains_key(id) {
			self.dirty.insert(id.to_string());
		}
	}

	pub(crate) fn take_dirty(&mut self) -> HashSet<ItemId> {
		std::mem::take(&mut self.dirty)
	}

	/// Recompute the draw order.
	///
	/// Grouped by type: groups, then edges, then nodes, each in insertion
	/// order. Otherwise everything is drawn in global insertion order.
	pub(crate) fn rebuild_draw_order(&mut self, group_by_types: bool) {
		self.draw_order = if group_by_types {
			self.groups
				.iter()
				.chain(&self.edges)
				.chain(&self.nodes)
				.cloned()
				.collect()
		} else {
			let mut all: Vec<(u64, ItemId)> = self
				.items
				.values()
				.map(|item| (item.seq, item.id.clone()))
				.collect();
			all.sort_unstable_by_key(|(seq, _)| *seq);
			all.into_iter().map(|(_, id)| id).collect()
		};
	}

	/// Topmost node whose rendered circle contains `p` (viewport space).
	///
	/// Walks nodes in reverse insertion order regardless of layering.
	pub fn node_at(&self, p: Point) -> Option<&Item> {
		self.nodes.iter().rev().filter_map(|id| self.items.get(id)).find(|item| {
			matches!(&item.shape, ItemShape::Node(n) if n.center.distance(p) <= n.radius)
		})
	}

	/// Bounds of every node and group, if any exist.
	pub fn bounds(&self) -> Option<Rect> {
		self.iter(ItemKind::Node)
			.chain(self.iter(ItemKind::Group))
			.map(Item::bounds)
			.reduce(Rect::union)
	}

	pub(crate) fn refresh_node(&mut self, id: &str, cfg: &GeometryConfig) {
		if let Some(item) = self.items.get_mut(id) {
			let center = item.model.position().unwrap_or_default();
			let radius = item
				.model
				.size
				.map(|s| s.radius())
				.unwrap_or(cfg.node_radius);
			if let ItemShape::Node(shape) = &mut item.shape {
				*shape = NodeShape { center, radius };
			}
		}
	}

	/// Set a node's position in both model and rendered geometry.
	pub(crate) fn place_node(&mut self, id: &str, p: Point) {
		if let Some(item) = self.items.get_mut(id) {
			item.model.set_position(p);
			if let ItemShape::Node(shape) = &mut item.shape {
				shape.center = p;
			}
			self.dirty.insert(id.to_string());
		}
	}

	pub(crate) fn refresh_edge(&mut self, id: &str, cfg: &GeometryConfig) {
		let Some(ItemShape::Edge(edge)) = self.items.get(id).map(|e| &e.shape) else {
			return;
		};
		let circle = |node: &str| match self.items.get(node).map(|n| &n.shape) {
			Some(ItemShape::Node(n)) => (n.center, n.radius),
			_ => (Point::default(), 0.0),
		};
		let ((s, rs), (t, rt)) = (circle(&edge.source), circle(&edge.target));
		let dist = s.distance(t);
		let (start, end) = if cfg.link_center || dist <= rs + rt || edge.source == edge.target {
			(s, t)
		} else {
			let (ux, uy) = ((t.x - s.x) / dist, (t.y - s.y) / dist);
			(
				Point::new(s.x + ux * rs, s.y + uy * rs),
				Point::new(t.x - ux * rt, t.y - uy * rt),
			)
		};
		if let Some(ItemShape::Edge(edge)) = self.items.get_mut(id).map(|e| &mut e.shape) {
			edge.start = start;
			edge.end = end;
		}
	}

	pub(crate) fn refresh_group(&mut self, id: &str, cfg: &GeometryConfig) {
		let Some(item) = self.items.get(id) else {
			return;
		};
		let ItemShape::Group(group) = &item.shape else {
			return;
		};
		let bounds = group
			.members
			.iter()
			.filter_map(|m| self.items.get(m))
			.map(Item::bounds)
			.reduce(Rect::union)
			.map(|r| r.expand(cfg.group_padding))
			.unwrap_or_else(|| {
				Rect::around(item.model.position().unwrap_or_default(), cfg.group_padding)
			});
		if let Some(ItemShape::Group(group)) = self.items.get_mut(id).map(|g| &mut g.shape) {
			group.bounds = bounds;
		}
	}

	/// Recompute every item's geometry from its model.
	pub(crate) fn refresh_all(&mut self, cfg: &GeometryConfig) {
		for id in self.nodes.clone() {
			self.refresh_node(&id, cfg);
		}
		self.refresh_derived(cfg);
	}

	/// Recompute edge and group geometry from current node geometry.
	pub(crate) fn refresh_derived(&mut self, cfg: &GeometryConfig) {
		for id in self.edges.clone() {
			self.refresh_edge(&id, cfg);
		}
		for id in self.groups.clone() {
			self.refresh_group(&id, cfg);
		}
	}

	/// Recompute geometry that depends on the given items: the items
	/// themselves (edges and groups only; node geometry is set eagerly),
	/// edges touching dirty nodes, and groups containing them.
	pub(crate) fn refresh_dependents(&mut self, dirty: &HashSet<ItemId>, cfg: &GeometryConfig) {
		let mut edges: Vec<ItemId> = Vec::new();
		let mut groups: Vec<ItemId> = Vec::new();
		for id in dirty {
			let Some(item) = self.items.get(id) else {
				continue;
			};
			match &item.shape {
				ItemShape::Node(_) => {
					edges.extend(self.incident_edges(id).iter().cloned());
					groups.extend(item.model.group_id.iter().cloned());
				}
				ItemShape::Edge(_) => edges.push(id.clone()),
				ItemShape::Group(_) => groups.push(id.clone()),
			}
		}
		edges.sort_unstable();
		edges.dedup();
		groups.sort_unstable();
		groups.dedup();
		for id in &edges {
			self.refresh_edge(id, cfg);
		}
		for id in &groups {
			self.refresh_group(id, cfg);
		}
	}

	pub(crate) fn clear(&mut self) {
		let next_seq = self.next_seq;
		*self = Self::default();
		self.next_seq = next_seq;
	}
}

/// Fresh shape for a model of the given kind; geometry is filled in by the
/// refresh passes.
pub(crate) fn shape_for(kind: ItemKind, model: &ItemModel, group_type: GroupType) -> ItemShape {
	match kind {
		ItemKind::Node => ItemShape::Node(NodeShape {
			center: model.position().unwrap_or_default(),
			radius: 0.0,
		}),
		ItemKind::Edge => ItemShape::Edge(EdgeShape {
			source: model.source.clone().unwrap_or_default(),
			target: model.target.clone().unwrap_or_default(),
			start: Point::default(),
			end: Point::default(),
		}),
		ItemKind::Group => ItemShape::Group(GroupShape {
			members: Vec::new(),
			bounds: Rect::default(),
			group_type,
		}),
	}
}
