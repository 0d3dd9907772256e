use std::collections::HashMap;

use log::{debug, info};

use super::Graph;
use crate::graph::error::GraphResult;
use crate::graph::events::GraphEvent;
use crate::graph::item::{GroupType, Item, ItemKind};
use crate::graph::layout::{LayoutConfig, LayoutEdge, LayoutNode, LayoutRequest};
use crate::graph::registry::{ItemRegistry, shape_for};
use crate::graph::scheduler::Dirty;
use crate::graph::types::{GraphData, ItemId, ItemModel, Point};

/// Kinds in the order a payload is applied.
const PAYLOAD_ORDER: [ItemKind; 3] = [ItemKind::Group, ItemKind::Node, ItemKind::Edge];

fn payload_of(data: GraphData) -> [(ItemKind, Vec<ItemModel>); 3] {
	[
		(ItemKind::Group, data.groups),
		(ItemKind::Node, data.nodes),
		(ItemKind::Edge, data.edges),
	]
}

impl Graph {
	/// Stage a payload without rendering it. The next [`render`](Self::render)
	/// builds the scene from it.
	pub fn data(&mut self, data: GraphData) {
		self.pending_data = Some(data);
	}

	/// [`data`](Self::data) followed by [`render`](Self::render).
	pub fn read(&mut self, data: GraphData) -> GraphResult<()> {
		self.data(data);
		self.render()
	}

	/// Rebuild the scene from the staged payload (or the current items),
	/// run the layout and schedule a full paint.
	///
	/// The payload is validated as a whole first; on failure the current
	/// scene is kept.
	pub fn render(&mut self) -> GraphResult<()> {
		let data = match self.pending_data.take() {
			Some(data) => data,
			None => self.save(),
		};
		let staged = match self.stage(data.clone()) {
			Ok(staged) => staged,
			Err(err) => {
				self.pending_data = Some(data);
				return Err(err);
			}
		};
		self.animation.stop();
		self.states.clear();
		self.registry = staged;
		self.restyle_all();
		// a failed layout still leaves the new scene drawn at model positions
		let laid_out = self.run_layout();
		self.registry.refresh_all(&self.geometry);
		self.scheduler.request(Dirty::FULL);
		laid_out?;
		if self.options.fit_view {
			self.fit_view();
		}
		info!(
			"graph: rendered {} nodes, {} edges, {} groups",
			self.registry.ids(ItemKind::Node).len(),
			self.registry.ids(ItemKind::Edge).len(),
			self.registry.ids(ItemKind::Group).len()
		);
		self.emit(GraphEvent::AfterRender);
		Ok(())
	}

	/// Validate a payload on its own and build the registry it describes.
	fn stage(&self, data: GraphData) -> GraphResult<ItemRegistry> {
		let mut staged = ItemRegistry::new();
		for (kind, models) in payload_of(data) {
			for model in models {
				let model = self.prepare_model(kind, model, |id| staged.contains(id));
				staged.validate(kind, &model)?;
				let seq = staged.next_seq();
				let shape = shape_for(kind, &model, self.options.group_type);
				staged.insert(Item::new(seq, model, shape));
			}
		}
		Ok(staged)
	}

	/// Replace the scene with `data` by diffing on item ids.
	///
	/// Items present in both keep their states and any in-flight animation;
	/// items only in the old scene are removed; items only in `data` are
	/// added. Nothing changes if `data` is inconsistent.
	pub fn change_data(&mut self, data: GraphData) -> GraphResult<()> {
		let staged = self.stage(data)?;
		let stale = |kind: ItemKind, registry: &ItemRegistry| -> Vec<ItemId> {
			registry
				.ids(kind)
				.iter()
				.filter(|id| staged.get(id).is_none_or(|item| item.kind() != kind))
				.cloned()
				.collect()
		};

		let (mut added, mut updated) = (0usize, 0usize);
		let mut removed = 0usize;
		for id in stale(ItemKind::Edge, &self.registry) {
			removed += usize::from(self.remove_item(&id));
		}
		let mut moves: Vec<(ItemId, Point, Point)> = Vec::new();
		for kind in PAYLOAD_ORDER {
			for item in staged.iter(kind) {
				let mut model = item.model.clone();
				let existing = self.registry.get(item.id()).filter(|old| old.kind() == kind);
				let Some(old) = existing else {
					if self.registry.contains(item.id()) {
						self.remove_item(item.id());
					}
					self.insert_model(kind, model, self.options.group_type);
					self.emit(GraphEvent::AfterAddItem {
						id: item.id.clone(),
						kind,
					});
					added += 1;
					continue;
				};
				if kind == ItemKind::Node {
					let rendered = old.as_node().map(|n| n.center).unwrap_or_default();
					let tracking = self.animation.is_tracking(item.id());
					match model.position() {
						None => model.set_position(rendered),
						Some(to) if tracking || (self.options.animate && to != rendered) => {
							moves.push((item.id.clone(), rendered, to));
							model.set_position(rendered);
						}
						Some(_) => {}
					}
				}
				self.replace_model(item.id(), model)?;
				updated += 1;
			}
		}
		// stale nodes go only after kept edges are re-pointed
		for id in stale(ItemKind::Node, &self.registry) {
			removed += usize::from(self.remove_item(&id));
		}
		for id in stale(ItemKind::Group, &self.registry) {
			removed += usize::from(self.remove_item(&id));
		}

		let was_animating = self.animation.is_animating();
		for (id, from, to) in moves {
			self.animation.animate_to(&id, from, to);
		}
		if !was_animating && self.animation.is_animating() {
			self.emit(GraphEvent::AnimateStart);
		}
		if self.run_layout()? {
			self.after_layout();
		} else {
			self.scheduler.request(Dirty::FULL);
		}
		info!("graph: changeData added {added}, updated {updated}, removed {removed}");
		self.emit(GraphEvent::AfterChangeData);
		Ok(())
	}

	/// Remove every item and state. The viewport is left alone.
	pub fn clear(&mut self) {
		self.animation.stop();
		self.registry.clear();
		self.states.clear();
		self.pending_data = None;
		self.scheduler.request(Dirty::FULL);
		debug!("graph: cleared");
	}

	/// Current items as a payload, each kind in insertion order.
	pub fn save(&self) -> GraphData {
		let models = |kind| {
			self.registry
				.iter(kind)
				.map(|item| item.model.clone())
				.collect()
		};
		GraphData {
			nodes: models(ItemKind::Node),
			edges: models(ItemKind::Edge),
			groups: models(ItemKind::Group),
		}
	}

	/// Render the payload's groups as containers of `group_type` and move
	/// the payload's nodes into them. Nodes must already exist.
	pub fn render_custom_group(&mut self, data: &GraphData, group_type: GroupType) -> GraphResult<()> {
		for model in &data.groups {
			if self.registry.get(&model.id).is_some_and(|g| g.kind() == ItemKind::Group) {
				self.set_group_type(&model.id, group_type);
				continue;
			}
			self.registry.validate(ItemKind::Group, model)?;
			let id = self.insert_model(ItemKind::Group, model.clone(), group_type);
			self.emit(GraphEvent::AfterAddItem {
				id,
				kind: ItemKind::Group,
			});
		}
		for node in &data.nodes {
			let Some(group) = &node.group_id else {
				continue;
			};
			let Some(current) = self.registry.get(&node.id) else {
				continue;
			};
			let mut model = current.model.clone();
			model.group_id = Some(group.clone());
			self.replace_model(&node.id, model)?;
		}
		self.scheduler.request(Dirty::LAYERING | Dirty::ITEMS);
		Ok(())
	}

	/// Run the layout provider (if any) and write its output into node
	/// models. Rendered geometry is left for the caller to update.
	pub(super) fn run_layout(&mut self) -> GraphResult<bool> {
		let Some(provider) = self.layout.as_mut() else {
			return Ok(false);
		};
		let config = self.options.layout.clone().unwrap_or_else(LayoutConfig::default);
		let nodes: Vec<LayoutNode> = self
			.registry
			.iter(ItemKind::Node)
			.map(|item| LayoutNode {
				id: item.id.clone(),
				position: item.model.position(),
				radius: item
					.as_node()
					.map(|n| n.radius)
					.unwrap_or(self.geometry.node_radius),
			})
			.collect();
		let edges: Vec<LayoutEdge> = self
			.registry
			.iter(ItemKind::Edge)
			.filter_map(Item::as_edge)
			.map(|e| LayoutEdge {
				source: e.source.clone(),
				target: e.target.clone(),
			})
			.collect();
		let positions: HashMap<ItemId, Point> = provider.layout(LayoutRequest {
			nodes: &nodes,
			edges: &edges,
			width: self.viewport.width(),
			height: self.viewport.height(),
			config: &config,
		})?;
		debug!("graph: layout `{}` placed {} node(s)", config.kind, positions.len());
		for (id, p) in positions {
			if let Some(item) = self.registry.get_mut(&id) {
				if item.kind() == ItemKind::Node {
					item.model.set_position(p);
				}
			}
		}
		Ok(true)
	}

	/// Re-run the layout on the current scene. With `animate` set the nodes
	/// travel to their new positions; otherwise they jump there.
	pub fn layout(&mut self) -> GraphResult<()> {
		if self.run_layout()? {
			self.after_layout();
		}
		Ok(())
	}

	fn after_layout(&mut self) {
		if self.options.animate {
			self.positions_animate();
		} else {
			self.refresh_positions();
		}
	}
}
