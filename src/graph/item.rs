//! Items: nodes, edges and groups as one tagged record.
//!
//! Every item carries the same identity, model, style and state fields; what
//! differs per kind lives in [`ItemShape`]. Edge endpoints and group members
//! are stored as ids and resolved through the registry on demand.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::types::{ItemId, ItemModel, Point, Rect, Style};

/// The three item kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
	/// A positioned vertex.
	Node,
	/// A link between two nodes.
	Edge,
	/// A container around member nodes.
	Group,
}

impl fmt::Display for ItemKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			ItemKind::Node => "node",
			ItemKind::Edge => "edge",
			ItemKind::Group => "group",
		})
	}
}

/// Visual container type for groups.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupType {
	/// Circle enclosing the member bounds.
	#[default]
	Circle,
	/// Member bounds as a rectangle.
	Rect,
}

/// Rendered node geometry.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeShape {
	/// Centre in viewport space.
	pub center: Point,
	/// Radius in viewport units.
	pub radius: f64,
}

/// Rendered edge geometry plus endpoint back-references.
#[derive(Clone, Debug, PartialEq)]
pub struct EdgeShape {
	/// Source node id.
	pub source: ItemId,
	/// Target node id.
	pub target: ItemId,
	/// Attachment point on the source.
	pub start: Point,
	/// Attachment point on the target.
	pub end: Point,
}

/// Rendered group geometry plus direct members in join order.
#[derive(Clone, Debug, PartialEq)]
pub struct GroupShape {
	/// Member node ids.
	pub members: Vec<ItemId>,
	/// Padded bounds of the members.
	pub bounds: Rect,
	/// Container shape.
	pub group_type: GroupType,
}

/// Kind-specific payload of an [`Item`].
#[derive(Clone, Debug, PartialEq)]
pub enum ItemShape {
	/// Node geometry.
	Node(NodeShape),
	/// Edge geometry.
	Edge(EdgeShape),
	/// Group geometry.
	Group(GroupShape),
}

/// A registered graph item.
///
/// Owned by the registry; callers get shared references and mutate through
/// [`Graph`](super::Graph) operations only.
#[derive(Clone, Debug)]
pub struct Item {
	pub(crate) id: ItemId,
	pub(crate) seq: u64,
	pub(crate) model: ItemModel,
	pub(crate) style: Style,
	pub(crate) states: Vec<String>,
	pub(crate) shape: ItemShape,
}

impl Item {
	pub(crate) fn new(seq: u64, model: ItemModel, shape: ItemShape) -> Self {
		Self {
			id: model.id.clone(),
			seq,
			model,
			style: Style::new(),
			states: Vec::new(),
			shape,
		}
	}

	/// Stable item id.
	pub fn id(&self) -> &str {
		&self.id
	}

	/// Node, edge or group.
	pub fn kind(&self) -> ItemKind {
		match self.shape {
			ItemShape::Node(_) => ItemKind::Node,
			ItemShape::Edge(_) => ItemKind::Edge,
			ItemShape::Group(_) => ItemKind::Group,
		}
	}

	/// The item's data model.
	pub fn model(&self) -> &ItemModel {
		&self.model
	}

	/// Style resolved from defaults, the model and every active state.
	pub fn style(&self) -> &Style {
		&self.style
	}

	/// Active states, least recently enabled first.
	pub fn states(&self) -> &[String] {
		&self.states
	}

	/// Whether `state` is active.
	pub fn has_state(&self, state: &str) -> bool {
		self.states.iter().any(|s| s == state)
	}

	/// Current geometry.
	pub fn shape(&self) -> &ItemShape {
		&self.shape
	}

	/// Node geometry, if this is a node.
	pub fn as_node(&self) -> Option<&NodeShape> {
		match &self.shape {
			ItemShape::Node(n) => Some(n),
			_ => None,
		}
	}

	/// Edge geometry, if this is an edge.
	pub fn as_edge(&self) -> Option<&EdgeShape> {
		match &self.shape {
			ItemShape::Edge(e) => Some(e),
			_ => None,
		}
	}

	/// Group geometry, if this is a group.
	pub fn as_group(&self) -> Option<&GroupShape> {
		match &self.shape {
			ItemShape::Group(g) => Some(g),
			_ => None,
		}
	}

	/// Bounds of the rendered geometry in viewport space.
	pub fn bounds(&self) -> Rect {
		match &self.shape {
			ItemShape::Node(n) => Rect::around(n.center, n.radius),
			ItemShape::Edge(e) => Rect {
				min_x: e.start.x.min(e.end.x),
				min_y: e.start.y.min(e.end.y),
				max_x: e.start.x.max(e.end.x),
				max_y: e.start.y.max(e.end.y),
			},
			ItemShape::Group(g) => g.bounds,
		}
	}
}
