//! Graph data payloads and the per-item data model.
//!
//! Payloads use the `{ nodes, edges, groups }` JSON shape. Edges may also be
//! supplied under `links`, the key the standalone visualiser used.

use std::collections::BTreeMap;
use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::error::{GraphError, GraphResult};

/// Stable item identity.
pub type ItemId = String;

/// Resolved or partial visual style: a flat map of style keys.
pub type Style = Map<String, Value>;

/// A 2D point. The coordinate space depends on context.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
	/// Horizontal coordinate.
	pub x: f64,
	/// Vertical coordinate.
	pub y: f64,
}

impl Point {
	/// Point at `(x, y)`.
	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	/// Euclidean distance.
	pub fn distance(self, other: Point) -> f64 {
		let (dx, dy) = (other.x - self.x, other.y - self.y);
		(dx * dx + dy * dy).sqrt()
	}

	/// Linear interpolation; `t = 0` is `self`, `t = 1` is `other`.
	pub fn lerp(self, other: Point, t: f64) -> Point {
		Point::new(
			self.x + (other.x - self.x) * t,
			self.y + (other.y - self.y) * t,
		)
	}
}

impl Add for Point {
	type Output = Point;

	fn add(self, rhs: Point) -> Point {
		Point::new(self.x + rhs.x, self.y + rhs.y)
	}
}

impl Sub for Point {
	type Output = Point;

	fn sub(self, rhs: Point) -> Point {
		Point::new(self.x - rhs.x, self.y - rhs.y)
	}
}

/// Axis-aligned bounds.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
	/// Left edge.
	pub min_x: f64,
	/// Top edge.
	pub min_y: f64,
	/// Right edge.
	pub max_x: f64,
	/// Bottom edge.
	pub max_y: f64,
}

impl Rect {
	/// Bounds of a circle.
	pub fn around(center: Point, radius: f64) -> Self {
		Self {
			min_x: center.x - radius,
			min_y: center.y - radius,
			max_x: center.x + radius,
			max_y: center.y + radius,
		}
	}

	/// Smallest rect covering both.
	pub fn union(self, other: Rect) -> Rect {
		Rect {
			min_x: self.min_x.min(other.min_x),
			min_y: self.min_y.min(other.min_y),
			max_x: self.max_x.max(other.max_x),
			max_y: self.max_y.max(other.max_y),
		}
	}

	/// Grow every side by `by`.
	pub fn expand(self, by: f64) -> Rect {
		Rect {
			min_x: self.min_x - by,
			min_y: self.min_y - by,
			max_x: self.max_x + by,
			max_y: self.max_y + by,
		}
	}

	/// Horizontal extent.
	pub fn width(&self) -> f64 {
		self.max_x - self.min_x
	}

	/// Vertical extent.
	pub fn height(&self) -> f64 {
		self.max_y - self.min_y
	}

	/// Top-left corner.
	pub fn min(&self) -> Point {
		Point::new(self.min_x, self.min_y)
	}

	/// Centre point.
	pub fn center(&self) -> Point {
		Point::new(
			(self.min_x + self.max_x) / 2.0,
			(self.min_y + self.max_y) / 2.0,
		)
	}
}

/// Node size: a diameter, or a `[width, height]` box.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeSize {
	/// Diameter.
	Uniform(f64),
	/// `[width, height]`.
	Box([f64; 2]),
}

impl NodeSize {
	/// Radius of the circle that encloses the node.
	pub fn radius(self) -> f64 {
		match self {
			NodeSize::Uniform(d) => d / 2.0,
			NodeSize::Box([w, h]) => w.max(h) / 2.0,
		}
	}
}

/// The data model of a single item.
///
/// Known fields are typed; anything else the caller attaches is kept in
/// `extra` and round-trips through [`Graph::save`](super::Graph::save).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ItemModel {
	/// Unique id. Edges without one get `source->target`.
	pub id: ItemId,
	/// Node x position.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub x: Option<f64>,
	/// Node y position.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub y: Option<f64>,
	/// Node size.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub size: Option<NodeSize>,
	/// Display text.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub label: Option<String>,
	/// Shape name for the host.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub shape: Option<String>,
	/// Stroke color.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub color: Option<String>,
	/// Edge endpoint.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub source: Option<ItemId>,
	/// Edge endpoint.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub target: Option<ItemId>,
	/// Owning group of a node.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub group_id: Option<ItemId>,
	/// Style overrides.
	#[serde(skip_serializing_if = "Style::is_empty")]
	pub style: Style,
	/// Per-item state overrides, taking precedence over graph-level state styles.
	#[serde(skip_serializing_if = "BTreeMap::is_empty")]
	pub state_styles: BTreeMap<String, Style>,
	/// Any other fields.
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

impl ItemModel {
	/// A node model with a position.
	pub fn node(id: impl Into<ItemId>, x: f64, y: f64) -> Self {
		Self {
			id: id.into(),
			x: Some(x),
			y: Some(y),
			..Default::default()
		}
	}

	/// An edge model between two node ids.
	pub fn edge(id: impl Into<ItemId>, source: impl Into<ItemId>, target: impl Into<ItemId>) -> Self {
		Self {
			id: id.into(),
			source: Some(source.into()),
			target: Some(target.into()),
			..Default::default()
		}
	}

	/// A group model.
	pub fn group(id: impl Into<ItemId>) -> Self {
		Self {
			id: id.into(),
			..Default::default()
		}
	}

	/// Put the node in `group`.
	pub fn with_group(mut self, group: impl Into<ItemId>) -> Self {
		self.group_id = Some(group.into());
		self
	}

	/// Set the label.
	pub fn with_label(mut self, label: impl Into<String>) -> Self {
		self.label = Some(label.into());
		self
	}

	/// Position, if both coordinates are set.
	pub fn position(&self) -> Option<Point> {
		Some(Point::new(self.x?, self.y?))
	}

	/// Set both coordinates.
	pub fn set_position(&mut self, p: Point) {
		self.x = Some(p.x);
		self.y = Some(p.y);
	}

	/// Merge a partial model into this one.
	///
	/// Top-level keys replace existing values, `null` removes them, and
	/// `style` is merged key by key. The `id` key is ignored.
	pub fn merge(&mut self, patch: &Map<String, Value>) -> GraphResult<()> {
		let mut value = serde_json::to_value(&*self)?;
		let Value::Object(fields) = &mut value else {
			return Err(GraphError::InvalidPatch);
		};
		for (key, incoming) in patch {
			match key.as_str() {
				"id" => {}
				"style" => match (fields.get_mut("style"), incoming) {
					(Some(Value::Object(current)), Value::Object(update)) => {
						for (k, v) in update {
							if v.is_null() {
								current.remove(k);
							} else {
								current.insert(k.clone(), v.clone());
							}
						}
					}
					_ => {
						fields.insert(key.clone(), incoming.clone());
					}
				},
				_ if incoming.is_null() => {
					fields.remove(key);
				}
				_ => {
					fields.insert(key.clone(), incoming.clone());
				}
			}
		}
		*self = serde_json::from_value(value)?;
		Ok(())
	}
}

/// Complete graph payload: nodes, edges and groups.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphData {
	/// Node models.
	#[serde(default)]
	pub nodes: Vec<ItemModel>,
	/// Edge models; also read from `links`.
	#[serde(default, alias = "links")]
	pub edges: Vec<ItemModel>,
	/// Group models.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub groups: Vec<ItemModel>,
}
