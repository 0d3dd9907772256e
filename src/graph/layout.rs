//! Layout collaborator.
//!
//! The engine hands the provider a snapshot of nodes and edges plus the
//! configured layout options and gets back a position per node. Nodes the
//! provider leaves out keep their position.

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

use super::types::{ItemId, Point};

/// Layout options: a `type` plus provider-specific keys.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct LayoutConfig {
	/// Provider name (`force`, `circular`, ...).
	#[serde(rename = "type")]
	pub kind: String,
	/// Provider-specific keys.
	#[serde(flatten)]
	pub options: Map<String, Value>,
}

impl LayoutConfig {
	/// Config for `kind` with no options.
	pub fn new(kind: impl Into<String>) -> Self {
		Self {
			kind: kind.into(),
			options: Map::new(),
		}
	}

	/// Numeric option.
	pub fn f64(&self, key: &str) -> Option<f64> {
		self.options.get(key).and_then(Value::as_f64)
	}

	/// Non-negative integer option.
	pub fn usize(&self, key: &str) -> Option<usize> {
		self.options
			.get(key)
			.and_then(Value::as_u64)
			.and_then(|v| usize::try_from(v).ok())
	}
}

/// Node as seen by a layout provider.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutNode {
	/// Node id.
	pub id: ItemId,
	/// Current model position, if any.
	pub position: Option<Point>,
	/// Node radius.
	pub radius: f64,
}

/// Edge as seen by a layout provider.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutEdge {
	/// Source node id.
	pub source: ItemId,
	/// Target node id.
	pub target: ItemId,
}

/// Everything a provider needs for one run.
#[derive(Clone, Copy, Debug)]
pub struct LayoutRequest<'a> {
	/// Nodes in insertion order.
	pub nodes: &'a [LayoutNode],
	/// Edges in insertion order.
	pub edges: &'a [LayoutEdge],
	/// Canvas width.
	pub width: f64,
	/// Canvas height.
	pub height: f64,
	/// Configured options.
	pub config: &'a LayoutConfig,
}

/// Layout failure.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("layout `{kind}` failed: {reason}")]
pub struct LayoutError {
	/// Provider that failed.
	pub kind: String,
	/// What went wrong.
	pub reason: String,
}

/// Pluggable layout algorithm.
pub trait LayoutProvider {
	/// New positions by node id. Nodes left out keep their position.
	fn layout(&mut self, request: LayoutRequest<'_>) -> Result<HashMap<ItemId, Point>, LayoutError>;
}
