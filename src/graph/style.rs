//! Style resolution.
//!
//! An item's resolved style is built in layers, later layers winning on
//! conflicting keys:
//!
//! 1. graph defaults (`defaultNode` / `defaultEdge`)
//! 2. the [`StyleProvider`] theme
//! 3. the model's own `color` and `style`
//! 4. each active state, least recently enabled first; a state's style is the
//!    graph-level state style overlaid with the model's `stateStyles` entry
//!
//! Resolution is a pure function of those inputs and reruns whenever any of
//! them changes, so the resolved style always reflects the latest state set.

use std::collections::BTreeMap;

use serde_json::Value;

use super::config::{GraphOptions, ItemDefaults};
use super::item::ItemKind;
use super::types::{ItemModel, Style};

/// Theme hook consulted between graph defaults and model overrides.
pub trait StyleProvider {
	/// Base style for an item before its model's own overrides.
	fn base_style(&self, kind: ItemKind, model: &ItemModel) -> Style;
}

/// Provider that contributes nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlainStyles;

impl StyleProvider for PlainStyles {
	fn base_style(&self, _kind: ItemKind, _model: &ItemModel) -> Style {
		Style::new()
	}
}

/// The style-relevant subset of [`GraphOptions`].
#[derive(Clone, Debug, Default)]
pub(crate) struct StyleDefaults {
	pub default_node: ItemDefaults,
	pub default_edge: ItemDefaults,
	pub node_state_styles: BTreeMap<String, Style>,
	pub edge_state_styles: BTreeMap<String, Style>,
	pub directed: bool,
}

impl From<&GraphOptions> for StyleDefaults {
	fn from(opts: &GraphOptions) -> Self {
		Self {
			default_node: opts.default_node.clone(),
			default_edge: opts.default_edge.clone(),
			node_state_styles: opts.node_state_styles.clone(),
			edge_state_styles: opts.edge_state_styles.clone(),
			directed: opts.directed,
		}
	}
}

fn overlay(into: &mut Style, from: &Style) {
	for (k, v) in from {
		into.insert(k.clone(), v.clone());
	}
}

/// Style key that a model's `color` shorthand sets.
const COLOR_KEY: &str = "stroke";

impl StyleDefaults {
	fn defaults_for(&self, kind: ItemKind) -> Option<&ItemDefaults> {
		match kind {
			ItemKind::Node => Some(&self.default_node),
			ItemKind::Edge => Some(&self.default_edge),
			ItemKind::Group => None,
		}
	}

	fn state_style(&self, kind: ItemKind, state: &str) -> Option<&Style> {
		match kind {
			ItemKind::Node => self.node_state_styles.get(state),
			ItemKind::Edge => self.edge_state_styles.get(state),
			ItemKind::Group => None,
		}
	}

	/// Resolve the style for `model` with `states` active (oldest first).
	pub fn resolve(
		&self,
		kind: ItemKind,
		model: &ItemModel,
		states: &[String],
		provider: &dyn StyleProvider,
	) -> Style {
		let mut style = Style::new();
		if kind == ItemKind::Edge && self.directed {
			style.insert("endArrow".into(), Value::Bool(true));
		}
		if let Some(defaults) = self.defaults_for(kind) {
			if let Some(color) = &defaults.color {
				style.insert(COLOR_KEY.into(), Value::String(color.clone()));
			}
			overlay(&mut style, &defaults.style);
		}
		overlay(&mut style, &provider.base_style(kind, model));
		if let Some(color) = &model.color {
			style.insert(COLOR_KEY.into(), Value::String(color.clone()));
		}
		overlay(&mut style, &model.style);

		for state in states {
			if let Some(graph_level) = self.state_style(kind, state) {
				overlay(&mut style, graph_level);
			}
			if let Some(own) = model.state_styles.get(state) {
				overlay(&mut style, own);
			}
		}
		style
	}
}
