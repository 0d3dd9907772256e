//! Layout providers shipped with the crate.
//!
//! The engine only knows the [`LayoutProvider`] trait; hosts pick a provider
//! from the `layout.type` option with [`from_config`].

mod circular;
mod force;

pub use circular::CircularLayout;
pub use force::ForceLayout;

use crate::graph::{GraphError, GraphResult, LayoutConfig, LayoutProvider};

/// Build the provider named by `config.kind`.
pub fn from_config(config: &LayoutConfig) -> GraphResult<Box<dyn LayoutProvider>> {
	match config.kind.as_str() {
		"force" => Ok(Box::new(ForceLayout::default())),
		"circular" => Ok(Box::new(CircularLayout)),
		other => Err(GraphError::InvalidConfiguration(format!(
			"unknown layout type `{other}`"
		))),
	}
}
