//! Canvas host for the graph engine.
//!
//! Renders a [`Graph`](crate::graph::Graph) on an HTML canvas with:
//! - Pan, zoom, node dragging, selection and hover highlighting through the
//!   engine's interaction modes
//! - Palette-based theming with gradient nodes and a vignette
//! - Frame-coalesced painting driven by `requestAnimationFrame`
//!
//! # Example
//!
//! ```ignore
//! use graph_canvas::{GraphCanvas, GraphData, GraphOptions, ItemModel};
//!
//! let data = GraphData {
//!     nodes: vec![ItemModel::node("a", 0.0, 0.0), ItemModel::node("b", 80.0, 0.0)],
//!     edges: vec![ItemModel::edge("a->b", "a", "b")],
//!     groups: vec![],
//! };
//!
//! view! { <GraphCanvas data=data fullscreen=true /> }
//! ```

mod component;
mod render;
pub mod theme;

pub use component::GraphCanvas;
pub use render::CanvasSurface;
pub use theme::{Color, Theme, ThemeStyles};
