//! Browser host components.

pub mod graph_canvas;
