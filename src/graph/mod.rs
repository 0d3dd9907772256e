//! Graph engine core.
//!
//! Everything here is independent of the browser. [`Graph`] owns the scene
//! and talks to the outside world through three collaborator traits:
//! [`DrawingSurface`] for pixels, [`LayoutProvider`] for positions and
//! [`StyleProvider`] for theming.
//!
//! # Scheduling
//!
//! Mutations never draw. They record pending work with the render scheduler
//! and the host calls [`Graph::tick`] once per frame, which advances
//! animations and then paints at most once. With auto-paint off, callers
//! batch mutations and call [`Graph::paint`] themselves.

pub mod animate;
mod behaviors;
pub mod config;
mod controller;
pub mod error;
pub mod events;
pub mod item;
pub mod layout;
pub mod mode;
mod registry;
mod scheduler;
mod state;
pub mod style;
pub mod surface;
pub mod transform;
pub mod types;

pub use animate::{Easing, FrameCallback, FrameSample};
pub use config::{GraphOptions, Padding, Renderer};
pub use controller::{Graph, ModelMapper};
pub use error::{GraphError, GraphResult};
pub use events::{GraphEvent, ObserverId};
pub use item::{GroupType, Item, ItemKind, ItemShape};
pub use layout::{LayoutConfig, LayoutError, LayoutProvider, LayoutRequest};
pub use mode::{Behavior, BehaviorSpec, EventFlow, InputEvent, InputKind, Modifiers, DEFAULT_MODE};
pub use style::{PlainStyles, StyleProvider};
pub use surface::{DrawingSurface, NullSurface, SurfaceError};
pub use transform::Viewport;
pub use types::{GraphData, ItemId, ItemModel, NodeSize, Point, Rect, Style};
