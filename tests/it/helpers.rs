//! Test helpers: a recording drawing surface and small scene builders.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use graph_canvas::graph::{
	DrawingSurface, Graph, GraphData, GraphEvent, GraphOptions, Item, ItemModel, SurfaceError, Viewport,
};

/// Everything a [`RecordingSurface`] has seen, shared with the test.
#[derive(Clone, Debug, Default)]
pub struct SurfaceLog {
	frames: Rc<Cell<usize>>,
	last_frame: Rc<RefCell<Vec<String>>>,
	resizes: Rc<RefCell<Vec<(f64, f64, f64)>>>,
	fail: Rc<Cell<bool>>,
	fail_draw: Rc<Cell<bool>>,
	open: Rc<Cell<usize>>,
}

impl SurfaceLog {
	/// Completed frames.
	pub fn frames(&self) -> usize {
		self.frames.get()
	}

	/// Ids drawn in the most recent frame, in draw order.
	pub fn last_frame(&self) -> Vec<String> {
		self.last_frame.borrow().clone()
	}

	pub fn resizes(&self) -> Vec<(f64, f64, f64)> {
		self.resizes.borrow().clone()
	}

	/// Make every subsequent `begin_frame` fail.
	pub fn fail_frames(&self, fail: bool) {
		self.fail.set(fail);
	}

	/// Make every subsequent `draw_item` fail.
	pub fn fail_draws(&self, fail: bool) {
		self.fail_draw.set(fail);
	}

	/// Frames begun but not yet ended.
	pub fn open_frames(&self) -> usize {
		self.open.get()
	}
}

/// Surface that records what it is asked to draw.
#[derive(Debug, Default)]
pub struct RecordingSurface {
	log: SurfaceLog,
	current: Vec<String>,
	broken: bool,
}

impl RecordingSurface {
	pub fn new() -> (Self, SurfaceLog) {
		let surface = Self::default();
		let log = surface.log.clone();
		(surface, log)
	}
}

impl DrawingSurface for RecordingSurface {
	fn resize(&mut self, width: f64, height: f64, pixel_ratio: f64) -> Result<(), SurfaceError> {
		self.log.resizes.borrow_mut().push((width, height, pixel_ratio));
		Ok(())
	}

	fn clear(&mut self) -> Result<(), SurfaceError> {
		self.current.clear();
		Ok(())
	}

	fn begin_frame(&mut self, _viewport: &Viewport) -> Result<(), SurfaceError> {
		if self.log.fail.get() {
			return Err(SurfaceError::new("context lost"));
		}
		self.log.open.set(self.log.open.get() + 1);
		self.broken = false;
		self.clear()
	}

	fn draw_item(&mut self, item: &Item, _viewport: &Viewport) -> Result<(), SurfaceError> {
		if self.log.fail_draw.get() {
			self.broken = true;
			return Err(SurfaceError::new("bad path"));
		}
		self.current.push(item.id().to_string());
		Ok(())
	}

	fn end_frame(&mut self) -> Result<(), SurfaceError> {
		self.log.open.set(self.log.open.get().saturating_sub(1));
		if self.broken {
			self.current.clear();
			return Ok(());
		}
		*self.log.last_frame.borrow_mut() = std::mem::take(&mut self.current);
		self.log.frames.set(self.log.frames.get() + 1);
		Ok(())
	}
}

/// A graph over a recording surface.
pub fn graph_with(options: GraphOptions) -> (Graph, SurfaceLog) {
	let (surface, log) = RecordingSurface::new();
	let graph = Graph::new(options, surface).unwrap();
	(graph, log)
}

pub fn graph() -> (Graph, SurfaceLog) {
	graph_with(GraphOptions::default())
}

/// Collect every event the graph emits.
pub fn record_events(graph: &mut Graph) -> Rc<RefCell<Vec<GraphEvent>>> {
	let events = Rc::new(RefCell::new(Vec::new()));
	let sink = events.clone();
	graph.on(move |e| sink.borrow_mut().push(e.clone()));
	events
}

/// Event names in emission order.
pub fn names(events: &Rc<RefCell<Vec<GraphEvent>>>) -> Vec<&'static str> {
	events.borrow().iter().map(GraphEvent::name).collect()
}

/// `a (0,0) -> b (100,0)`, plus `c (0,100)` with `c -> a`.
pub fn triangle() -> GraphData {
	GraphData {
		nodes: vec![
			ItemModel::node("a", 0.0, 0.0),
			ItemModel::node("b", 100.0, 0.0),
			ItemModel::node("c", 0.0, 100.0),
		],
		edges: vec![ItemModel::edge("ab", "a", "b"), ItemModel::edge("ca", "c", "a")],
		groups: vec![],
	}
}

pub fn ids(items: Vec<&Item>) -> Vec<String> {
	items.into_iter().map(|i| i.id().to_string()).collect()
}
