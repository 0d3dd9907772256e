//! Render scheduling tests: frame coalescing, manual painting, draw order
//! and surface failures.

use std::cell::RefCell;
use std::rc::Rc;

use graph_canvas::graph::{GraphError, GraphOptions, ItemKind, ItemModel};
use serde_json::json;

use crate::helpers::{graph, graph_with, names, record_events, triangle};

#[test]
fn mutations_never_paint_by_themselves() {
	let (mut g, log) = graph();
	g.read(triangle()).unwrap();
	g.update_item("a", json!({ "x": 5.0 })).unwrap();
	g.translate(1.0, 1.0);
	assert_eq!(log.frames(), 0);
	assert!(g.needs_tick());

	assert!(g.tick(0.0));
	assert_eq!(log.frames(), 1);
	assert!(!g.tick(16.0), "nothing pending");
	assert!(!g.needs_tick());
	assert_eq!(g.paint_count(), 1);
}

#[test]
fn manual_mode_batches_into_one_paint() {
	let (mut g, log) = graph_with(GraphOptions {
		auto_paint: false,
		..Default::default()
	});
	g.read(triangle()).unwrap();
	for i in 0..50 {
		g.update_item("a", json!({ "x": i as f64, "label": format!("step {i}") }))
			.unwrap();
		g.tick(i as f64 * 16.0);
	}
	assert_eq!(log.frames(), 0);

	g.set_auto_paint(true);
	g.paint().unwrap();
	assert_eq!(log.frames(), 1);
	assert!(!g.tick(800.0), "the batch was already flushed");
	assert_eq!(log.frames(), 1);
	assert_eq!(g.find_by_id("a").unwrap().as_node().unwrap().center.x, 49.0);
	assert_eq!(g.find_by_id("a").unwrap().model().label.as_deref(), Some("step 49"));

	// paint flushes even with nothing pending
	g.paint().unwrap();
	assert_eq!(log.frames(), 2);
}

#[test]
fn resuming_auto_paint_paints_on_the_next_tick() {
	let (mut g, log) = graph();
	g.set_auto_paint(false);
	assert!(!g.auto_paint());
	g.read(triangle()).unwrap();
	assert!(!g.tick(0.0));
	g.set_auto_paint(true);
	assert_eq!(log.frames(), 0);
	assert!(g.tick(16.0));
	assert_eq!(log.frames(), 1);
}

fn layered_scene(group_by_types: bool) -> Vec<String> {
	let (mut g, log) = graph_with(GraphOptions {
		group_by_types,
		..Default::default()
	});
	g.add_item(ItemKind::Group, ItemModel::group("g")).unwrap();
	g.add_item(ItemKind::Node, ItemModel::node("a", 0.0, 0.0).with_group("g")).unwrap();
	g.add_item(ItemKind::Node, ItemModel::node("b", 50.0, 0.0)).unwrap();
	g.add_item(ItemKind::Edge, ItemModel::edge("ab", "a", "b")).unwrap();
	g.add_item(ItemKind::Node, ItemModel::node("c", 0.0, 50.0)).unwrap();
	g.paint().unwrap();
	log.last_frame()
}

#[test]
fn draw_order_follows_group_by_types() {
	assert_eq!(layered_scene(true), ["g", "ab", "a", "b", "c"]);
	assert_eq!(layered_scene(false), ["g", "a", "b", "ab", "c"]);
}

#[test]
fn removed_items_leave_the_frame() {
	let (mut g, log) = graph();
	g.read(triangle()).unwrap();
	g.paint().unwrap();
	g.remove_item("a");
	g.paint().unwrap();
	assert_eq!(log.last_frame(), ["b", "c"]);
}

#[test]
fn tick_failures_go_to_error_observers() {
	let (mut g, log) = graph();
	let errors = Rc::new(RefCell::new(Vec::new()));
	let sink = errors.clone();
	g.on_error(move |e| sink.borrow_mut().push(e.to_string()));
	g.read(triangle()).unwrap();

	log.fail_frames(true);
	assert!(!g.tick(0.0));
	assert_eq!(*errors.borrow(), ["drawing surface error: context lost"]);

	// the failed work is dropped; nothing retries until the next mutation
	assert!(!g.tick(16.0));
	assert_eq!(errors.borrow().len(), 1);

	log.fail_frames(false);
	g.refresh();
	assert!(g.tick(32.0));
	assert_eq!(log.frames(), 1);
}

#[test]
fn manual_paint_returns_surface_errors() {
	let (mut g, log) = graph();
	log.fail_frames(true);
	assert!(matches!(g.paint(), Err(GraphError::Surface(_))));
	assert_eq!(g.paint_count(), 0);
}

#[test]
fn failed_draws_still_close_the_frame() {
	let (mut g, log) = graph();
	g.read(triangle()).unwrap();
	log.fail_draws(true);
	for _ in 0..3 {
		assert!(matches!(g.paint(), Err(GraphError::Surface(_))));
		assert_eq!(log.open_frames(), 0);
	}
	assert_eq!(log.frames(), 0);
	assert_eq!(g.paint_count(), 0);

	log.fail_draws(false);
	g.paint().unwrap();
	assert_eq!(log.frames(), 1);
	assert_eq!(log.last_frame().len(), 5);
}

#[test]
fn every_paint_is_observable() {
	let (mut g, _) = graph();
	g.read(triangle()).unwrap();
	let events = record_events(&mut g);
	g.tick(0.0);
	g.paint().unwrap();
	assert_eq!(names(&events), ["afterpaint", "afterpaint"]);
}

#[test]
fn refresh_positions_rebuilds_geometry_from_models() {
	let (mut g, _) = graph();
	g.read(triangle()).unwrap();
	g.paint().unwrap();
	g.update_item("c", json!({ "y": 300.0 })).unwrap();
	g.refresh_positions();
	g.paint().unwrap();
	let ca = g.find_by_id("ca").unwrap().as_edge().unwrap();
	assert_eq!(ca.start.y, 290.0);
}
