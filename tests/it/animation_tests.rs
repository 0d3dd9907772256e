//! Position animation tests: layout transitions, stopping, frame hooks.

use std::collections::HashMap;

use approx::assert_relative_eq;
use graph_canvas::graph::config::AnimateConfig;
use graph_canvas::graph::{
	Easing, FrameSample, Graph, GraphOptions, ItemId, LayoutError, LayoutProvider, LayoutRequest, Point,
};
use serde_json::json;

use crate::helpers::{graph_with, names, record_events, triangle};

/// Moves every node right by a fixed amount per run.
struct Shift(f64);

impl LayoutProvider for Shift {
	fn layout(&mut self, request: LayoutRequest<'_>) -> Result<HashMap<ItemId, Point>, LayoutError> {
		Ok(request
			.nodes
			.iter()
			.map(|n| {
				let p = n.position.unwrap_or_default();
				(n.id.clone(), Point::new(p.x + self.0, p.y))
			})
			.collect())
	}
}

fn animated_graph(duration: f64) -> Graph {
	let options = GraphOptions {
		animate: true,
		animate_cfg: AnimateConfig {
			duration,
			easing: Easing::Linear,
		},
		..Default::default()
	};
	let (g, _) = graph_with(options);
	let mut g = g.with_layout(Shift(100.0));
	g.read(triangle()).unwrap();
	g
}

fn center(g: &Graph, id: &str) -> Point {
	g.find_by_id(id).unwrap().as_node().unwrap().center
}

#[test]
fn render_places_layout_output_without_animating() {
	let g = animated_graph(100.0);
	assert!(!g.is_animating());
	assert_eq!(center(&g, "a"), Point::new(100.0, 0.0));
}

#[test]
fn relayout_animates_to_new_positions() {
	let mut g = animated_graph(100.0);
	let events = record_events(&mut g);
	g.layout().unwrap();
	assert!(g.is_animating());
	assert_eq!(g.find_by_id("a").unwrap().model().position(), Some(Point::new(200.0, 0.0)));
	assert_eq!(center(&g, "a"), Point::new(100.0, 0.0));

	g.tick(1000.0);
	g.tick(1025.0);
	assert_relative_eq!(center(&g, "a").x, 125.0);
	g.tick(1100.0);
	assert_eq!(center(&g, "a"), Point::new(200.0, 0.0));
	assert_eq!(center(&g, "c"), Point::new(200.0, 100.0));
	assert!(!g.is_animating());

	let names = names(&events);
	assert_eq!(names.first(), Some(&"animatestart"));
	assert_eq!(names.iter().filter(|n| **n == "animateend").count(), 1);
}

#[test]
fn stop_animate_leaves_nodes_mid_flight() {
	let mut g = animated_graph(100.0);
	g.layout().unwrap();
	g.tick(0.0);
	g.tick(50.0);

	let events = record_events(&mut g);
	g.stop_animate();
	assert!(!g.is_animating());
	assert_eq!(names(&events), ["animateend"]);
	assert_eq!(center(&g, "b"), Point::new(250.0, 0.0));
	assert_eq!(g.find_by_id("b").unwrap().model().position(), Some(Point::new(250.0, 0.0)));

	// later frames and a second stop change nothing
	g.tick(100.0);
	g.stop_animate();
	assert_eq!(center(&g, "b"), Point::new(250.0, 0.0));
	let ends = names(&events).into_iter().filter(|n| *n == "animateend").count();
	assert_eq!(ends, 1);
}

#[test]
fn moving_a_node_by_hand_cancels_its_animation() {
	let mut g = animated_graph(100.0);
	g.layout().unwrap();
	g.tick(0.0);
	g.update_item("a", json!({ "x": -40.0, "y": 5.0 })).unwrap();
	g.tick(50.0);
	assert_eq!(center(&g, "a"), Point::new(-40.0, 5.0));
	assert!(g.is_animating(), "other nodes keep going");
}

#[test]
fn removing_a_node_drops_its_track() {
	let mut g = animated_graph(100.0);
	g.layout().unwrap();
	g.tick(0.0);
	g.remove_item("a");
	g.remove_item("b");
	g.remove_item("c");
	assert!(!g.is_animating());
}

#[test]
fn frame_hook_can_override_positions() {
	let mut g = animated_graph(100.0);
	g.on_frame(Some(Box::new(|sample: &FrameSample<'_>| {
		(sample.id == "a").then(|| Point::new(sample.current.x, -sample.ratio * 10.0))
	})));
	g.layout().unwrap();
	g.tick(0.0);
	g.tick(50.0);
	let a = center(&g, "a");
	assert_relative_eq!(a.x, 150.0);
	assert_relative_eq!(a.y, -5.0);
	assert_relative_eq!(center(&g, "b").y, 0.0);
}

#[test]
fn zero_duration_lands_on_the_first_frame() {
	let mut g = animated_graph(0.0);
	g.layout().unwrap();
	g.tick(0.0);
	assert!(!g.is_animating());
	assert_eq!(center(&g, "a"), Point::new(200.0, 0.0));
}
