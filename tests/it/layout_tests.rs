//! Layout provider tests through the graph.

use std::collections::HashMap;

use approx::assert_relative_eq;
use graph_canvas::graph::{
	GraphError, GraphOptions, ItemId, LayoutConfig, LayoutError, LayoutProvider, LayoutRequest, Point,
};
use graph_canvas::layouts::{self, CircularLayout, ForceLayout};
use serde_json::json;

use crate::helpers::{graph_with, triangle};

fn circular_options(radius: f64) -> GraphOptions {
	let mut config = LayoutConfig::new("circular");
	config.options.insert("radius".into(), json!(radius));
	GraphOptions {
		layout: Some(config),
		..Default::default()
	}
}

#[test]
fn layout_options_pick_the_provider() {
	let options = circular_options(100.0);
	let provider = layouts::from_config(options.layout.as_ref().unwrap()).unwrap();
	let (mut g, _) = graph_with(options);
	g.set_layout(Some(provider));
	g.read(triangle()).unwrap();

	let a = g.find_by_id("a").unwrap().as_node().unwrap().center;
	assert_relative_eq!(a.x, 500.0);
	assert_relative_eq!(a.y, 300.0);
	for node in g.nodes() {
		let c = node.as_node().unwrap().center;
		assert_relative_eq!(c.distance(Point::new(400.0, 300.0)), 100.0, epsilon = 1e-9);
	}
}

#[test]
fn layout_options_parse_from_json() {
	let options: GraphOptions = serde_json::from_value(json!({
		"width": 640,
		"height": 480,
		"layout": { "type": "force", "iterations": 20, "forceCharge": 80 },
	}))
	.unwrap();
	let layout = options.layout.unwrap();
	assert_eq!(layout.kind, "force");
	assert_eq!(layout.usize("iterations"), Some(20));
	assert_eq!(layout.f64("forceCharge"), Some(80.0));
}

#[test]
fn force_layout_separates_nodes() {
	let (g, _) = graph_with(GraphOptions {
		layout: Some(LayoutConfig::new("force")),
		..Default::default()
	});
	let mut g = g.with_layout(ForceLayout {
		iterations: 50,
		..Default::default()
	});
	let mut data = triangle();
	for node in &mut data.nodes {
		node.x = None;
		node.y = None;
	}
	g.read(data).unwrap();
	let positions: Vec<Point> = g.nodes().iter().map(|n| n.as_node().unwrap().center).collect();
	assert!(positions.iter().all(|p| p.x.is_finite() && p.y.is_finite()));
	assert!(positions[0].distance(positions[1]) > 1.0);
	assert!(positions[1].distance(positions[2]) > 1.0);
}

struct Broken;

impl LayoutProvider for Broken {
	fn layout(&mut self, _request: LayoutRequest<'_>) -> Result<HashMap<ItemId, Point>, LayoutError> {
		Err(LayoutError {
			kind: "broken".into(),
			reason: "no".into(),
		})
	}
}

#[test]
fn layout_failures_surface_as_errors() {
	let (g, log) = graph_with(GraphOptions::default());
	let mut g = g.with_layout(Broken);
	assert!(matches!(g.read(triangle()), Err(GraphError::Layout(_))));
	assert!(g.needs_tick(), "the new scene is still scheduled");
	assert!(g.tick(0.0));
	assert_eq!(log.frames(), 1);
	assert_eq!(log.last_frame(), ["ab", "ca", "a", "b", "c"]);
	g.set_layout(Some(Box::new(CircularLayout)));
	g.layout().unwrap();
}
