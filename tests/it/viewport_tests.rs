//! Viewport transform tests: coordinate conversions, zoom clamping, fitting.

use approx::assert_relative_eq;
use graph_canvas::graph::{GraphError, GraphEvent, GraphOptions, Point};

use crate::helpers::{graph, graph_with, record_events, triangle};

fn assert_point_eq(a: Point, b: Point) {
	assert_relative_eq!(a.x, b.x, epsilon = 1e-9);
	assert_relative_eq!(a.y, b.y, epsilon = 1e-9);
}

#[test]
fn conversions_round_trip_under_pan_and_zoom() {
	let (mut g, _) = graph();
	g.set_client_origin(Point::new(15.0, 40.0));
	g.translate(120.0, -35.0);
	g.zoom(1.7, Point::new(200.0, 150.0));

	for p in [Point::new(0.0, 0.0), Point::new(-250.5, 33.25), Point::new(1e4, -1e4)] {
		assert_point_eq(g.point_by_client(g.client_by_point(p)), p);
		assert_point_eq(g.point_by_canvas(g.canvas_by_point(p)), p);
		assert_point_eq(g.canvas_by_client(g.client_by_canvas(p)), p);
	}
	// client and canvas differ by the origin only
	assert_point_eq(g.client_by_canvas(Point::new(0.0, 0.0)), Point::new(15.0, 40.0));
}

#[test]
fn zoom_is_clamped_and_anchor_stays_put() {
	let options = GraphOptions {
		min_zoom: 0.5,
		max_zoom: 2.0,
		..Default::default()
	};
	let (mut g, _) = graph_with(options);
	let center = Point::new(300.0, 200.0);
	let under = g.point_by_canvas(center);

	assert!(g.zoom(10.0, center));
	assert_relative_eq!(g.get_zoom(), 2.0);
	assert_point_eq(g.point_by_canvas(center), under);

	// already at the bound: nothing changes
	assert!(!g.zoom(1.5, center));
	assert_relative_eq!(g.get_zoom(), 2.0);

	assert!(g.zoom_to(0.01, center));
	assert_relative_eq!(g.get_zoom(), 0.5);
	assert_point_eq(g.point_by_canvas(center), under);
}

#[test]
fn invalid_zoom_ratio_is_ignored() {
	let (mut g, _) = graph();
	assert!(!g.zoom(0.0, Point::new(0.0, 0.0)));
	assert!(!g.zoom(f64::NAN, Point::new(0.0, 0.0)));
	assert_relative_eq!(g.get_zoom(), 1.0);
}

#[test]
fn viewport_changes_are_observable() {
	let (mut g, _) = graph();
	let events = record_events(&mut g);
	g.translate(10.0, 5.0);
	g.zoom(2.0, Point::new(0.0, 0.0));
	let events = events.borrow();
	assert_eq!(
		events[0],
		GraphEvent::ViewportChange {
			zoom: 1.0,
			translation: Point::new(10.0, 5.0)
		}
	);
	assert_eq!(
		events[1],
		GraphEvent::ViewportChange {
			zoom: 2.0,
			translation: Point::new(20.0, 10.0)
		}
	);
}

#[test]
fn fit_view_centres_the_scene() {
	let (mut g, _) = graph();
	g.read(triangle()).unwrap();
	g.fit_view();

	// node bounds are (-10,-10)..(110,110) with the default radius of 10
	let zoom = g.get_zoom();
	assert_relative_eq!(zoom, 600.0 / 120.0, epsilon = 1e-9);
	assert_point_eq(g.canvas_by_point(Point::new(50.0, 50.0)), Point::new(400.0, 300.0));
}

#[test]
fn fit_view_on_render_respects_padding() {
	let options = GraphOptions {
		fit_view: true,
		fit_view_padding: graph_canvas::graph::Padding::Uniform(50.0),
		..Default::default()
	};
	let (mut g, _) = graph_with(options);
	g.read(triangle()).unwrap();
	assert_relative_eq!(g.get_zoom(), 500.0 / 120.0, epsilon = 1e-9);
	let top_left = g.canvas_by_point(Point::new(-10.0, -10.0));
	assert_relative_eq!(top_left.y, 50.0, epsilon = 1e-9);
}

#[test]
fn move_to_places_the_scene_corner() {
	let (mut g, _) = graph();
	g.read(triangle()).unwrap();
	g.zoom_to(2.0, Point::new(0.0, 0.0));
	g.move_to(30.0, 40.0);
	assert_point_eq(g.canvas_by_point(Point::new(-10.0, -10.0)), Point::new(30.0, 40.0));
}

#[test]
fn change_size_keeps_transform_and_resizes_surface() {
	let (mut g, log) = graph();
	g.translate(5.0, 5.0);
	g.change_size(1024.0, 768.0).unwrap();
	assert_eq!(log.resizes().last(), Some(&(1024.0, 768.0, 1.0)));
	assert_eq!(g.viewport().translation(), Point::new(5.0, 5.0));
	assert_eq!((g.viewport().width(), g.viewport().height()), (1024.0, 768.0));

	let err = g.change_size(0.0, 100.0).unwrap_err();
	assert!(matches!(err, GraphError::InvalidConfiguration(_)));
}
