//! Whole-scene data tests: render, save, changeData diffing, custom groups.

use approx::assert_relative_eq;
use graph_canvas::graph::{
	GraphData, GraphError, GraphOptions, GroupType, ItemKind, ItemModel, Point,
};
use graph_canvas::graph::config::AnimateConfig;

use crate::helpers::{graph, graph_with, ids, names, record_events, triangle};

#[test]
fn read_builds_the_scene_and_save_returns_it() {
	let (mut g, _) = graph();
	let events = record_events(&mut g);
	g.read(triangle()).unwrap();
	assert_eq!(ids(g.nodes()), ["a", "b", "c"]);
	assert_eq!(ids(g.edges()), ["ab", "ca"]);
	assert_eq!(names(&events), ["afterrender"]);
	assert_eq!(g.save(), triangle());
}

#[test]
fn staged_data_waits_for_render() {
	let (mut g, _) = graph();
	g.data(triangle());
	assert!(g.nodes().is_empty());
	g.render().unwrap();
	assert_eq!(g.nodes().len(), 3);
}

#[test]
fn inconsistent_payload_keeps_the_current_scene() {
	let (mut g, _) = graph();
	g.read(triangle()).unwrap();

	let mut bad = triangle();
	bad.edges.push(ItemModel::edge("bz", "b", "z"));
	assert!(matches!(g.read(bad.clone()), Err(GraphError::InvalidReference { .. })));
	assert!(matches!(g.change_data(bad), Err(GraphError::InvalidReference { .. })));
	assert_eq!(g.save(), triangle());

	let mut dup = triangle();
	dup.nodes.push(ItemModel::node("a", 5.0, 5.0));
	assert!(matches!(g.change_data(dup), Err(GraphError::DuplicateItem(_))));
	assert_eq!(g.save(), triangle());
}

#[test]
fn render_resets_states() {
	let (mut g, _) = graph();
	g.read(triangle()).unwrap();
	g.set_item_state("a", "selected", true).unwrap();
	g.render().unwrap();
	assert!(g.find_by_id("a").unwrap().states().is_empty());
	assert!(g.find_all_by_state(ItemKind::Node, "selected").is_empty());
}

#[test]
fn change_data_diffs_by_id() {
	let (mut g, _) = graph();
	g.read(triangle()).unwrap();
	g.set_item_state("a", "selected", true).unwrap();
	g.set_item_state("ab", "active", true).unwrap();
	let events = record_events(&mut g);

	let next = GraphData {
		nodes: vec![
			ItemModel::node("a", 10.0, 10.0),
			ItemModel::node("b", 100.0, 0.0),
			ItemModel::node("d", 50.0, 50.0),
		],
		edges: vec![ItemModel::edge("ab", "a", "b"), ItemModel::edge("bd", "b", "d")],
		groups: vec![],
	};
	g.change_data(next).unwrap();

	assert_eq!(ids(g.nodes()), ["a", "b", "d"]);
	assert_eq!(ids(g.edges()), ["ab", "bd"]);
	let a = g.find_by_id("a").unwrap();
	assert_eq!(a.states(), ["selected"], "kept items keep their states");
	assert_eq!(a.as_node().unwrap().center, Point::new(10.0, 10.0));
	assert_eq!(g.find_by_id("ab").unwrap().states(), ["active"]);
	assert_eq!(ids(g.find_all_by_state(ItemKind::Node, "selected")), ["a"]);

	let events = names(&events);
	assert_eq!(events.iter().filter(|e| **e == "afterremoveitem").count(), 2, "c and ca");
	assert_eq!(events.iter().filter(|e| **e == "afteradditem").count(), 2, "d and bd");
	assert_eq!(events.last(), Some(&"afterchangedata"));
}

#[test]
fn change_data_rewires_kept_edges_off_removed_nodes() {
	let (mut g, _) = graph();
	g.read(triangle()).unwrap();
	g.set_item_state("ca", "active", true).unwrap();
	let events = record_events(&mut g);

	let mut next = triangle();
	next.nodes.retain(|n| n.id != "c");
	next.edges[1] = ItemModel::edge("ca", "b", "a");
	g.change_data(next).unwrap();

	assert_eq!(ids(g.nodes()), ["a", "b"]);
	assert_eq!(ids(g.edges()), ["ab", "ca"]);
	let ca = g.find_by_id("ca").unwrap();
	assert_eq!(ca.states(), ["active"]);
	assert_eq!(ca.model().source.as_deref(), Some("b"));
	assert_eq!(ca.model().target.as_deref(), Some("a"));

	let events = names(&events);
	assert!(!events.contains(&"afteradditem"));
	assert_eq!(events.iter().filter(|e| **e == "afterremoveitem").count(), 1);
}

#[test]
fn change_data_keeps_positions_the_payload_omits() {
	let (mut g, _) = graph();
	g.read(triangle()).unwrap();
	g.update_item("b", serde_json::json!({ "x": 140.0 })).unwrap();

	let mut next = triangle();
	next.nodes[1].x = None;
	next.nodes[1].y = None;
	g.change_data(next).unwrap();
	assert_eq!(g.find_by_id("b").unwrap().model().position(), Some(Point::new(140.0, 0.0)));
}

#[test]
fn change_data_replaces_items_that_change_kind() {
	let (mut g, _) = graph();
	g.read(triangle()).unwrap();
	let mut next = triangle();
	next.nodes.retain(|n| n.id != "c");
	next.edges.retain(|e| e.id != "ca");
	next.groups.push(ItemModel::group("c"));
	g.change_data(next).unwrap();
	assert_eq!(g.find_by_id("c").map(|i| i.kind()), Some(ItemKind::Group));
	assert_eq!(ids(g.nodes()), ["a", "b"]);
}

#[test]
fn change_data_preserves_in_flight_animation() {
	let options = GraphOptions {
		animate: true,
		animate_cfg: AnimateConfig {
			duration: 100.0,
			..Default::default()
		},
		..Default::default()
	};
	let (mut g, _) = graph_with(options);
	g.read(triangle()).unwrap();
	let events = record_events(&mut g);

	let mut moved = triangle();
	moved.nodes[1].x = Some(200.0);
	g.change_data(moved.clone()).unwrap();
	assert!(g.is_animating());
	// drawn where it was until frames advance
	assert_eq!(g.find_by_id("b").unwrap().as_node().unwrap().center, Point::new(100.0, 0.0));

	g.tick(0.0);
	g.tick(50.0);
	let mid = g.find_by_id("b").unwrap().as_node().unwrap().center;
	assert_relative_eq!(mid.x, 150.0);

	// same target again: the move carries on from where it is
	g.change_data(moved).unwrap();
	assert!(g.is_animating());
	assert_relative_eq!(g.find_by_id("b").unwrap().as_node().unwrap().center.x, 150.0);

	g.tick(60.0);
	g.tick(160.0);
	assert!(!g.is_animating());
	assert_eq!(g.find_by_id("b").unwrap().as_node().unwrap().center, Point::new(200.0, 0.0));

	let events = names(&events);
	assert_eq!(events.iter().filter(|e| **e == "animatestart").count(), 1);
	assert_eq!(events.iter().filter(|e| **e == "animateend").count(), 1);
}

#[test]
fn clear_empties_the_scene() {
	let (mut g, _) = graph();
	g.read(triangle()).unwrap();
	g.clear();
	assert!(g.nodes().is_empty());
	assert!(g.edges().is_empty());
	assert_eq!(g.save(), GraphData::default());
}

#[test]
fn custom_groups_collect_existing_nodes() {
	let (mut g, _) = graph();
	g.read(triangle()).unwrap();
	let data = GraphData {
		nodes: vec![
			ItemModel::node("a", 0.0, 0.0).with_group("left"),
			ItemModel::node("c", 0.0, 100.0).with_group("left"),
		],
		edges: vec![],
		groups: vec![ItemModel::group("left")],
	};
	g.render_custom_group(&data, GroupType::Rect).unwrap();
	let group = g.find_by_id("left").unwrap().as_group().unwrap();
	assert_eq!(group.group_type, GroupType::Rect);
	assert_eq!(group.members, ["a", "c"]);
	assert_eq!(g.find_by_id("c").unwrap().model().group_id.as_deref(), Some("left"));
}
