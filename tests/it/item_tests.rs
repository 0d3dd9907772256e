//! Item registry tests through the controller: add, update, remove,
//! relations, states and hit testing.

use graph_canvas::graph::{GraphError, GraphEvent, GraphOptions, ItemKind, ItemModel, Point};
use serde_json::json;

use crate::helpers::{graph, graph_with, ids, names, record_events, triangle};

#[test]
fn removing_a_node_cascades_to_its_edges() {
	let (mut g, _) = graph();
	g.add_item(ItemKind::Node, ItemModel::node("A", 0.0, 0.0)).unwrap();
	g.add_item(ItemKind::Node, ItemModel::node("B", 50.0, 0.0)).unwrap();
	let edge = g
		.add_item(ItemKind::Edge, ItemModel::edge("", "A", "B"))
		.unwrap()
		.id()
		.to_string();
	assert_eq!(edge, "A->B");

	let events = record_events(&mut g);
	assert!(g.remove_item("A"));

	assert!(g.find_by_id("A").is_none());
	assert!(g.find_by_id("A->B").is_none());
	assert_eq!(ids(g.nodes()), ["B"]);
	assert!(g.edges().is_empty());
	assert!(g.neighbors("B").is_empty());

	let mut removed: Vec<(String, ItemKind)> = events
		.borrow()
		.iter()
		.filter_map(|e| match e {
			GraphEvent::AfterRemoveItem { id, kind } => Some((id.clone(), *kind)),
			_ => None,
		})
		.collect();
	removed.sort_by(|a, b| a.0.cmp(&b.0));
	assert_eq!(
		removed,
		[("A".to_string(), ItemKind::Node), ("A->B".to_string(), ItemKind::Edge)]
	);
}

#[test]
fn removing_a_missing_item_is_a_no_op() {
	let (mut g, _) = graph();
	let events = record_events(&mut g);
	assert!(!g.remove_item("ghost"));
	assert!(events.borrow().is_empty());
}

#[test]
fn generated_edge_ids_never_collide() {
	let (mut g, _) = graph();
	g.read(triangle()).unwrap();
	let first = g.add_item(ItemKind::Edge, ItemModel::edge("", "a", "b")).unwrap().id().to_string();
	let second = g.add_item(ItemKind::Edge, ItemModel::edge("", "a", "b")).unwrap().id().to_string();
	assert_eq!(first, "a->b");
	assert_eq!(second, "a->b#1");
}

#[test]
fn invalid_items_are_rejected_without_side_effects() {
	let (mut g, _) = graph();
	g.read(triangle()).unwrap();
	let events = record_events(&mut g);

	let err = g.add_item(ItemKind::Node, ItemModel::node("a", 1.0, 1.0)).unwrap_err();
	assert!(matches!(err, GraphError::DuplicateItem(id) if id == "a"));

	let err = g.add_item(ItemKind::Edge, ItemModel::edge("e", "a", "nope")).unwrap_err();
	assert!(matches!(err, GraphError::InvalidReference { reference, .. } if reference == "nope"));

	// an edge may only point at nodes
	g.add_item(ItemKind::Group, ItemModel::group("g")).unwrap();
	let err = g.add_item(ItemKind::Edge, ItemModel::edge("e", "a", "g")).unwrap_err();
	assert!(matches!(err, GraphError::InvalidReference { .. }));

	let mut no_target = ItemModel::edge("e", "a", "b");
	no_target.target = None;
	let err = g.add_item(ItemKind::Edge, no_target).unwrap_err();
	assert!(matches!(err, GraphError::MissingField { field: "target", .. }));

	let err = g.add_item(ItemKind::Node, ItemModel::group("")).unwrap_err();
	assert!(matches!(err, GraphError::MissingField { field: "id", .. }));

	assert_eq!(g.edges().len(), 2);
	assert_eq!(names(&events), ["afteradditem"], "only the group was added");
}

#[test]
fn updates_merge_and_move_dependent_geometry() {
	let (mut g, _) = graph();
	g.read(triangle()).unwrap();
	g.paint().unwrap();

	g.update_item("b", json!({ "x": 200.0, "label": "bee", "style": { "fill": "red" } }))
		.unwrap();
	g.paint().unwrap();

	let b = g.find_by_id("b").unwrap();
	assert_eq!(b.model().label.as_deref(), Some("bee"));
	assert_eq!(b.as_node().unwrap().center, Point::new(200.0, 0.0));
	assert_eq!(b.style()["fill"], json!("red"));

	// edges attach at the node boundary
	let ab = g.find_by_id("ab").unwrap().as_edge().unwrap();
	assert_eq!(ab.start, Point::new(10.0, 0.0));
	assert_eq!(ab.end, Point::new(190.0, 0.0));
}

#[test]
fn bad_updates_leave_the_item_untouched() {
	let (mut g, _) = graph();
	g.read(triangle()).unwrap();

	assert!(matches!(g.update_item("a", json!(3)), Err(GraphError::InvalidPatch)));
	assert!(matches!(
		g.update_item("a", json!({ "x": "far" })),
		Err(GraphError::InvalidModel(_))
	));
	assert!(matches!(
		g.update_item("ab", json!({ "target": "zz" })),
		Err(GraphError::InvalidReference { .. })
	));
	assert!(matches!(
		g.update_item("zz", json!({})),
		Err(GraphError::ItemNotFound(_))
	));

	assert_eq!(g.find_by_id("a").unwrap().model().x, Some(0.0));
	let ab = g.find_by_id("ab").unwrap().as_edge().unwrap();
	assert_eq!(ab.target, "b");
}

#[test]
fn re_pointing_an_edge_updates_adjacency() {
	let (mut g, _) = graph();
	g.read(triangle()).unwrap();
	g.update_item("ab", json!({ "target": "c" })).unwrap();
	assert!(g.incident_edges("b").is_empty());
	assert_eq!(ids(g.neighbors("c")), ["a"]);
	let mut a = ids(g.incident_edges("a"));
	a.sort();
	assert_eq!(a, ["ab", "ca"]);
}

#[test]
fn groups_track_members() {
	let (mut g, _) = graph();
	g.add_item(ItemKind::Group, ItemModel::group("g")).unwrap();
	g.add_item(ItemKind::Node, ItemModel::node("a", 0.0, 0.0).with_group("g")).unwrap();
	g.add_item(ItemKind::Node, ItemModel::node("b", 100.0, 0.0).with_group("g")).unwrap();
	g.paint().unwrap();

	let group = g.find_by_id("g").unwrap().as_group().unwrap();
	assert_eq!(group.members, ["a", "b"]);
	// member bounds (-10,-10)..(110,10) plus padding
	assert_eq!(group.bounds.min(), Point::new(-20.0, -20.0));
	assert_eq!(group.bounds.width(), 140.0);

	g.update_item("b", json!({ "groupId": null })).unwrap();
	assert_eq!(g.find_by_id("g").unwrap().as_group().unwrap().members, ["a"]);

	assert!(g.remove_item("g"));
	assert_eq!(g.find_by_id("a").unwrap().model().group_id, None);
	assert_eq!(g.nodes().len(), 2);
}

#[test]
fn states_keep_enable_order_and_drive_style() {
	let mut options = GraphOptions::default();
	options
		.node_state_styles
		.insert("selected".into(), json!({ "fill": "red" }).as_object().unwrap().clone());
	options
		.node_state_styles
		.insert("hover".into(), json!({ "fill": "yellow" }).as_object().unwrap().clone());
	let (mut g, _) = graph_with(options);
	g.read(triangle()).unwrap();

	g.set_item_state("a", "selected", true).unwrap();
	g.set_item_state("a", "hover", true).unwrap();
	let a = g.find_by_id("a").unwrap();
	assert_eq!(a.states(), ["selected", "hover"]);
	assert_eq!(a.style()["fill"], json!("yellow"));

	// re-enabling makes it the most recent
	g.set_item_state("a", "selected", true).unwrap();
	let a = g.find_by_id("a").unwrap();
	assert_eq!(a.states(), ["hover", "selected"]);
	assert_eq!(a.style()["fill"], json!("red"));

	g.set_item_state("b", "selected", true).unwrap();
	assert_eq!(ids(g.find_all_by_state(ItemKind::Node, "selected")), ["a", "b"]);

	g.clear_item_states("a", &[]).unwrap();
	let a = g.find_by_id("a").unwrap();
	assert!(a.states().is_empty());
	assert!(a.style().get("fill").is_none());

	g.clear_state("selected").unwrap();
	assert!(g.find_all_by_state(ItemKind::Node, "selected").is_empty());

	assert!(matches!(
		g.set_item_state("zz", "selected", true),
		Err(GraphError::ItemNotFound(_))
	));
}

#[test]
fn redundant_state_changes_emit_nothing() {
	let (mut g, _) = graph();
	g.read(triangle()).unwrap();
	g.set_item_state("a", "selected", true).unwrap();
	let events = record_events(&mut g);
	g.set_item_state("a", "selected", true).unwrap();
	g.set_item_state("b", "selected", false).unwrap();
	assert!(events.borrow().is_empty());
}

#[test]
fn hit_testing_ignores_layering() {
	for group_by_types in [true, false] {
		let (mut g, _) = graph_with(GraphOptions {
			group_by_types,
			..Default::default()
		});
		g.add_item(ItemKind::Node, ItemModel::node("under", 0.0, 0.0)).unwrap();
		g.add_item(ItemKind::Node, ItemModel::node("over", 6.0, 0.0)).unwrap();
		g.paint().unwrap();
		assert_eq!(g.node_at(Point::new(3.0, 0.0)).map(|n| n.id()), Some("over"));
		assert_eq!(g.node_at(Point::new(-8.0, 0.0)).map(|n| n.id()), Some("under"));
		assert!(g.node_at(Point::new(50.0, 50.0)).is_none());
	}
}

#[test]
fn mappers_shape_incoming_models() {
	let (mut g, _) = graph();
	g.set_node_mapper(|m| m.label = Some(m.id.to_uppercase()));
	g.set_edge_mapper(|m| {
		m.style.insert("lineWidth".into(), json!(3));
	});
	g.read(triangle()).unwrap();
	assert_eq!(g.find_by_id("c").unwrap().model().label.as_deref(), Some("C"));
	assert_eq!(g.find_by_id("ab").unwrap().style()["lineWidth"], json!(3));
}

#[test]
fn finders_walk_insertion_order() {
	let (mut g, _) = graph();
	g.read(triangle()).unwrap();
	let below = g.find_all(ItemKind::Node, |n| n.model().y.unwrap_or(0.0) < 50.0);
	assert_eq!(ids(below), ["a", "b"]);
	assert_eq!(
		g.find(ItemKind::Edge, |e| e.as_edge().is_some_and(|e| e.source == "c")).map(|e| e.id()),
		Some("ca")
	);
}

#[test]
fn refreshing_an_item_schedules_a_redraw() {
	let (mut g, log) = graph();
	g.add_item(ItemKind::Node, ItemModel::node("a", 5.0, 5.0).with_label("alpha"))
		.unwrap();
	assert!(g.tick(0.0));
	assert!(!g.needs_tick());

	g.refresh_item("a").unwrap();
	assert!(g.needs_tick());
	assert!(g.tick(16.0));
	assert_eq!(log.frames(), 2);
	let a = g.find_by_id("a").unwrap();
	assert_eq!(a.model().label.as_deref(), Some("alpha"));
	assert_eq!(a.as_node().unwrap().center, Point::new(5.0, 5.0));

	assert!(matches!(g.refresh_item("zz"), Err(GraphError::ItemNotFound(_))));
}
