//! Observer tests: ordering, unsubscribing and the events each operation
//! emits.

use std::cell::RefCell;
use std::rc::Rc;

use graph_canvas::graph::{GraphEvent, ItemKind, ItemModel};
use serde_json::json;

use crate::helpers::{graph, names, record_events, triangle};

#[test]
fn observers_run_in_registration_order_until_removed() {
	let (mut g, _) = graph();
	let seen = Rc::new(RefCell::new(Vec::new()));
	let (first, second) = (seen.clone(), seen.clone());
	let id = g.on(move |e| first.borrow_mut().push(format!("1:{}", e.name())));
	g.on(move |e| second.borrow_mut().push(format!("2:{}", e.name())));

	g.translate(1.0, 0.0);
	assert!(g.off(id));
	assert!(!g.off(id));
	g.translate(1.0, 0.0);

	assert_eq!(
		*seen.borrow(),
		["1:viewportchange", "2:viewportchange", "2:viewportchange"]
	);
}

#[test]
fn item_operations_emit_after_commit() {
	let (mut g, _) = graph();
	let events = record_events(&mut g);
	g.add_item(ItemKind::Node, ItemModel::node("a", 0.0, 0.0)).unwrap();
	g.update_item("a", json!({ "label": "A" })).unwrap();
	g.set_item_state("a", "hover", true).unwrap();
	g.remove_item("a");

	assert_eq!(
		*events.borrow(),
		[
			GraphEvent::AfterAddItem {
				id: "a".into(),
				kind: ItemKind::Node
			},
			GraphEvent::AfterUpdateItem { id: "a".into() },
			GraphEvent::AfterItemStateChange {
				id: "a".into(),
				state: "hover".into(),
				enabled: true
			},
			GraphEvent::AfterRemoveItem {
				id: "a".into(),
				kind: ItemKind::Node
			},
		]
	);
}

#[test]
fn cascaded_edges_are_reported_before_their_node() {
	let (mut g, _) = graph();
	g.read(triangle()).unwrap();
	let removed = Rc::new(RefCell::new(Vec::new()));
	let sink = removed.clone();
	g.on(move |e| {
		if let GraphEvent::AfterRemoveItem { id, .. } = e {
			sink.borrow_mut().push(id.clone());
		}
	});
	g.remove_item("b");
	assert_eq!(*removed.borrow(), ["ab", "b"]);
	assert!(g.find_by_id("ab").is_none());
}

#[test]
fn mode_changes_are_announced() {
	let (mut g, _) = graph();
	g.register_mode("edit", vec![]).unwrap();
	let events = record_events(&mut g);
	g.set_mode("edit").unwrap();
	assert_eq!(
		*events.borrow(),
		[GraphEvent::AfterModeChange { mode: "edit".into() }]
	);
}

#[test]
fn data_operations_have_distinct_events() {
	let (mut g, _) = graph();
	let events = record_events(&mut g);
	g.read(triangle()).unwrap();
	g.change_data(triangle()).unwrap();
	let names = names(&events);
	assert_eq!(names.first(), Some(&"afterrender"));
	assert_eq!(names.last(), Some(&"afterchangedata"));
	assert!(!names.contains(&"afteradditem"), "nothing new in the second payload");
}
