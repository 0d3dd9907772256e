//! Named item states ("selected", "hover", ...).
//!
//! The store maps each state name to the ids currently in it, so querying a
//! state costs the size of that state's set. Sets are created on first use
//! and dropped once empty. The per-item ordering of states (which decides
//! style precedence) lives on the item itself.

use std::collections::HashMap;

use super::types::ItemId;

/// State name to member ids.
#[derive(Clone, Debug, Default)]
pub struct StateStore {
	sets: HashMap<String, Vec<ItemId>>,
}

impl StateStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// Add or remove `id` from `state`. Returns whether membership changed.
	pub fn set(&mut self, id: &str, state: &str, enabled: bool) -> bool {
		if enabled {
			let members = self.sets.entry(state.to_string()).or_default();
			if members.iter().any(|m| m == id) {
				return false;
			}
			members.push(id.to_string());
			true
		} else {
			let Some(members) = self.sets.get_mut(state) else {
				return false;
			};
			let before = members.len();
			members.retain(|m| m != id);
			let changed = members.len() != before;
			if members.is_empty() {
				self.sets.remove(state);
			}
			changed
		}
	}

	pub fn contains(&self, id: &str, state: &str) -> bool {
		self.sets
			.get(state)
			.is_some_and(|members| members.iter().any(|m| m == id))
	}

	/// Ids in `state`, in the order they entered it.
	pub fn members(&self, state: &str) -> &[ItemId] {
		self.sets.get(state).map(Vec::as_slice).unwrap_or_default()
	}

	/// Drop `id` from every listed state.
	pub fn remove_item<'a>(&mut self, id: &str, states: impl IntoIterator<Item = &'a str>) {
		for state in states {
			self.set(id, state, false);
		}
	}

	pub fn clear(&mut self) {
		self.sets.clear();
	}
}
