//! Error taxonomy for the graph engine.
//!
//! Validation failures surface synchronously from the mutating call. Failures
//! raised while a scheduling tick paints or animates are routed to error
//! observers instead (see [`Graph::on_error`](super::Graph::on_error)).

use thiserror::Error;

use super::item::ItemKind;
use super::layout::LayoutError;
use super::surface::SurfaceError;

/// Errors produced by [`Graph`](super::Graph) operations.
#[derive(Debug, Error)]
pub enum GraphError {
	/// An item references an item that does not exist (edge endpoint, group).
	#[error("{item} references missing item `{reference}`")]
	InvalidReference {
		/// The referring item.
		item: String,
		/// The missing id.
		reference: String,
	},

	/// Mode switch to a name that was never registered.
	#[error("unknown mode `{0}`")]
	UnknownMode(String),

	/// Malformed construction options or behavior configuration.
	#[error("invalid configuration: {0}")]
	InvalidConfiguration(String),

	/// A required model field for this kind of item is absent.
	#[error("{kind} model is missing required field `{field}`")]
	MissingField {
		/// Kind being validated.
		kind: ItemKind,
		/// Absent field.
		field: &'static str,
	},

	/// Adding an item whose id is already taken.
	#[error("item `{0}` already exists")]
	DuplicateItem(String),

	/// Update or state change on an id the registry does not hold.
	#[error("item `{0}` not found")]
	ItemNotFound(String),

	/// Update patches must be JSON objects.
	#[error("update patch must be a JSON object")]
	InvalidPatch,

	/// A merged model no longer deserializes (e.g. `x` set to a string).
	#[error("invalid item model: {0}")]
	InvalidModel(#[from] serde_json::Error),

	/// The drawing surface failed.
	#[error(transparent)]
	Surface(#[from] SurfaceError),

	/// The layout provider failed.
	#[error(transparent)]
	Layout(#[from] LayoutError),
}

/// Result type alias for graph operations.
pub type GraphResult<T> = Result<T, GraphError>;
