//! Errors surfaced while loading configuration or attaching to the canvas.
//!
//! Engine operations themselves never fail: invalid links are dropped and
//! unsupported drawing primitives are skipped.

use thiserror::Error;

/// Errors raised outside the per-frame engine path.
#[derive(Error, Debug)]
pub enum GraphError {
	/// Configuration JSON could not be parsed.
	#[error("failed to parse view config: {0}")]
	ConfigParse(#[source] serde_json::Error),

	/// Graph data JSON could not be parsed.
	#[error("failed to parse graph data: {0}")]
	DataParse(#[source] serde_json::Error),

	/// Configuration parsed but holds out-of-range values.
	#[error("invalid view config: {0}")]
	InvalidConfig(String),

	/// The canvas element was not mounted.
	#[error("canvas element is not mounted")]
	MissingCanvas,

	/// The canvas refused to hand out a 2D context.
	#[error("2d rendering context unavailable")]
	ContextUnavailable,
}
