//! Browser entry points.
//!
//! Every export takes plain strings and hands back a JSON string, so the page
//! only ever needs `JSON.parse`:
//!
//! ```js
//! import init, { start, run } from 'gridwalk';
//!
//! await init();
//! start();
//! const report = JSON.parse(run("Repeat 4\n    Move 9\n    Turn right", ""));
//! // { success: true, trace: { moves: [...], end_state: "(0, 0) facing east.", ... } }
//! ```

use std::sync::Arc;

use log::{info, warn};
use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::{Grid, GridError, Interpreter, Metrics, RunReport, analyze, parse, run_with_report};

/// Board used when the page supplies no layout.
pub const DEFAULT_GRID_SIZE: usize = 10;

#[wasm_bindgen]
pub fn start() {
	set_panic_hook();
	init_logging();
	info!("gridwalk {} ready", env!("CARGO_PKG_VERSION"));
}

/// Parse and execute `source` on the board described by `layout`
/// (`o`, `+`, `x` rows; empty for a blank 10×10 board).
///
/// Returns a JSON [`RunReport`]. Runtime failures still carry the partial
/// trace; parse failures carry none.
#[wasm_bindgen]
pub fn run(source: &str, layout: &str) -> String {
	let report = match (load_grid(layout), parse(source)) {
		(Err(e), _) => RunReport {
			success: false,
			trace: None,
			error: Some(e.to_string()),
		},
		(_, Err(e)) => RunReport::parse_failed(&e),
		(Ok(grid), Ok(commands)) => run_with_report(&commands, grid, &Interpreter::new()),
	};
	if let Some(error) = &report.error {
		warn!("run failed: {error}");
	}
	serde_json::to_string(&report).unwrap_or_else(|e| serialization_failure(&e))
}

#[derive(Serialize)]
struct MetricsReport {
	success: bool,
	#[serde(skip_serializing_if = "Option::is_none")]
	metrics: Option<Metrics>,
	#[serde(skip_serializing_if = "Option::is_none")]
	error: Option<String>,
}

/// Static metrics of `source` as JSON, without running it.
#[wasm_bindgen]
pub fn metrics(source: &str) -> String {
	let report = match parse(source) {
		Ok(commands) => MetricsReport {
			success: true,
			metrics: Some(analyze(&commands)),
			error: None,
		},
		Err(e) => MetricsReport {
			success: false,
			metrics: None,
			error: Some(e.to_string()),
		},
	};
	serde_json::to_string(&report).unwrap_or_else(|e| serialization_failure(&e))
}

#[wasm_bindgen]
pub fn version() -> String {
	env!("CARGO_PKG_VERSION").to_string()
}

fn serialization_failure(err: &serde_json::Error) -> String {
	serde_json::json!({
		"success": false,
		"error": format!("Serialization error: {err}"),
	})
	.to_string()
}

fn load_grid(layout: &str) -> Result<Arc<Grid>, GridError> {
	if layout.trim().is_empty() {
		Ok(Arc::new(Grid::new_empty(DEFAULT_GRID_SIZE)))
	} else {
		Grid::from_text(layout).map(Arc::new)
	}
}

pub fn set_panic_hook() {
	// With the `console_error_panic_hook` feature on, panics show up in the
	// browser console instead of as an opaque `unreachable` trap.
	#[cfg(feature = "console_error_panic_hook")]
	console_error_panic_hook::set_once();
}

fn init_logging() {
	#[cfg(target_arch = "wasm32")]
	{
		// Already initialized when the page calls start() twice.
		let _ = console_log::init_with_level(log::Level::Debug);
	}

	#[cfg(not(target_arch = "wasm32"))]
	{
		let _ = env_logger::Builder::from_default_env().filter_level(log::LevelFilter::Debug).try_init();
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn json(s: &str) -> serde_json::Value {
		serde_json::from_str(s).expect("valid json")
	}

	#[test]
	fn run_on_default_board() {
		let out = json(&run("Repeat 4\n    Move 9\n    Turn right", ""));
		assert_eq!(out["success"], true);
		assert_eq!(out["trace"]["end_state"], "(0, 0) facing east.");
		assert_eq!(out["trace"]["moves"].as_array().map(Vec::len), Some(8));
		assert_eq!(out["trace"]["facing"], "East");
		assert!(out.get("error").is_none());
	}

	#[test]
	fn run_on_custom_layout_reaches_finish() {
		let out = json(&run("Move 2", "oox\nooo\nooo\n"));
		assert_eq!(out["trace"]["reached_finish"], true);
		assert_eq!(out["trace"]["points_visited"], serde_json::json!([[0, 0], [2, 0]]));
	}

	#[test]
	fn runtime_error_keeps_trace() {
		let out = json(&run("Move 1\nMove 1\nMove 5", "oo+\nooo\nooo\n"));
		assert_eq!(out["success"], false);
		assert_eq!(out["trace"]["moves"], serde_json::json!(["Move 1"]));
		assert_eq!(out["error"], "Cannot move to (2, 0): there is a wall. Character is at (1, 0) facing east.");
	}

	#[test]
	fn parse_error_has_no_trace() {
		let out = json(&run("Repeat 2\n     Move 1", ""));
		assert_eq!(out["success"], false);
		assert!(out.get("trace").is_none());
		assert_eq!(out["error"], "Unexpected indentation at line 2: '     Move 1'");
	}

	#[test]
	fn bad_layout_is_reported() {
		let out = json(&run("Move 1", "oo\no"));
		assert_eq!(out["success"], false);
		assert!(out["error"].as_str().is_some_and(|e| e.contains("square")));
	}

	#[test]
	fn metrics_json() {
		let out = json(&metrics("Move 1\nRepeat 2\n    Turn left"));
		assert_eq!(out["metrics"], serde_json::json!({"total_commands": 3, "repeat_count": 1, "max_nesting_depth": 1}));
		assert_eq!(json(&metrics("Jump"))["success"], false);
	}

	#[test]
	fn serialization_failure_is_valid_json() {
		let err = serde_json::from_str::<u32>(r#""quoted \ text""#).unwrap_err();
		let out = json(&serialization_failure(&err));
		assert_eq!(out["success"], false);
		assert!(out["error"].as_str().is_some_and(|e| e.starts_with("Serialization error: ")));
	}

	#[test]
	fn version_matches_package() {
		assert_eq!(version(), env!("CARGO_PKG_VERSION"));
	}
}
