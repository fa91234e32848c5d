//! Per-version test-run timelines
//!
//! Raw test-run documents are grouped by version, the trailing window of
//! versions is folded in order into summaries, and categories missing from a
//! version are backfilled from the history of earlier versions so every
//! chart series stays present.

pub mod chart;
pub mod collector;
pub mod engine;
pub mod history;
pub mod models;
pub mod reducer;

pub use collector::{collect, collect_raw, VersionGroups};
pub use engine::{TimelineEngine, DEFAULT_WINDOW_SIZE};
pub use history::{CategoryHistory, CategoryTotals};
pub use models::*;
pub use reducer::reduce;
