//! # Runboard
//!
//! Turns per-build test-run outcomes into windowed per-version timelines for
//! release dashboards.
//!
//! ## Usage
//!
//! ```bash
//! runboard serve [--listen ADDR]
//! runboard timeline [--records FILE] [--release PREFIX] [--window N]
//! runboard breakdown --build VERSION --by platform
//! ```
//!
//! ## Modules
//!
//! - `timeline` - Grouping, windowed reduction with category backfill, chart payloads
//! - `source` - Record sources supplying raw test-run documents
//! - `server` - HTTP endpoints consumed by the dashboard
//! - `app` - Configuration, logging and fatal error handling
//! - `error` - Crate error type
pub mod app;
pub mod error;
pub mod server;
pub mod source;
pub mod timeline;


pub use error::{Error, Result};
