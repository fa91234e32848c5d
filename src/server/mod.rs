//! HTTP service exposing timelines to the dashboard
//!
//! Every request fetches its own snapshot from the record source and runs
//! its own engine invocation; no state is shared between requests.

pub mod api_server;

pub use api_server::{ApiResponse, TimelineApiServer};
