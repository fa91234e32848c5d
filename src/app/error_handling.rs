//! Error handling utilities
//!
//! This module provides centralized error handling for the binary.

use tracing::error;

/// Exit code for bad arguments or configuration
pub const ARGUMENT_ERROR: i32 = 2;
/// Exit code for every other failure
pub const GENERAL_ERROR: i32 = 1;

/// Exit code for an error, based on the crate error type when available
pub fn exit_code(error: &anyhow::Error) -> i32 {
    use crate::error::Error;

    match error.downcast_ref::<Error>() {
        Some(err) if err.is_usage_error() => ARGUMENT_ERROR,
        _ => GENERAL_ERROR,
    }
}

/// Handle fatal errors and exit with appropriate status code
///
/// # Verbose Mode Behavior
/// - `verbose = 0`: the error message only
/// - `verbose >= 1`: includes the full error chain
pub fn handle_fatal_error(error: anyhow::Error, verbose: u8) -> ! {
    error!("Fatal error: {}", error);

    eprintln!("Error: {error}");

    if verbose >= 1 {
        eprintln!("\nError chain:");
        for (i, cause) in error.chain().enumerate() {
            eprintln!("  {}: {}", i, cause);
        }
    }

    std::process::exit(exit_code(&error))
}
