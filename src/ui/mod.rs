//! User interface module - terminal output and JSON printing.
//!
//! - `formatter` - Styled human-readable output
//! - This module - Machine-readable output

use anyhow::Result;
use serde::Serialize;

pub mod formatter;

pub use formatter::{
    display_boundary_warning, display_bump_outcome, display_changelog, display_error,
    display_heading, display_readiness, display_release_report, display_status, display_success,
    format_stopped,
};

/// Print a value as pretty JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", to_json(value)?);
    Ok(())
}

pub fn to_json<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}
