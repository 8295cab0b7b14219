//! Changelog rendering and persistence layout
//!
//! - `renderer` - Turns classified commits into one release section
//! - `document` - Splices a section into an existing changelog file

pub mod document;
pub mod renderer;

pub use document::{prepend_release, PREAMBLE};
pub use renderer::{render, render_on, ChangelogDocument, ReferenceLinks, BREAKING_HEADING};
