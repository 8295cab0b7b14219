//! Release automation driven by conventional commits.
//!
//! Reads commit history since the last release tag, decides the semantic
//! version bump, renders a changelog section, then writes, commits, tags and
//! pushes the release. Every collaborator sits behind a trait so workflows
//! can run against [`git::MockRepository`] and the in-memory stores.

pub mod analyzer;
pub mod boundary;
pub mod changelog;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod git;
pub mod logging;
pub mod store;
pub mod ui;

pub use error::{ReleaseError, Result};
