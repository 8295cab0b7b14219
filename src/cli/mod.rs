//! Workflow logic behind the command-line surface
//!
//! `main.rs` only parses arguments and prints; everything it runs lives here
//! so it can be driven against mock collaborators.

pub mod commands;
pub mod orchestration;
pub mod readiness;

pub use commands::{bump, preview, BumpOutcome, ReleasePreview};
pub use orchestration::{
    run_release, PushOutcome, ReleaseEnv, ReleaseMachine, ReleaseOptions, ReleaseReport,
    ReleaseState,
};
pub use readiness::{check_readiness, CheckResult, CheckStatus, ReadinessReport};
