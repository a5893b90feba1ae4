//! # Huskier - git pre-commit hooks, sequential or parallel
//!
//! Huskier runs a configured list of shell commands as a git hook. Commands run
//! either strictly one after another or all at once, and the run stops at the
//! first failing command in both modes.
//!
//! ## Features
//!
//! - **Two execution modes**: sequential with fail-fast, or one concurrent task
//!   per configured entry
//! - **Ordered sub-sequences**: an entry can be a list of commands that always
//!   run in order, even in parallel mode
//! - **Stable reports**: results are listed in configuration order no matter
//!   which command finished first
//! - **Zero surprises at exit**: the exit status is non-zero exactly when a
//!   command failed
//!
//! ## Quick Start
//!
//! ```bash
//! # Install the pre-commit hook and add the huskier key to package.json
//! huskier init
//!
//! # Run the pre-commit commands by hand
//! huskier run --staged
//!
//! # Same, all entries at once
//! huskier run --staged --parallel
//! ```
//!
//! ## Configuration
//!
//! ```json
//! {
//!   "huskier": {
//!     "parallel": true,
//!     "hooks": {
//!       "pre-commit": ["npm run lint", ["npm run build", "npm test"]]
//!     }
//!   }
//! }
//! ```

pub mod cli;
pub mod config;
pub mod execution;
pub mod git;
pub mod hooks;

pub use cli::{Cli, Output};
pub use config::HuskierConfig;

/// Result type alias for Huskier operations
pub type Result<T> = anyhow::Result<T>;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
pub const PKG_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
