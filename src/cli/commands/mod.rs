//! Command implementations for Huskier CLI
//!
//! Each command lives in its own module and returns the exit code the process
//! should finish with.

pub mod init;
pub mod run;
pub mod uninstall;
pub mod version;
