//! Version command implementation

use crate::cli::Output;
use anyhow::Result;

/// Execute the version command
pub async fn execute(output: &Output) -> Result<i32> {
    output.header(&format!("{} v{}", crate::PKG_NAME, crate::VERSION));
    output.key_value("Description:", crate::PKG_DESCRIPTION);
    output.key_value("Repository:", env!("CARGO_PKG_REPOSITORY"));
    output.key_value("Target:", std::env::consts::ARCH);
    output.key_value(
        "Profile:",
        if cfg!(debug_assertions) { "debug" } else { "release" },
    );
    Ok(0)
}
