//! Initialize Huskier in a repository
//!
//! Installs the pre-commit hook script and adds an empty command list to the
//! project configuration.

use crate::cli::Output;
use crate::config::{PACKAGE_JSON, PRE_COMMIT, TOML_CONFIG, ensure_package_key};
use crate::git::{GitOperations, hook_script};
use anyhow::Result;
use clap::Args;
use std::path::Path;

const DEFAULT_TOML: &str = "parallel = false\n\n[hooks]\npre-commit = []\n";

#[derive(Args)]
pub struct InitArgs {
    /// Overwrite an existing pre-commit hook that was not installed by huskier
    #[arg(short, long)]
    pub force: bool,
}

/// Execute the init command
pub async fn execute(args: InitArgs, output: &Output) -> Result<i32> {
    output.header("🐶 Initializing Huskier");

    let git = GitOperations::discover()?;
    install_pre_commit(&git, args.force, output)?;

    let root = match git.workdir() {
        Some(dir) => dir.to_path_buf(),
        None => std::env::current_dir()?,
    };
    add_config(&root, output)?;

    Ok(0)
}

fn install_pre_commit(git: &GitOperations, force: bool, output: &Output) -> Result<()> {
    if git.hook_exists(PRE_COMMIT) && !git.is_managed_hook(PRE_COMMIT) && !force {
        output.warning(&format!(
            "A {PRE_COMMIT} hook already exists at {}, use --force to replace it",
            git.hook_path(PRE_COMMIT).display()
        ));
        return Ok(());
    }

    git.install_hook(PRE_COMMIT, &hook_script(PRE_COMMIT))?;
    output.success(&format!("Installed {PRE_COMMIT} hook"));
    Ok(())
}

fn add_config(root: &Path, output: &Output) -> Result<()> {
    let package_json = root.join(PACKAGE_JSON);

    if package_json.exists() {
        if ensure_package_key(&package_json)? {
            output.success(&format!("Added huskier key to {PACKAGE_JSON}"));
        } else {
            output.info(&format!("The huskier key already exists in {PACKAGE_JSON}"));
        }
        return Ok(());
    }

    let toml = root.join(TOML_CONFIG);
    if toml.exists() {
        output.info(&format!("{TOML_CONFIG} already exists"));
    } else {
        std::fs::write(&toml, DEFAULT_TOML)?;
        output.success(&format!("Created {TOML_CONFIG}"));
    }
    Ok(())
}
