use crate::cli::Output;
use crate::git::GitOperations;
use anyhow::Result;
use clap::Args;

/// Git hooks huskier may have been asked to manage
const KNOWN_HOOKS: [&str; 6] = [
    "pre-commit",
    "prepare-commit-msg",
    "commit-msg",
    "post-checkout",
    "post-merge",
    "pre-push",
];

#[derive(Args)]
pub struct UninstallArgs {
    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

pub async fn execute(args: UninstallArgs, output: &Output) -> Result<i32> {
    let git = match GitOperations::discover() {
        Ok(git) => git,
        Err(_) => {
            output.error("Not in a git repository");
            return Ok(1);
        }
    };

    let managed: Vec<&str> = KNOWN_HOOKS
        .into_iter()
        .filter(|hook| git.is_managed_hook(hook))
        .collect();

    if managed.is_empty() {
        output.info("No huskier hooks found to remove");
        return Ok(0);
    }

    if !args.yes {
        output.warning(&format!("This will remove {} huskier hook(s):", managed.len()));
        for hook in &managed {
            println!("  - {hook}");
        }
        if !output.confirm("Are you sure you want to continue?")? {
            output.info("Uninstall cancelled");
            return Ok(0);
        }
    }

    let mut failures = 0;
    for hook in managed {
        match git.remove_hook(hook) {
            Ok(()) => output.success(&format!("Removed '{hook}' hook")),
            Err(e) => {
                output.error(&format!("Failed to remove '{hook}' hook: {e:#}"));
                failures += 1;
            }
        }
    }

    Ok(if failures == 0 { 0 } else { 1 })
}
