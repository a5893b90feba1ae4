use crate::cli::Output;
use crate::config::{ConfigSource, PRE_COMMIT};
use crate::execution::{ExecutionMode, Report};
use crate::hooks::{self, HookContext};
use anyhow::Result;
use clap::{ArgGroup, Args};
use std::sync::Arc;

#[derive(Args, Clone)]
#[command(group(ArgGroup::new("target").required(true).args(["hook", "staged"])))]
pub struct RunArgs {
    /// Hook name to run
    pub hook: Option<String>,

    /// Run the pre-commit command list (what the installed hook calls)
    #[arg(long)]
    pub staged: bool,

    /// Run top-level commands concurrently, overriding the configuration
    #[arg(long, conflicts_with = "sequential")]
    pub parallel: bool,

    /// Run commands one at a time, overriding the configuration
    #[arg(long)]
    pub sequential: bool,
}

impl RunArgs {
    fn hook_name(&self) -> &str {
        match &self.hook {
            Some(hook) => hook,
            None => PRE_COMMIT,
        }
    }

    fn mode_override(&self) -> Option<ExecutionMode> {
        if self.parallel {
            Some(ExecutionMode::Parallel)
        } else if self.sequential {
            Some(ExecutionMode::Sequential)
        } else {
            None
        }
    }
}

pub async fn execute(args: RunArgs, config_path: Option<&str>, output: Output) -> Result<i32> {
    let config = ConfigSource::current_dir()?
        .with_custom_config(config_path)
        .load()?;

    let mut context = HookContext::new(config);
    if let Some(mode) = args.mode_override() {
        context = context.with_mode(mode);
    }

    output.verbose(&format!(
        "Running {} hook in {} mode",
        args.hook_name(),
        context.mode.name()
    ));

    let sink = Arc::new(output);
    let summary = match args.hook_name() {
        PRE_COMMIT => hooks::pre_commit::execute(&context, sink).await?,
        name => hooks::run(name, &context, sink).await?,
    };

    let report = Report::build(&summary.outcomes, summary.total_units, summary.top_level);
    for line in &report.lines {
        output.verbose(&line.to_string());
    }
    if !summary.is_success() {
        output.error(&format!(
            "{} hook failed: {} command(s) failed",
            args.hook_name(),
            report.failed_lines().count()
        ));
    }

    Ok(summary.exit_code())
}
