//! Terminal output for Huskier
//!
//! Turns the orchestrator's semantic run events into styled status lines,
//! in the spirit of husky and lint-staged.

use crate::execution::{CommandUnit, EventSink, FailureKind, ReportTotals, RunEvent};
use console::style;
use std::io::Write;

/// Output handler for consistent CLI formatting
#[derive(Debug, Clone, Copy)]
pub struct Output {
    verbose: bool,
    quiet: bool,
}

impl Output {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self { verbose, quiet }
    }

    pub fn success(&self, message: &str) {
        if !self.quiet {
            println!("{} {}", style("✔").green(), message);
        }
    }

    /// Errors are shown even in quiet mode
    pub fn error(&self, message: &str) {
        eprintln!("{} {}", style("✖").red(), message);
    }

    pub fn warning(&self, message: &str) {
        if !self.quiet {
            println!("{} {}", style("⚠").yellow(), message);
        }
    }

    pub fn info(&self, message: &str) {
        if !self.quiet {
            println!("{} {}", style("ℹ").blue(), message);
        }
    }

    /// Only shown with `--verbose`
    pub fn verbose(&self, message: &str) {
        if self.verbose && !self.quiet {
            println!("{} {}", style("ℹ").dim(), style(message).dim());
        }
    }

    pub fn header(&self, title: &str) {
        if !self.quiet {
            println!("\n{}", style(title).bold().underlined());
        }
    }

    /// Ask for user confirmation
    pub fn confirm(&self, message: &str) -> std::io::Result<bool> {
        print!("{} {} (y/N): ", style("❯").cyan(), message);
        std::io::stdout().flush()?;

        let mut input = String::new();
        std::io::stdin().read_line(&mut input)?;

        Ok(matches!(input.trim().to_lowercase().as_str(), "y" | "yes"))
    }

    pub fn key_value(&self, key: &str, value: &str) {
        if !self.quiet {
            println!("  {:<14} {}", style(key).dim(), value);
        }
    }

    fn unit_line(&self, label: console::StyledObject<&str>, unit: &CommandUnit, of: usize) -> String {
        format!(
            "{} ({}) {}",
            label,
            unit.position(of),
            style(&unit.command).white().bright().bold()
        )
    }

    fn summary(&self, totals: &ReportTotals) {
        println!(
            "{}{}",
            style("Total commands: ").white().bright(),
            style(totals.configured).cyan()
        );
        println!(
            "{}{}",
            style("Total executed commands: ").white().bright(),
            style(totals.executed).yellow()
        );
        println!(
            "{}{}",
            style("Total execution time: ").white().bright(),
            style(format!("{}ms", totals.elapsed_ms)).yellow()
        );
        if totals.succeeded > 0 {
            println!(
                "{}{}",
                style("Total success commands: ").white().bright(),
                style(totals.succeeded).green()
            );
        }
        if totals.failed > 0 {
            println!(
                "{}{}",
                style("Total failed commands: ").white().bright(),
                style(totals.failed).red()
            );
        }
    }
}

fn describe_failure(failure: &FailureKind) -> String {
    match failure {
        FailureKind::ExitCode(code) => format!("exited with code {code}"),
        FailureKind::Signal => "terminated by signal".to_string(),
        FailureKind::Spawn(reason) => format!("could not be started: {reason}"),
    }
}

impl EventSink for Output {
    fn emit(&self, event: RunEvent) {
        match event {
            RunEvent::Started { unit, of } => {
                if !self.quiet {
                    println!("{}", self.unit_line(style("[STARTED]").yellow(), &unit, of));
                }
            }
            RunEvent::Succeeded {
                unit,
                of,
                elapsed_ms,
            } => {
                if !self.quiet {
                    println!(
                        "{} {}",
                        self.unit_line(style("[SUCCESS]").green(), &unit, of),
                        style(format!("({elapsed_ms}ms)")).dim()
                    );
                }
            }
            RunEvent::Failed {
                unit,
                of,
                elapsed_ms,
                failure,
            } => {
                println!(
                    "{} {}",
                    self.unit_line(style("[FAILED]").red(), &unit, of),
                    style(format!("({elapsed_ms}ms)")).dim()
                );
                println!("    {}", style(describe_failure(&failure)).red().dim());
            }
            RunEvent::Summary(totals) => {
                if !self.quiet || totals.failed > 0 {
                    self.summary(&totals);
                }
            }
        }
    }
}
