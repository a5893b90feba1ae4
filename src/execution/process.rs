//! Child process execution for a single command unit

use super::outcome::{ExecutionOutcome, FailureKind, OutcomeStatus};
use super::unit::CommandUnit;
use std::io::Write;
use std::process::Stdio;
use std::time::Instant;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;

/// How child output reaches the terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Forward lines as they arrive, untouched
    Stream,
    /// Forward lines as they arrive, prefixed with the originating command
    Prefixed,
    /// Capture only
    Silent,
}

#[derive(Debug, Clone, Copy)]
enum Target {
    Stdout,
    Stderr,
}

/// Launches command units through a shell and turns their exit into an outcome
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    shell: String,
    output: OutputMode,
}

impl Default for ProcessRunner {
    fn default() -> Self {
        Self::new("sh")
    }
}

impl ProcessRunner {
    pub fn new(shell: impl Into<String>) -> Self {
        Self {
            shell: shell.into(),
            output: OutputMode::Stream,
        }
    }

    pub fn with_output(mut self, output: OutputMode) -> Self {
        self.output = output;
        self
    }

    pub fn output_mode(&self) -> OutputMode {
        self.output
    }

    /// Run one unit to completion
    ///
    /// Never returns an error: a non-zero exit or a process that cannot be
    /// started is a failed outcome.
    pub async fn run(&self, unit: &CommandUnit) -> ExecutionOutcome {
        tracing::trace!("spawning `{}` via {}", unit.command, self.shell);

        let start = Instant::now();
        let spawned = Command::new(&self.shell)
            .arg("-c")
            .arg(&unit.command)
            .stdin(if self.output == OutputMode::Stream {
                Stdio::inherit()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn();

        let mut child = match spawned {
            Ok(child) => child,
            Err(e) => {
                tracing::warn!("failed to spawn `{}`: {}", unit.command, e);
                return ExecutionOutcome {
                    unit: unit.clone(),
                    status: OutcomeStatus::Failed(FailureKind::Spawn(e.to_string())),
                    elapsed_ms: elapsed_ms(start),
                    stdout: String::new(),
                    stderr: String::new(),
                };
            }
        };

        let prefix = match self.output {
            OutputMode::Prefixed => Some(format!("[{}] ", unit.command)),
            _ => None,
        };
        let forward = self.output != OutputMode::Silent;

        let child_stdout = child.stdout.take();
        let child_stderr = child.stderr.take();
        let (waited, stdout, stderr) = tokio::join!(
            child.wait(),
            pump(child_stdout, prefix.as_deref(), Target::Stdout, forward),
            pump(child_stderr, prefix.as_deref(), Target::Stderr, forward),
        );

        let status = match waited {
            Ok(exit) if exit.success() => OutcomeStatus::Success,
            Ok(exit) => match exit.code() {
                Some(code) => OutcomeStatus::Failed(FailureKind::ExitCode(code)),
                None => OutcomeStatus::Failed(FailureKind::Signal),
            },
            Err(e) => {
                tracing::warn!("failed to wait on `{}`: {}", unit.command, e);
                OutcomeStatus::Failed(FailureKind::Spawn(e.to_string()))
            }
        };

        let outcome = ExecutionOutcome {
            unit: unit.clone(),
            status,
            elapsed_ms: elapsed_ms(start),
            stdout,
            stderr,
        };
        tracing::debug!(
            "`{}` finished in {}ms ({:?})",
            unit.command,
            outcome.elapsed_ms,
            outcome.status
        );
        outcome
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}

/// Read a child stream line by line, forwarding each line and capturing all of it
async fn pump<R>(reader: Option<R>, prefix: Option<&str>, target: Target, forward: bool) -> String
where
    R: AsyncRead + Unpin,
{
    let Some(reader) = reader else {
        return String::new();
    };

    let mut reader = BufReader::new(reader);
    let mut captured = String::new();
    let mut buf = Vec::new();

    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {
                let line = String::from_utf8_lossy(&buf);
                if forward {
                    write_line(target, prefix, &line);
                }
                captured.push_str(&line);
            }
            Err(e) => {
                tracing::debug!("stopped reading child output: {}", e);
                break;
            }
        }
    }

    captured
}

fn write_line(target: Target, prefix: Option<&str>, line: &str) {
    let newline = if line.ends_with('\n') { "" } else { "\n" };
    let prefix = prefix.unwrap_or("");
    // Whole-line writes under the lock keep concurrent units from splicing lines
    let _ = match target {
        Target::Stdout => write!(std::io::stdout().lock(), "{prefix}{line}{newline}"),
        Target::Stderr => write!(std::io::stderr().lock(), "{prefix}{line}{newline}"),
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    fn runner() -> ProcessRunner {
        ProcessRunner::default().with_output(OutputMode::Silent)
    }

    #[tokio::test]
    async fn test_successful_command_captures_stdout() {
        let outcome = runner().run(&CommandUnit::single("echo hello", 0)).await;

        assert!(outcome.is_success());
        assert_eq!(outcome.stdout, "hello\n");
        assert!(outcome.stderr.is_empty());
    }

    #[tokio::test]
    async fn test_non_zero_exit_is_failed_outcome() {
        let outcome = runner()
            .run(&CommandUnit::single("echo oops >&2; exit 3", 0))
            .await;

        assert_eq!(outcome.failure(), Some(&FailureKind::ExitCode(3)));
        assert_eq!(outcome.stderr, "oops\n");
    }

    #[tokio::test]
    async fn test_stdout_and_stderr_captured_together() {
        let outcome = runner()
            .run(&CommandUnit::single("echo out; echo err >&2; echo more", 0))
            .await;

        assert!(outcome.is_success());
        assert_eq!(outcome.stdout, "out\nmore\n");
        assert_eq!(outcome.stderr, "err\n");
    }

    #[tokio::test]
    async fn test_missing_shell_is_spawn_failure() {
        let runner = ProcessRunner::new("/definitely/not/a/shell").with_output(OutputMode::Silent);
        let outcome = runner.run(&CommandUnit::single("echo a", 0)).await;

        assert!(matches!(outcome.failure(), Some(FailureKind::Spawn(_))));
        assert!(outcome.stdout.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_command_fails_through_shell() {
        let outcome = runner()
            .run(&CommandUnit::single("huskier-no-such-command-xyz", 0))
            .await;

        assert_eq!(outcome.failure(), Some(&FailureKind::ExitCode(127)));
    }

    #[tokio::test]
    async fn test_elapsed_time_is_measured() {
        let outcome = runner().run(&CommandUnit::single("sleep 0.1", 0)).await;

        assert!(outcome.is_success());
        assert!(outcome.elapsed_ms >= 100);
    }

    #[tokio::test]
    async fn test_output_without_trailing_newline_is_kept() {
        let outcome = runner().run(&CommandUnit::single("printf abc", 0)).await;
        assert_eq!(outcome.stdout, "abc");
    }
}
