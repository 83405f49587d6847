//! Command runner port - interface for external process execution.
//!
//! The decision core never shells out directly. Staging resolved
//! files and reading merge status go through this port so tests can
//! script the outside world.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::errors::DomainResult;

/// Captured output of one external command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    /// Successful empty output.
    pub fn ok() -> Self {
        Self { exit_code: 0, stdout: String::new(), stderr: String::new() }
    }

    /// Successful output with the given stdout.
    pub fn with_stdout(stdout: impl Into<String>) -> Self {
        Self { exit_code: 0, stdout: stdout.into(), stderr: String::new() }
    }

    /// Failed output with the given exit code and stderr.
    pub fn failed(exit_code: i32, stderr: impl Into<String>) -> Self {
        Self { exit_code, stdout: String::new(), stderr: stderr.into() }
    }

    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Trait for running external commands with a timeout.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `program` with `args`, capturing output. Implementations
    /// return `CommandTimeout` when the deadline passes and
    /// `CommandFailed` when the process cannot be spawned; a non-zero
    /// exit is reported through `ProcessOutput`, not as an error.
    async fn run(&self, program: &str, args: &[&str], timeout: Duration)
        -> DomainResult<ProcessOutput>;
}

/// One recorded invocation on a [`StaticCommandRunner`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub program: String,
    pub args: Vec<String>,
    pub timeout: Duration,
}

/// A scripted command runner for tests and offline use.
///
/// Responses are consumed in FIFO order; once the script runs out,
/// every call succeeds with empty output. All invocations are
/// recorded for assertion.
#[derive(Debug, Default)]
pub struct StaticCommandRunner {
    responses: Mutex<Vec<ProcessOutput>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl StaticCommandRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a canned response.
    pub fn respond_with(self, output: ProcessOutput) -> Self {
        self.responses
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(output);
        self
    }

    /// All invocations recorded so far.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl CommandRunner for StaticCommandRunner {
    async fn run(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> DomainResult<ProcessOutput> {
        self.calls
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(RecordedCall {
                program: program.to_string(),
                args: args.iter().map(ToString::to_string).collect(),
                timeout,
            });

        let mut responses = self
            .responses
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if responses.is_empty() {
            Ok(ProcessOutput::ok())
        } else {
            Ok(responses.remove(0))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_runner_replays_script_then_defaults() {
        let runner = StaticCommandRunner::new()
            .respond_with(ProcessOutput::with_stdout("UU app.ts\n"))
            .respond_with(ProcessOutput::failed(128, "fatal: not a repository"));

        let first = runner.run("git", &["status", "--porcelain"], Duration::from_secs(5)).await.unwrap();
        assert_eq!(first.stdout, "UU app.ts\n");
        assert!(first.success());

        let second = runner.run("git", &["add", "app.ts"], Duration::from_secs(5)).await.unwrap();
        assert!(!second.success());
        assert_eq!(second.exit_code, 128);

        let third = runner.run("git", &["add", "app.ts"], Duration::from_secs(5)).await.unwrap();
        assert!(third.success());

        let calls = runner.calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[0].args, vec!["status", "--porcelain"]);
        assert_eq!(calls[0].timeout, Duration::from_secs(5));
    }
}
