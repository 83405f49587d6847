//! External command execution through tokio.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::debug;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::ports::{CommandRunner, ProcessOutput};

/// Command runner backed by real child processes.
///
/// The child is killed when the deadline passes; output is captured
/// in full before returning.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessRunner;

impl ProcessRunner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(
        &self,
        program: &str,
        args: &[&str],
        deadline: Duration,
    ) -> DomainResult<ProcessOutput> {
        debug!(program, ?args, "Running external command");

        let child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|err| DomainError::CommandFailed {
                program: program.to_string(),
                detail: err.to_string(),
            })?;

        let output = timeout(deadline, child.wait_with_output())
            .await
            .map_err(|_| DomainError::CommandTimeout {
                program: program.to_string(),
                timeout_ms: u64::try_from(deadline.as_millis()).unwrap_or(u64::MAX),
            })?
            .map_err(|err| DomainError::CommandFailed {
                program: program.to_string(),
                detail: err.to_string(),
            })?;

        Ok(ProcessOutput {
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
