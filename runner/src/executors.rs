use std::process::{Command, ExitStatus};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ExecutorError {
    #[error("Failed to spawn command")]
    Spawn(#[from] std::io::Error),
    #[error("Command exited with {status}: {command}")]
    Failed { command: String, status: ExitStatus },
}

/// Seam between the phase runner and the operating system. The runner only
/// needs sequential, run-to-completion execution of an already resolved
/// command line.
pub trait CommandExecutor {
    /// run one command to completion and report its exit status
    fn run(&mut self, command: &str) -> Result<ExitStatus, ExecutorError>;
}

/// Executor that hands commands to the local shell.
///
/// Standard streams are inherited so psql/sqlplus/dbaccess output lands on
/// the benchmark operator's terminal, interleaved with the phase logs.
#[derive(Debug, Default)]
pub struct ShellExecutor;

impl CommandExecutor for ShellExecutor {
    fn run(&mut self, command: &str) -> Result<ExitStatus, ExecutorError> {
        let mut child = Command::new("sh").arg("-c").arg(command).spawn()?;
        let status = child.wait()?;

        debug!("Command finished with status {status}");

        Ok(status)
    }
}
