use std::process::Command;

use tracing::trace;

use crate::{error::QueryError, QueryResult};

/// Captured result of running an external command.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    pub exit_code: i32,
    pub stdout: Vec<String>,
    pub stderr: Vec<String>,
}

impl ProcessOutput {
    pub fn new(exit_code: i32, stdout: Vec<String>, stderr: Vec<String>) -> Self {
        Self {
            exit_code,
            stdout,
            stderr,
        }
    }

    /// Builds an output from raw captured text, one entry per line.
    pub fn from_text(exit_code: i32, stdout: &str, stderr: &str) -> Self {
        Self::new(exit_code, split_lines(stdout), split_lines(stderr))
    }

    pub fn is_zero_return_code(&self) -> bool {
        self.exit_code == 0
    }

    pub fn has_output(&self) -> bool {
        !self.stdout.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        !self.stderr.is_empty()
    }

    pub fn stderr_as_string(&self) -> String {
        self.stderr.join("\n")
    }
}

fn split_lines(text: &str) -> Vec<String> {
    text.lines().map(String::from).collect()
}

/// Runs a command line and captures what it printed.
pub trait ProcessRunner: Send + Sync {
    fn execute(&self, command: &[String]) -> QueryResult<ProcessOutput>;
}

/// [`ProcessRunner`] backed by [`std::process::Command`].
pub struct SystemProcessRunner;

impl ProcessRunner for SystemProcessRunner {
    fn execute(&self, command: &[String]) -> QueryResult<ProcessOutput> {
        let (program, args) = command.split_first().ok_or_else(|| {
            QueryError::Spawn {
                program: String::new(),
                source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "empty command"),
            }
        })?;

        let output = Command::new(program)
            .args(args)
            .output()
            .map_err(|err| {
                QueryError::Spawn {
                    program: program.clone(),
                    source: err,
                }
            })?;

        // Killed by a signal: no exit code.
        let exit_code = output.status.code().unwrap_or(-1);
        trace!("{} exited with {}", program, exit_code);

        Ok(ProcessOutput::from_text(
            exit_code,
            &String::from_utf8_lossy(&output.stdout),
            &String::from_utf8_lossy(&output.stderr),
        ))
    }
}
