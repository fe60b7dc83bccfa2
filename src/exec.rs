use std::io;
use std::process::{Command, Output};

/// Result of a command execution.
#[derive(Debug, Clone, Default)]
pub struct ExecResult {
    pub stdout: String,
    pub stderr: String,
    pub success: bool,
    pub code: Option<i32>,
}

impl From<Output> for ExecResult {
    fn from(output: Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            success: output.status.success(),
            code: output.status.code(),
        }
    }
}

impl ExecResult {
    /// stderr if there is any, otherwise stdout, trimmed.
    pub fn detail(&self) -> String {
        let detail = if self.stderr.trim().is_empty() {
            self.stdout.trim()
        } else {
            self.stderr.trim()
        };
        match self.code {
            Some(code) => format!("exit {}: {}", code, detail),
            None => detail.to_string(),
        }
    }
}

/// Runs external programs. Swapped out in tests.
pub trait Runner {
    fn run(&self, program: &str, args: &[&str]) -> io::Result<ExecResult>;
}

/// Runs commands for real, blocking until they exit.
#[derive(Debug, Default)]
pub struct SystemRunner;

impl Runner for SystemRunner {
    fn run(&self, program: &str, args: &[&str]) -> io::Result<ExecResult> {
        Command::new(program)
            .args(args)
            .output()
            .map(ExecResult::from)
    }
}
