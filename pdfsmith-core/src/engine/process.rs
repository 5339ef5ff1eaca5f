//! Child-process invocation with a deadline

use crate::deadline::Deadline;
use crate::error::{Result, TransformError};
use crate::scratch::ScratchDir;
use std::ffi::OsStr;
use std::fs::File;
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};
use std::time::Duration;
use tracing::{debug, warn};

const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Longest stderr excerpt carried into an error message
const MAX_STDERR_CHARS: usize = 2_000;

/// Outcome of a finished tool invocation
#[derive(Debug)]
pub(crate) struct ToolRun {
    pub status: ExitStatus,
    pub stderr: String,
}

impl ToolRun {
    pub fn success(&self) -> bool {
        self.status.success()
    }

    pub fn exit_code(&self) -> Option<i32> {
        self.status.code()
    }

    /// Engine failure carrying the tool's stderr, or its exit code when silent.
    pub fn failure(&self, tool: &str) -> TransformError {
        let stderr = self.stderr.trim();
        let message = if stderr.is_empty() {
            match self.status.code() {
                Some(code) => format!("exited with status {code}"),
                None => "terminated by signal".to_string(),
            }
        } else {
            stderr.chars().take(MAX_STDERR_CHARS).collect()
        };
        TransformError::engine(tool, message)
    }
}

/// A command line for one of the external engines.
///
/// Stdout is discarded and stderr is captured to a file inside the caller's
/// scratch directory rather than a pipe, so a chatty tool can never stall on
/// a full pipe while the deadline is being polled.
pub(crate) struct Tool {
    name: &'static str,
    command: Command,
}

impl Tool {
    pub fn new(name: &'static str, program: &Path) -> Self {
        let mut command = Command::new(program);
        command.stdin(Stdio::null()).stdout(Stdio::null());
        Self { name, command }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.command.arg(arg);
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.command.args(args);
        self
    }

    /// Spawns the tool and waits for it, killing it if `deadline` passes.
    pub fn run(mut self, scratch: &ScratchDir, deadline: Deadline) -> Result<ToolRun> {
        deadline.check(self.name)?;

        let stderr_path = scratch.join(format!("{}.stderr", self.name));
        let stderr_file = File::create(&stderr_path)?;
        self.command.stderr(Stdio::from(stderr_file));

        debug!(tool = self.name, command = ?self.command, "running engine");
        let mut child = self
            .command
            .spawn()
            .map_err(|source| TransformError::EngineUnavailable {
                tool: self.name.to_string(),
                source,
            })?;

        let status = loop {
            if let Some(status) = child.try_wait()? {
                break status;
            }
            if deadline.is_expired() {
                warn!(tool = self.name, "deadline passed, killing engine");
                if let Err(e) = child.kill() {
                    warn!(tool = self.name, error = %e, "failed to kill engine");
                }
                if let Err(e) = child.wait() {
                    warn!(tool = self.name, error = %e, "failed to reap engine");
                }
                return Err(deadline.timed_out(self.name));
            }
            let nap = deadline
                .remaining()
                .map_or(POLL_INTERVAL, |left| left.min(POLL_INTERVAL));
            std::thread::sleep(nap);
        };

        let stderr = String::from_utf8_lossy(&std::fs::read(&stderr_path)?).into_owned();
        debug!(tool = self.name, status = ?status.code(), "engine finished");
        Ok(ToolRun { status, stderr })
    }
}
