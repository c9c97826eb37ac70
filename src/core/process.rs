//! External tool invocation.
//!
//! Runs a child process with piped stdout/stderr and a hard deadline. Output
//! is drained on background threads so a chatty child cannot stall on a full
//! pipe while we wait for it.

use std::io::Read;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, trace};
use zeroize::Zeroizing;

use crate::error::ProcessError;

const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// How the child's stdin is wired.
#[derive(Debug, Clone, Copy)]
pub enum Input {
    /// Nothing to read
    Null,
    /// Share the terminal, for tools that prompt on their own
    Inherit,
}

/// Captured result of a finished child.
pub struct Captured {
    pub status: ExitStatus,
    /// May contain plaintext; zeroized on drop
    pub stdout: Zeroizing<Vec<u8>>,
    pub stderr: String,
}

impl Captured {
    pub fn success(&self) -> bool {
        self.status.success()
    }

    /// First non-empty stderr line, or the exit status if stderr is empty.
    pub fn diagnostic(&self) -> String {
        self.stderr
            .lines()
            .map(str::trim)
            .find(|l| !l.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("exited with {}", self.status))
    }
}

/// Run `command` to completion or until `timeout` elapses.
///
/// On timeout the child is killed and reaped before returning.
pub fn run(
    mut command: Command,
    input: Input,
    timeout: Duration,
) -> Result<Captured, ProcessError> {
    let program = command.get_program().to_string_lossy().to_string();

    command
        .stdin(match input {
            Input::Null => Stdio::null(),
            Input::Inherit => Stdio::inherit(),
        })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    trace!(program = %program, timeout_secs = timeout.as_secs(), "spawning");

    let mut child = command.spawn().map_err(|source| ProcessError::Spawn {
        program: program.clone(),
        source,
    })?;

    let stdout = drain(child.stdout.take());
    let stderr = drain(child.stderr.take());

    let status = match wait_deadline(&mut child, timeout) {
        Ok(Some(status)) => status,
        Ok(None) => {
            debug!(program = %program, "deadline reached, killing child");
            let _ = child.kill();
            let _ = child.wait();
            return Err(ProcessError::TimedOut {
                program,
                after: timeout,
            });
        }
        Err(source) => return Err(ProcessError::Io { program, source }),
    };

    let stdout = Zeroizing::new(stdout.join().unwrap_or_default());
    let stderr = String::from_utf8_lossy(&stderr.join().unwrap_or_default()).to_string();

    trace!(program = %program, status = %status, stdout_len = stdout.len(), "child exited");

    Ok(Captured {
        status,
        stdout,
        stderr,
    })
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> thread::JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_end(&mut buf);
        }
        buf
    })
}

fn wait_deadline(child: &mut Child, timeout: Duration) -> std::io::Result<Option<ExitStatus>> {
    let deadline = Instant::now() + timeout;
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if Instant::now() >= deadline {
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL);
    }
}
