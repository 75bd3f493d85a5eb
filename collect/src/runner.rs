//! External command execution with a deadline.
//!
//! Every hardware query goes through a [`CommandRunner`]. The real runner
//! ([`SystemRunner`]) spawns the program, drains stdout and stderr on
//! background threads, and kills the child when the deadline passes. The
//! canned runner ([`CannedRunner`]) replays captured outputs, which is how
//! offline parsing and the test suite drive the full inventory path.

use std::collections::HashMap;
use std::fmt;
use std::io::{ErrorKind, Read};
use std::process::{Command, Stdio};
use std::thread::JoinHandle;
use std::time::Duration;

use tracing::debug;
use wait_timeout::ChildExt;

use crate::error::{InventoryError, Result};

/// Default deadline for one external tool invocation.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// A program plus its argument list.
///
/// # Examples
///
/// ```
/// use hw_inventory_collect::runner::Invocation;
///
/// let inv = Invocation::new("./storcli").args(["show", "all", "J"]);
/// assert_eq!(inv.to_string(), "./storcli show all J");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
}

impl Invocation {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Executes an [`Invocation`] and returns its normalized standard output.
pub trait CommandRunner {
    fn run(&self, invocation: &Invocation) -> Result<String>;
}

/// Runs real subprocesses with a fixed deadline.
#[derive(Debug, Clone, Copy)]
pub struct SystemRunner {
    timeout: Duration,
}

impl SystemRunner {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Default for SystemRunner {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> Result<String> {
        run_command(invocation, self.timeout)
    }
}

/// Replays captured outputs keyed by exact invocation.
///
/// Invocations without a captured output fail with
/// [`InventoryError::Execution`], the same way a missing binary would.
#[derive(Debug, Clone, Default)]
pub struct CannedRunner {
    outputs: HashMap<Invocation, String>,
}

impl CannedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the output returned for `invocation`.
    pub fn respond(&mut self, invocation: Invocation, output: impl Into<String>) -> &mut Self {
        self.outputs.insert(invocation, output.into());
        self
    }

    pub fn with(mut self, invocation: Invocation, output: impl Into<String>) -> Self {
        self.respond(invocation, output);
        self
    }
}

impl CommandRunner for CannedRunner {
    fn run(&self, invocation: &Invocation) -> Result<String> {
        self.outputs
            .get(invocation)
            .map(|output| normalize_line_endings(output))
            .ok_or_else(|| InventoryError::Execution {
                program: invocation.program.clone(),
                message: format!("no captured output for '{invocation}'"),
            })
    }
}

/// Replaces every `\r\n` with `\n`.
pub fn normalize_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n")
}

/// Runs `invocation` to completion or until `timeout` elapses.
///
/// Returns standard output decoded as lossy UTF-8 with line endings
/// normalized. A non-zero exit status is an error carrying the trimmed
/// standard error text.
///
/// # Errors
///
/// - [`InventoryError::Execution`] when the program cannot be spawned, the
///   wait fails, or the program exits unsuccessfully.
/// - [`InventoryError::Timeout`] when the deadline passes; the child is
///   killed and reaped before returning.
pub fn run_command(invocation: &Invocation, timeout: Duration) -> Result<String> {
    let program = invocation.program.clone();
    debug!(command = %invocation, timeout_ms = timeout.as_millis() as u64, "Running command");

    let mut child = Command::new(&invocation.program)
        .args(&invocation.args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| {
            let reason = match e.kind() {
                ErrorKind::NotFound => "not found",
                ErrorKind::PermissionDenied => "permission denied",
                _ => "spawn failed",
            };
            InventoryError::Execution {
                program: program.clone(),
                message: format!("{reason}: {e}"),
            }
        })?;

    // Drain both pipes so a chatty child cannot block on a full buffer.
    let stdout_thread = child.stdout.take().map(drain_pipe);
    let stderr_thread = child.stderr.take().map(drain_pipe);

    let status = match child.wait_timeout(timeout) {
        Ok(Some(status)) => status,
        Ok(None) => {
            debug!(command = %invocation, "Command timed out, killing process");
            let _ = child.kill();
            let _ = child.wait();
            return Err(InventoryError::Timeout { program, timeout });
        }
        Err(e) => {
            let _ = child.kill();
            let _ = child.wait();
            return Err(InventoryError::Execution {
                program,
                message: format!("wait failed: {e}"),
            });
        }
    };

    let stdout = join_pipe(stdout_thread, &program, "stdout")?;
    let stderr = join_pipe(stderr_thread, &program, "stderr")?;

    if !status.success() {
        let stderr = String::from_utf8_lossy(&stderr);
        let detail = stderr.trim();
        let message = if detail.is_empty() {
            format!("exited with {status}")
        } else {
            format!("exited with {status}: {detail}")
        };
        return Err(InventoryError::Execution { program, message });
    }

    let output = normalize_line_endings(&String::from_utf8_lossy(&stdout));
    debug!(command = %invocation, length = output.len(), output = %output, "Command output");
    Ok(output)
}

type PipeResult = (Vec<u8>, std::io::Result<usize>);

fn drain_pipe<R: Read + Send + 'static>(mut pipe: R) -> JoinHandle<PipeResult> {
    std::thread::spawn(move || {
        let mut buf = Vec::new();
        let result = pipe.read_to_end(&mut buf);
        (buf, result)
    })
}

fn join_pipe(
    handle: Option<JoinHandle<PipeResult>>,
    program: &str,
    stream: &str,
) -> Result<Vec<u8>> {
    let Some(handle) = handle else {
        return Ok(Vec::new());
    };
    let (buf, result) = handle.join().map_err(|_| InventoryError::Execution {
        program: program.to_string(),
        message: format!("{stream} reader panicked"),
    })?;
    result.map_err(|e| InventoryError::Execution {
        program: program.to_string(),
        message: format!("{stream} read failed: {e}"),
    })?;
    Ok(buf)
}
