//! Low-level child process execution with a deadline

use std::io::Read;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;
use wait_timeout::ChildExt;

/// Timeout for collecting output from child process pipes after exit
const OUTPUT_COLLECTION_TIMEOUT: Duration = Duration::from_secs(10);

/// Maximum captured output per stream (64MB)
const MAX_OUTPUT_SIZE: usize = 64 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` when killed by a signal or on timeout
    pub exit_code: Option<i32>,
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
    pub timed_out: bool,
}

/// Run `command` with stdin closed, capturing stdout/stderr, and kill it if
/// it outlives `timeout`.
pub fn run_with_timeout(
    mut command: Command,
    timeout: Duration,
) -> std::io::Result<CommandOutput> {
    command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    let mut child = command.spawn()?;

    // Drain pipes while waiting: a child writing more than the pipe buffer
    // would otherwise block forever.
    let stdout_rx = spawn_reader(child.stdout.take());
    let stderr_rx = spawn_reader(child.stderr.take());

    let wait_result = wait_or_kill(&mut child, timeout)?;

    let stdout = stdout_rx
        .recv_timeout(OUTPUT_COLLECTION_TIMEOUT)
        .unwrap_or_default();
    let stderr = stderr_rx
        .recv_timeout(OUTPUT_COLLECTION_TIMEOUT)
        .unwrap_or_default();

    Ok(match wait_result {
        Some(status) => CommandOutput {
            exit_code: status.code(),
            success: status.success(),
            stdout,
            stderr,
            timed_out: false,
        },
        None => CommandOutput {
            exit_code: None,
            success: false,
            stdout,
            stderr,
            timed_out: true,
        },
    })
}

fn spawn_reader<R: Read + Send + 'static>(stream: Option<R>) -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel();
    match stream {
        Some(stream) => {
            thread::spawn(move || {
                let _ = tx.send(read_stream_to_string(stream));
            });
        }
        None => {
            let _ = tx.send(String::new());
        }
    }
    rx
}

/// Read a stream to string, keeping at most MAX_OUTPUT_SIZE bytes and
/// draining the rest so the writer never sees a broken pipe.
fn read_stream_to_string<R: Read>(mut stream: R) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 8192];

    loop {
        match stream.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => {
                let remaining = MAX_OUTPUT_SIZE.saturating_sub(buf.len());
                let to_copy = n.min(remaining);
                buf.extend_from_slice(&chunk[..to_copy]);
                if to_copy < n {
                    let mut discard = [0u8; 8192];
                    while stream.read(&mut discard).unwrap_or(0) > 0 {}
                    tracing::warn!("Command output truncated at {MAX_OUTPUT_SIZE} bytes");
                    break;
                }
            }
            Err(_) => break,
        }
    }

    String::from_utf8_lossy(&buf).into_owned()
}

/// Wait up to `timeout`. The child is killed and reaped before returning
/// on timeout and on a failed wait, so no process outlives the call.
fn wait_or_kill(child: &mut Child, timeout: Duration) -> std::io::Result<Option<ExitStatus>> {
    match child.wait_timeout(timeout) {
        Ok(Some(status)) => Ok(Some(status)),
        Ok(None) => {
            kill_child_process(child);
            Ok(None)
        }
        Err(e) => {
            tracing::warn!(pid = child.id(), error = %e, "Waiting on child failed, killing it");
            kill_child_process(child);
            Err(e)
        }
    }
}

fn kill_child_process(child: &mut Child) {
    // The process may already be gone
    let _ = child.kill();
    let _ = child.wait();
}
