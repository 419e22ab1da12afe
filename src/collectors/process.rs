//! Subprocess execution bounded by a hard timeout.

use std::io::Read;
use std::process::{Command, Stdio};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crate::error::{Result, StatuslineError};

const POLL_INTERVAL: Duration = Duration::from_millis(2);

/// Run `command` and return its stdout, killing it if it outlives `timeout`.
///
/// Stdout is drained on a helper thread so a chatty child cannot fill the pipe
/// and stall while we wait on it.
pub fn output_with_timeout(mut command: Command, timeout: Duration) -> Result<String> {
    let label = describe(&command);
    let mut child = command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()?;

    // The reader only finishes once every holder of the pipe is gone, which
    // may be a grandchild that outlives the child.
    let (tx, rx) = mpsc::channel();
    if let Some(mut stdout) = child.stdout.take() {
        thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = stdout.read_to_end(&mut buf);
            let _ = tx.send(buf);
        });
    } else {
        let _ = tx.send(Vec::new());
    }

    let start = Instant::now();
    let status = loop {
        if let Some(status) = child.try_wait()? {
            break status;
        }
        if start.elapsed() >= timeout {
            let _ = child.kill();
            let _ = child.wait();
            tracing::debug!(command = %label, ?timeout, "command timed out");
            return Err(StatuslineError::Timeout {
                command: label,
                timeout_ms: timeout.as_millis(),
            });
        }
        thread::sleep(POLL_INTERVAL);
    };

    let stdout = match rx.recv_timeout(timeout.saturating_sub(start.elapsed())) {
        Ok(buf) => buf,
        Err(mpsc::RecvTimeoutError::Timeout) => {
            tracing::debug!(command = %label, ?timeout, "stdout still open after exit");
            return Err(StatuslineError::Timeout {
                command: label,
                timeout_ms: timeout.as_millis(),
            });
        }
        Err(mpsc::RecvTimeoutError::Disconnected) => Vec::new(),
    };

    if !status.success() {
        return Err(StatuslineError::CommandFailed {
            command: label,
            status: status.to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&stdout).into_owned())
}

fn describe(command: &Command) -> String {
    std::iter::once(command.get_program())
        .chain(command.get_args())
        .map(|part| part.to_string_lossy())
        .collect::<Vec<_>>()
        .join(" ")
}
