//! Child process capture.
//!
//! Reads stdout/stderr in background threads while the process runs; without
//! this a child writing more than the pipe buffer (~64KB) would block on
//! write and deadlock us. Stderr is forwarded to the parent's stderr as it
//! arrives so long-running commands (training epochs, COLMAP matching) show
//! progress. There is no timeout: commands run to completion or failure.

use std::io::Read;
use std::process::{Command, Stdio};
use std::thread;

use nsdock_core::{Error, ExecutionResult, Result};

pub(crate) fn run_and_capture(cmd: &mut Command) -> Result<ExecutionResult> {
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let mut child = cmd
        .spawn()
        .map_err(|e| Error::Backend(format!("failed to spawn {:?}: {e}", cmd.get_program())))?;

    let stdout_handle = child.stdout.take().map(|mut out| {
        thread::spawn(move || {
            let mut s = String::new();
            let _ = out.read_to_string(&mut s);
            s
        })
    });
    let stderr_handle = child.stderr.take().map(|mut err| {
        thread::spawn(move || {
            use std::io::Write;
            let mut s = String::new();
            let mut buf = [0u8; 4096];
            loop {
                match err.read(&mut buf) {
                    Ok(0) => break,
                    Ok(n) => {
                        s.push_str(&String::from_utf8_lossy(&buf[..n]));
                        let _ = std::io::stderr().write_all(&buf[..n]);
                        let _ = std::io::stderr().flush();
                    }
                    Err(_) => break,
                }
            }
            s
        })
    });

    let status = child.wait()?;
    let stdout = stdout_handle
        .map(|h| h.join().unwrap_or_default())
        .unwrap_or_default();
    let stderr = stderr_handle
        .map(|h| h.join().unwrap_or_default())
        .unwrap_or_default();

    Ok(ExecutionResult {
        exit_code: status.code().unwrap_or(-1),
        stdout,
        stderr,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(unix)]
    fn test_captures_both_streams_and_exit_code() {
        let mut cmd = Command::new("sh");
        cmd.args(["-c", "echo out; echo err >&2; exit 3"]);
        let result = run_and_capture(&mut cmd).unwrap();
        assert_eq!(result.exit_code, 3);
        assert_eq!(result.stdout.trim(), "out");
        assert!(result.stderr.contains("err"));
    }

    #[test]
    fn test_missing_program_is_backend_error() {
        let mut cmd = Command::new("nsdock-definitely-not-a-program");
        assert!(matches!(
            run_and_capture(&mut cmd),
            Err(Error::Backend(_))
        ));
    }
}
