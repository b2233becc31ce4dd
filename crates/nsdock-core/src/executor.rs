//! Executor trait: extension point for execution backends.
//!
//! Implement this trait to add new execution environments. The shipped
//! backends live in `nsdock-backend`: a docker-exec backend and a direct
//! host-process backend. Selection happens once, when the session is built.

use std::path::PathBuf;

use serde::Serialize;

use crate::error::Result;

/// Captured outcome of one external command.
#[derive(Debug, Clone, Serialize)]
pub struct ExecutionResult {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl ExecutionResult {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Mapping between a host directory and the path it is visible at inside the
/// execution environment. For the host backend both sides are the same
/// directory.
#[derive(Debug, Clone)]
pub struct MountSpec {
    pub host_root: PathBuf,
    pub sandbox_root: String,
}

impl MountSpec {
    /// Join a relative path onto the sandbox side of the mount.
    pub fn sandbox_join(&self, relative: &str) -> String {
        format!(
            "{}/{}",
            self.sandbox_root.trim_end_matches('/'),
            relative.trim_start_matches('/')
        )
    }
}

/// Extension point for execution backends.
///
/// `exec` blocks until the external process exits and reports the outcome:
/// a non-zero exit code is a result, not an `Err`; the builder turns it into
/// an execution error together with the rendered command line.
pub trait Executor: Send + Sync {
    /// Backend name for logging and diagnostics.
    fn name(&self) -> &str;

    /// The shared mount this backend exposes to commands.
    fn mount(&self) -> &MountSpec;

    /// Run the rendered argument vector with the mount root as working
    /// directory, blocking until exit.
    fn exec(&self, argv: &[String]) -> Result<ExecutionResult>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sandbox_join_normalizes_slashes() {
        let mount = MountSpec {
            host_root: PathBuf::from("/data/out"),
            sandbox_root: "/workspace/".to_string(),
        };
        assert_eq!(mount.sandbox_join(".staged/x"), "/workspace/.staged/x");
        assert_eq!(mount.sandbox_join("/.staged/x"), "/workspace/.staged/x");
    }
}
