//! Host execution backend: runs commands directly, no isolation.
//!
//! The mount is the output base itself, so staged paths render as host paths.
//! Useful for tests and for docker-less development against a local
//! nerfstudio install.

use std::fs;
use std::path::Path;
use std::process::Command;

use nsdock_core::{Error, ExecutionResult, Executor, MountSpec, Result};

use crate::capture::run_and_capture;

pub struct HostBackend {
    mount: MountSpec,
}

impl HostBackend {
    pub fn new(output_base: &Path) -> Result<Self> {
        fs::create_dir_all(output_base)?;
        let host_root = fs::canonicalize(output_base)?;
        let sandbox_root = host_root.to_string_lossy().to_string();
        Ok(Self {
            mount: MountSpec {
                host_root,
                sandbox_root,
            },
        })
    }
}

impl Executor for HostBackend {
    fn name(&self) -> &str {
        "host"
    }

    fn mount(&self) -> &MountSpec {
        &self.mount
    }

    fn exec(&self, argv: &[String]) -> Result<ExecutionResult> {
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| Error::InvalidArgument("empty argument vector".to_string()))?;
        let mut cmd = Command::new(program);
        cmd.args(args).current_dir(&self.mount.host_root);
        run_and_capture(&mut cmd)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(unix)]
    fn test_runs_in_output_base() {
        let out = tempfile::tempdir().unwrap();
        let backend = HostBackend::new(out.path()).unwrap();
        let result = backend.exec(&["pwd".to_string()]).unwrap();
        assert_eq!(result.exit_code, 0);
        assert_eq!(
            result.stdout.trim(),
            backend.mount().host_root.to_string_lossy()
        );
    }

    #[test]
    fn test_empty_argv_rejected() {
        let out = tempfile::tempdir().unwrap();
        let backend = HostBackend::new(out.path()).unwrap();
        assert!(matches!(
            backend.exec(&[]),
            Err(Error::InvalidArgument(_))
        ));
    }
}
