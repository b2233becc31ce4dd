//! Docker execution backend.
//!
//! One long-lived container per backend instance: `start` launches it
//! detached with `sleep infinity`, mounting the session's output base at
//! `/workspace`, and every command is serviced through `docker exec` with
//! `/workspace` as working directory. Dropping the backend stops the
//! container (`--rm` removes it). Image provisioning is delegated to
//! `docker run`; pulling, building and Dockerfile variants are not this
//! crate's business.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use nsdock_core::{Error, ExecutionResult, Executor, MountSpec, Result};

use crate::capture::run_and_capture;
use crate::resolver::resolve_docker_binary;

/// Upstream nerfstudio image used when the caller does not pick one.
pub const DEFAULT_IMAGE: &str = "ghcr.io/nerfstudio-project/nerfstudio:latest";

/// Path the output base is mounted at inside the container.
pub const WORKSPACE_MOUNT: &str = "/workspace";

/// Container launch options.
#[derive(Debug, Clone)]
pub struct DockerConfig {
    pub image: String,
    /// Explicit docker binary; `None` resolves from PATH.
    pub docker_bin: Option<String>,
    /// Shared memory size for the container; nerfstudio's dataloaders need
    /// more than docker's 64MB default.
    pub shm_size: String,
    /// Request GPU passthrough (`--gpus all`).
    pub gpus: bool,
    /// Host port published for the web viewer, if any.
    pub viewer_port: Option<u16>,
}

impl Default for DockerConfig {
    fn default() -> Self {
        Self {
            image: DEFAULT_IMAGE.to_string(),
            docker_bin: None,
            shm_size: "12gb".to_string(),
            gpus: true,
            viewer_port: Some(7007),
        }
    }
}

pub struct DockerBackend {
    docker: PathBuf,
    container_id: String,
    mount: MountSpec,
}

impl DockerBackend {
    /// Start the container with `output_base` mounted at `/workspace`.
    pub fn start(output_base: &Path, config: &DockerConfig) -> Result<Self> {
        let docker = resolve_docker_binary(config.docker_bin.as_deref())?;

        fs::create_dir_all(output_base)?;
        let host_root = fs::canonicalize(output_base)?;

        let mut cmd = Command::new(&docker);
        cmd.args(["run", "-d", "--rm"])
            .arg("-v")
            .arg(format!("{}:{}", host_root.display(), WORKSPACE_MOUNT))
            .args(["-w", WORKSPACE_MOUNT])
            .arg("--shm-size")
            .arg(&config.shm_size)
            .args(["-e", "XDG_DATA_HOME=/workspace/.local/share"])
            .args(["-e", "TORCH_HOME=/workspace/.cache/torch"]);

        if config.gpus {
            cmd.args(["--gpus", "all"]);
        }
        if let Some(port) = config.viewer_port {
            cmd.arg("-p").arg(format!("{port}:{port}"));
        }
        #[cfg(unix)]
        {
            // Files written into the mount should belong to the invoking user,
            // not root.
            let uid = unsafe { libc::getuid() };
            let gid = unsafe { libc::getgid() };
            cmd.arg("--user").arg(format!("{uid}:{gid}"));
        }

        cmd.arg(&config.image).args(["sleep", "infinity"]);

        let output = cmd.output()?;
        if !output.status.success() {
            return Err(Error::Backend(format!(
                "failed to start container from image `{}`: {}",
                config.image,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        let container_id = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if container_id.is_empty() {
            return Err(Error::Backend(
                "docker run reported success but no container id".to_string(),
            ));
        }

        tracing::info!(
            container = short_id(&container_id),
            image = %config.image,
            mount = %host_root.display(),
            "container started"
        );

        Ok(Self {
            docker,
            container_id,
            mount: MountSpec {
                host_root,
                sandbox_root: WORKSPACE_MOUNT.to_string(),
            },
        })
    }

    pub fn container_id(&self) -> &str {
        &self.container_id
    }

    /// Stop the container. Idempotent; also invoked on drop.
    pub fn stop(&mut self) {
        if self.container_id.is_empty() {
            return;
        }
        tracing::info!(container = short_id(&self.container_id), "stopping container");
        let result = Command::new(&self.docker)
            .args(["stop", &self.container_id])
            .output();
        match result {
            Ok(output) if output.status.success() => {}
            Ok(output) => tracing::warn!(
                container = short_id(&self.container_id),
                stderr = %String::from_utf8_lossy(&output.stderr).trim(),
                "docker stop failed"
            ),
            Err(e) => tracing::warn!(error = %e, "could not invoke docker stop"),
        }
        self.container_id.clear();
    }
}

impl Executor for DockerBackend {
    fn name(&self) -> &str {
        "docker"
    }

    fn mount(&self) -> &MountSpec {
        &self.mount
    }

    fn exec(&self, argv: &[String]) -> Result<ExecutionResult> {
        if self.container_id.is_empty() {
            return Err(Error::Backend("container is not running".to_string()));
        }
        let mut cmd = Command::new(&self.docker);
        cmd.args(["exec", "-w", WORKSPACE_MOUNT, &self.container_id])
            .args(argv);
        run_and_capture(&mut cmd)
    }
}

impl Drop for DockerBackend {
    fn drop(&mut self) {
        self.stop();
    }
}

fn short_id(id: &str) -> &str {
    &id[..id.len().min(12)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DockerConfig::default();
        assert_eq!(config.image, DEFAULT_IMAGE);
        assert_eq!(config.shm_size, "12gb");
        assert!(config.gpus);
        assert_eq!(config.viewer_port, Some(7007));
    }

    #[test]
    fn test_short_id_handles_short_input() {
        assert_eq!(short_id("abc"), "abc");
        assert_eq!(short_id("0123456789abcdef"), "0123456789ab");
    }
}
