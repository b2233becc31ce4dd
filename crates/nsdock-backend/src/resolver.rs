//! Docker binary resolution.

use std::path::PathBuf;

use nsdock_core::{Error, Result};

/// Resolve the docker binary: an explicit override wins, otherwise PATH
/// lookup. The override is taken on trust so wrappers like podman's docker
/// shim can be pointed at directly.
pub fn resolve_docker_binary(override_bin: Option<&str>) -> Result<PathBuf> {
    if let Some(bin) = override_bin {
        return Ok(PathBuf::from(bin));
    }
    which::which("docker").map_err(|_| {
        Error::Backend(
            "docker binary not found on PATH (set NSDOCK_DOCKER_BIN or pass docker_bin)"
                .to_string(),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_wins_without_lookup() {
        let bin = resolve_docker_binary(Some("/opt/podman/docker")).unwrap();
        assert_eq!(bin, PathBuf::from("/opt/podman/docker"));
    }
}
