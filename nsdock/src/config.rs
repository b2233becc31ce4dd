//! Environment-driven configuration.
//!
//! Every knob has an `NSDOCK_*` env key; CLI flags override env, env
//! overrides defaults.

use nsdock_backend::DockerConfig;

pub mod env_keys {
    pub const IMAGE: &str = "NSDOCK_IMAGE";
    pub const DOCKER_BIN: &str = "NSDOCK_DOCKER_BIN";
    pub const SHM_SIZE: &str = "NSDOCK_SHM_SIZE";
    pub const GPUS: &str = "NSDOCK_GPUS";
    pub const VIEWER_PORT: &str = "NSDOCK_VIEWER_PORT";
    pub const LOG_LEVEL: &str = "NSDOCK_LOG_LEVEL";
    pub const QUIET: &str = "NSDOCK_QUIET";
    pub const LOG_JSON: &str = "NSDOCK_LOG_JSON";
}

pub(crate) fn env_optional(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

pub(crate) fn env_or(key: &str, default: impl FnOnce() -> String) -> String {
    env_optional(key).unwrap_or_else(default)
}

pub(crate) fn env_bool(key: &str, default: bool) -> bool {
    match env_optional(key) {
        Some(v) => matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes"),
        None => default,
    }
}

/// Docker launch options from the environment. `NSDOCK_VIEWER_PORT=0`
/// disables the viewer port publish.
pub fn docker_config_from_env() -> DockerConfig {
    let defaults = DockerConfig::default();
    let viewer_port = match env_optional(env_keys::VIEWER_PORT) {
        Some(v) => v.trim().parse::<u16>().ok().filter(|p| *p != 0),
        None => defaults.viewer_port,
    };
    DockerConfig {
        image: env_or(env_keys::IMAGE, || defaults.image.clone()),
        docker_bin: env_optional(env_keys::DOCKER_BIN),
        shm_size: env_or(env_keys::SHM_SIZE, || defaults.shm_size.clone()),
        gpus: env_bool(env_keys::GPUS, defaults.gpus),
        viewer_port,
    }
}

/// Logging knobs, read at tracing init.
#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    pub quiet: bool,
    pub log_level: String,
    pub log_json: bool,
}

impl ObservabilityConfig {
    pub fn from_env() -> Self {
        Self {
            quiet: env_bool(env_keys::QUIET, false),
            log_level: env_or(env_keys::LOG_LEVEL, || "info".to_string()),
            log_json: env_bool(env_keys::LOG_JSON, false),
        }
    }
}
