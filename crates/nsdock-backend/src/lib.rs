//! nsdock-backend: `Executor` implementations.
//!
//! - [`DockerBackend`]: long-lived container, commands via `docker exec`.
//! - [`HostBackend`]: direct host execution, no isolation.

mod capture;
pub mod docker;
pub mod host;
pub mod resolver;

pub use docker::{DockerBackend, DockerConfig, DEFAULT_IMAGE, WORKSPACE_MOUNT};
pub use host::HostBackend;
pub use resolver::resolve_docker_binary;
