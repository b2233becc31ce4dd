//! nsdock: drive the nerfstudio CLI inside a container from Rust.
//!
//! The crate wraps an external, pre-built CLI running in an isolated
//! execution environment: commands are assembled with a chainable builder,
//! local paths are staged into the shared mount, and execution is delegated
//! to a pluggable backend (docker exec, or the host for development).
//!
//! ```no_run
//! use nsdock::{path, DockerConfig, Session};
//!
//! # fn main() -> nsdock::Result<()> {
//! let session = Session::docker("./nerfstudio_output", &DockerConfig::default())?;
//!
//! session
//!     .process_images(path("./raw_images"), "processed_data")?
//!     .set("matching_method", "exhaustive")?
//!     .run()?;
//!
//! session
//!     .train("splatfacto")
//!     .set("data", "processed_data")?
//!     .ns("viewer")
//!     .set("quit_on_train_completion", true)?
//!     .run()?;
//! # Ok(())
//! # }
//! ```

pub mod cli;
mod commands;
pub mod config;
pub mod global;
pub mod observability;
mod session;

pub use nsdock_backend::{DockerBackend, DockerConfig, HostBackend, DEFAULT_IMAGE};
pub use nsdock_core::{
    path, ArgValue, CommandBuilder, DotPath, Error, ExecutionResult, Executor, MountSpec,
    Namespace, PathRef, Result,
};
pub use session::Session;
