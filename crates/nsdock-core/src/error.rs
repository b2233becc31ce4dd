//! Error taxonomy for command construction, staging and execution.
//!
//! Every error surfaces synchronously at the call that triggered it:
//! argument-shape errors at the chaining call, staging and execution errors
//! at `run()`. Nothing is swallowed or retried internally, and execution
//! errors carry the rendered command line so a failure can be reproduced
//! outside the wrapper.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// A default-session factory was called before `global::init()`.
    #[error("session not initialized: call init() before building commands")]
    UninitializedSession,

    /// `global::init()` was called a second time. Re-initialization is
    /// rejected; build explicit `Session` values when more than one
    /// execution context is needed.
    #[error("session already initialized")]
    AlreadyInitialized,

    /// Malformed or conflicting flag key / value usage.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A local path referenced by a `PathRef` could not be copied into the
    /// shared mount.
    #[error("staging failed for {}: {source}", .path.display())]
    Staging {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The external tool exited non-zero.
    #[error("command `{command_line}` exited with code {exit_code}")]
    Execution {
        command_line: String,
        exit_code: i32,
        stderr_tail: String,
    },

    /// The execution backend itself failed (container not running, docker
    /// binary missing, ...).
    #[error("backend error: {0}")]
    Backend(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
