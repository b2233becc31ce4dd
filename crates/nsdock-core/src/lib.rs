//! nsdock-core: command construction and staging for CLI tools running in an
//! isolated execution environment.
//!
//! The pieces: [`CommandBuilder`] accumulates program tokens, positionals and
//! dotted flags; [`PathRef`] marks argument values that are local paths and
//! must be staged into the shared mount before execution; the [`Executor`]
//! trait is the seam to the execution environment (implementations live in
//! `nsdock-backend`).

pub mod builder;
pub mod dotpath;
pub mod error;
pub mod executor;
pub mod staging;
pub mod value;

pub use builder::{CommandBuilder, Namespace};
pub use dotpath::DotPath;
pub use error::{Error, Result};
pub use executor::{ExecutionResult, Executor, MountSpec};
pub use staging::{StagingArea, STAGED_DIR};
pub use value::{path, ArgValue, PathRef};
