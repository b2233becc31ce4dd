//! Execution context: output base plus backend handle.
//!
//! The context is an explicit value, not hidden process-wide state. A
//! `Session` is cheap to clone and every builder it hands out shares its
//! executor. The [`crate::global`] module layers the one-session convenience
//! on top for callers that want it.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use nsdock_backend::{DockerBackend, DockerConfig, HostBackend};
use nsdock_core::{CommandBuilder, Executor, Result};

#[derive(Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    output_base: PathBuf,
    executor: Arc<dyn Executor>,
}

impl Session {
    /// Build a session over an already-constructed executor.
    pub fn new(output_base: impl Into<PathBuf>, executor: Arc<dyn Executor>) -> Result<Self> {
        let output_base = output_base.into();
        std::fs::create_dir_all(&output_base)?;
        tracing::debug!(
            output_base = %output_base.display(),
            backend = executor.name(),
            "session created"
        );
        Ok(Self {
            inner: Arc::new(SessionInner {
                output_base,
                executor,
            }),
        })
    }

    /// Start a docker container and build a session over it. The container
    /// lives as long as the session's backend handle and is stopped when the
    /// last clone drops.
    pub fn docker(output_base: impl Into<PathBuf>, config: &DockerConfig) -> Result<Self> {
        let output_base = output_base.into();
        let backend = DockerBackend::start(&output_base, config)?;
        Self::new(output_base, Arc::new(backend))
    }

    /// Build a session that runs commands directly on the host. Intended for
    /// tests and docker-less development.
    pub fn host(output_base: impl Into<PathBuf>) -> Result<Self> {
        let output_base = output_base.into();
        let backend = HostBackend::new(&output_base)?;
        Self::new(output_base, Arc::new(backend))
    }

    pub fn output_base(&self) -> &Path {
        &self.inner.output_base
    }

    pub fn executor(&self) -> &Arc<dyn Executor> {
        &self.inner.executor
    }

    pub(crate) fn command(&self, program: Vec<String>) -> CommandBuilder {
        CommandBuilder::new(self.inner.executor.clone(), program)
    }
}
