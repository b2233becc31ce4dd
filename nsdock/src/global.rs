//! Process-wide default session.
//!
//! `init()` stores one [`Session`] for the whole process; the free-function
//! factories delegate to it. Calling a factory before `init()` fails with
//! `Error::UninitializedSession`; a second `init()` fails with
//! `Error::AlreadyInitialized`; build explicit `Session` values when more
//! than one context is needed.

use std::sync::OnceLock;

use nsdock_core::{ArgValue, CommandBuilder, Error, Result};

use crate::session::Session;

static SESSION: OnceLock<Session> = OnceLock::new();

/// Install the process-wide session. Rejected if already installed.
pub fn init(session: Session) -> Result<()> {
    SESSION
        .set(session)
        .map_err(|_| Error::AlreadyInitialized)
}

/// The installed session, if any.
pub fn session() -> Result<Session> {
    SESSION
        .get()
        .cloned()
        .ok_or(Error::UninitializedSession)
}

pub fn train(method: &str) -> Result<CommandBuilder> {
    Ok(session()?.train(method))
}

pub fn process_data(processor: &str, data: impl Into<ArgValue>) -> Result<CommandBuilder> {
    session()?.process_data(processor, data)
}

pub fn process_images(
    input_image_path: impl Into<ArgValue>,
    output_dir: &str,
) -> Result<CommandBuilder> {
    session()?.process_images(input_image_path, output_dir)
}

pub fn custom_command(raw: &str) -> Result<CommandBuilder> {
    session()?.custom_command(raw)
}
