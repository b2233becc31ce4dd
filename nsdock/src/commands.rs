//! Command factories: one per nerfstudio entry point, plus a raw escape
//! hatch.
//!
//! Each factory pre-seeds a [`CommandBuilder`]; everything else is chained on
//! by the caller. Plain-string paths are forwarded untouched and interpreted
//! relative to the workspace root inside the sandbox; wrap a value with
//! [`nsdock_core::path`] to have it copied into the mount first.

use nsdock_core::{ArgValue, CommandBuilder, Result};

use crate::session::Session;

impl Session {
    /// `ns-train <method>`. Run blocks until training finishes; pair with
    /// `viewer.quit_on_train_completion` for unattended runs.
    pub fn train(&self, method: &str) -> CommandBuilder {
        self.command(vec!["ns-train".to_string()])
            .add_positional_arg(method)
    }

    /// `ns-process-data <processor> --data <data>`.
    pub fn process_data(
        &self,
        processor: &str,
        data: impl Into<ArgValue>,
    ) -> Result<CommandBuilder> {
        self.command(vec!["ns-process-data".to_string(), processor.to_string()])
            .set("data", data)
    }

    /// `ns-process-data images --data <input> --output-dir <output_dir>`.
    pub fn process_images(
        &self,
        input_image_path: impl Into<ArgValue>,
        output_dir: &str,
    ) -> Result<CommandBuilder> {
        self.process_data("images", input_image_path)?
            .set("output_dir", output_dir)
    }

    /// An arbitrary command line, shell-split. For tools the typed factories
    /// do not cover (`ns-export`, `ns-render`, plain shell utilities).
    pub fn custom_command(&self, raw: &str) -> Result<CommandBuilder> {
        CommandBuilder::from_raw(self.executor().clone(), raw)
    }
}
