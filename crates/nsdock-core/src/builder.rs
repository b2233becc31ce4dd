//! Chainable command construction and execution.
//!
//! A `CommandBuilder` accumulates program tokens, positional arguments and
//! dotted flags, then `run()` stages every `PathRef`, renders the argument
//! vector and hands it to the session's executor. Chaining is by value:
//! every call consumes the builder and returns it (or an error), and `run()`
//! consumes it for good, so running the same builder twice is a compile error,
//! not a runtime policy.
//!
//! Rendering rules:
//! - tokens are emitted as `[program..., positionals..., flags...]`,
//!   positionals in call order, flags in first-insertion order;
//! - re-setting a key overwrites the value in place, never duplicates;
//! - `true` renders as a bare `--flag`, `false` is omitted entirely;
//! - a `PathRef` value renders as its staged sandbox path.

use std::sync::Arc;

use crate::dotpath::DotPath;
use crate::error::{Error, Result};
use crate::executor::{ExecutionResult, Executor};
use crate::staging::StagingArea;
use crate::value::ArgValue;

/// How many trailing bytes of stderr an execution error carries.
const STDERR_TAIL_BYTES: usize = 2048;

pub struct CommandBuilder {
    program: Vec<String>,
    positionals: Vec<ArgValue>,
    flags: Vec<(DotPath, ArgValue)>,
    executor: Arc<dyn Executor>,
}

impl std::fmt::Debug for CommandBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandBuilder")
            .field("program", &self.program)
            .field("positionals", &self.positionals)
            .field("flags", &self.flags)
            .field("executor", &self.executor.name())
            .finish()
    }
}

impl CommandBuilder {
    /// Build from pre-split program tokens, e.g. `["ns-process-data", "images"]`.
    pub fn new(executor: Arc<dyn Executor>, program: Vec<String>) -> Self {
        Self {
            program,
            positionals: Vec::new(),
            flags: Vec::new(),
            executor,
        }
    }

    /// Build from a raw command line, shell-split. Used by `custom_command`.
    pub fn from_raw(executor: Arc<dyn Executor>, raw: &str) -> Result<Self> {
        let program = shell_words::split(raw)
            .map_err(|e| Error::InvalidArgument(format!("cannot parse command `{raw}`: {e}")))?;
        if program.is_empty() {
            return Err(Error::InvalidArgument("empty command".to_string()));
        }
        Ok(Self::new(executor, program))
    }

    /// Set a flag by dotted key: `set("viewer.websocket_port", 7007)` renders
    /// as `--viewer.websocket-port 7007`. Booleans render as flag presence
    /// (`true` → bare flag, `false` → omitted); `PathRef` values are staged
    /// at `run()` and render as their in-sandbox path.
    pub fn set(self, key: &str, value: impl Into<ArgValue>) -> Result<Self> {
        let path = DotPath::parse(key)?;
        self.insert(path, value.into())
    }

    /// Like `set`, but underscores in the key are kept as-is.
    pub fn set_verbatim(self, key: &str, value: impl Into<ArgValue>) -> Result<Self> {
        let path = DotPath::parse_verbatim(key)?;
        self.insert(path, value.into())
    }

    /// Enter a flag namespace: `ns("viewer").set("quit_on_train_completion", true)`
    /// sets `viewer.quit_on_train_completion` and hands the root builder back.
    /// Namespaces compose to arbitrary depth. The joined key is validated at
    /// the terminal `set`.
    pub fn ns(self, prefix: &str) -> Namespace {
        Namespace {
            root: self,
            prefix: prefix.to_string(),
        }
    }

    /// Append a positional argument. Positionals render immediately after the
    /// program tokens, before all flags, in call order. A `PathRef` positional
    /// is staged like a flag value; booleans are rejected at render time.
    pub fn add_positional_arg(mut self, value: impl Into<ArgValue>) -> Self {
        self.positionals.push(value.into());
        self
    }

    fn insert(mut self, path: DotPath, value: ArgValue) -> Result<Self> {
        for (existing, _) in &self.flags {
            if existing.cli_name() != path.cli_name()
                && (existing.is_segment_prefix_of(&path) || path.is_segment_prefix_of(existing))
            {
                return Err(Error::InvalidArgument(format!(
                    "flag `{}` collides with existing flag `{}`: a key may not be both a flag and a namespace prefix",
                    path.key(),
                    existing.key()
                )));
            }
        }
        if let Some(slot) = self
            .flags
            .iter_mut()
            .find(|(existing, _)| existing.cli_name() == path.cli_name())
        {
            slot.1 = value;
        } else {
            self.flags.push((path, value));
        }
        Ok(self)
    }

    /// Stage path references, render the argument vector and execute it,
    /// blocking until the external process exits.
    ///
    /// A non-zero exit code surfaces as `Error::Execution` carrying the exit
    /// code, the rendered command line and the tail of stderr. There is no
    /// retry and no timeout: the command runs to completion or failure.
    pub fn run(self) -> Result<ExecutionResult> {
        let mount = self.executor.mount().clone();
        let staging = StagingArea::new(&mount);
        let argv = self.render(&staging)?;
        let command_line = argv.join(" ");

        tracing::info!(
            backend = self.executor.name(),
            command = %command_line,
            "executing command"
        );
        let result = self.executor.exec(&argv)?;
        tracing::info!(exit_code = result.exit_code, "command finished");

        if !result.success() {
            return Err(Error::Execution {
                command_line,
                exit_code: result.exit_code,
                stderr_tail: tail(&result.stderr),
            });
        }
        Ok(result)
    }

    fn render(&self, staging: &StagingArea<'_>) -> Result<Vec<String>> {
        let mut argv = self.program.clone();

        for value in &self.positionals {
            match value {
                ArgValue::Path(reference) => argv.push(staging.stage(reference)?),
                ArgValue::Bool(_) => {
                    return Err(Error::InvalidArgument(
                        "boolean values cannot be positional arguments".to_string(),
                    ))
                }
                other => {
                    // scalar_token is Some for everything but Bool and Path
                    if let Some(token) = other.scalar_token() {
                        argv.push(token);
                    }
                }
            }
        }

        for (path, value) in &self.flags {
            match value {
                ArgValue::Bool(true) => argv.push(path.flag_token()),
                ArgValue::Bool(false) => {}
                ArgValue::Path(reference) => {
                    argv.push(path.flag_token());
                    argv.push(staging.stage(reference)?);
                }
                other => {
                    if let Some(token) = other.scalar_token() {
                        argv.push(path.flag_token());
                        argv.push(token);
                    }
                }
            }
        }

        Ok(argv)
    }
}

/// A namespace view over the root builder, produced by `CommandBuilder::ns`.
///
/// The terminal `set` returns the root builder so chaining continues at the
/// top level.
pub struct Namespace {
    root: CommandBuilder,
    prefix: String,
}

impl Namespace {
    /// Extend the namespace by one segment.
    pub fn ns(mut self, segment: &str) -> Namespace {
        self.prefix = format!("{}.{}", self.prefix, segment);
        self
    }

    /// Set `<prefix>.<name>` on the root builder and return it.
    pub fn set(self, name: &str, value: impl Into<ArgValue>) -> Result<CommandBuilder> {
        let key = format!("{}.{}", self.prefix, name);
        self.root.set(&key, value)
    }

    /// Like `set`, keeping underscores in the joined key.
    pub fn set_verbatim(self, name: &str, value: impl Into<ArgValue>) -> Result<CommandBuilder> {
        let key = format!("{}.{}", self.prefix, name);
        self.root.set_verbatim(&key, value)
    }
}

fn tail(stderr: &str) -> String {
    if stderr.len() <= STDERR_TAIL_BYTES {
        return stderr.to_string();
    }
    let start = stderr.len() - STDERR_TAIL_BYTES;
    // keep it valid UTF-8
    let start = (start..stderr.len())
        .find(|i| stderr.is_char_boundary(*i))
        .unwrap_or(stderr.len());
    stderr[start..].to_string()
}
