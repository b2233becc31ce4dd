use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use nsdock_core::{path, ArgValue, CommandBuilder, Result};

/// Drive the nerfstudio CLI inside a container
#[derive(Parser, Debug)]
#[command(name = "nsdock")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Local directory mounted as the sandbox working root
    #[arg(long, env = "NSDOCK_OUTPUT_BASE", default_value = "./nerfstudio_output")]
    pub output_base: PathBuf,

    /// Execution backend
    #[arg(long, value_enum, default_value_t = BackendKind::Docker)]
    pub backend: BackendKind,

    /// Container image (docker backend)
    #[arg(long, env = "NSDOCK_IMAGE")]
    pub image: Option<String>,

    /// Disable GPU passthrough (docker backend)
    #[arg(long)]
    pub no_gpu: bool,

    /// Print the execution result as JSON
    #[arg(long)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum BackendKind {
    Docker,
    Host,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run `ns-process-data images` on a local image directory
    ProcessImages {
        /// Local directory of raw images (copied into the mount)
        #[arg(long, value_name = "DIR")]
        input: PathBuf,

        /// Output directory, relative to the workspace root
        #[arg(long, default_value = "processed_data")]
        output_dir: String,

        /// Extra flags as KEY=VALUE (dotted keys allowed; prefix a value
        /// with @ to copy a local path into the mount)
        #[arg(long = "set", value_name = "KEY=VALUE")]
        set: Vec<String>,
    },

    /// Run `ns-process-data` with an arbitrary processor
    ProcessData {
        /// Processor name (images, video, polycam, ...)
        #[arg(value_name = "PROCESSOR")]
        processor: String,

        /// Data path: workspace-relative, or @-prefixed to copy a local path
        #[arg(long, value_name = "PATH")]
        data: String,

        /// Extra flags as KEY=VALUE
        #[arg(long = "set", value_name = "KEY=VALUE")]
        set: Vec<String>,
    },

    /// Run `ns-train`
    Train {
        /// Training method (splatfacto, nerfacto, ...)
        #[arg(value_name = "METHOD")]
        method: String,

        /// Data path: workspace-relative, or @-prefixed to copy a local path
        #[arg(long, value_name = "PATH")]
        data: Option<String>,

        /// Extra flags as KEY=VALUE
        #[arg(long = "set", value_name = "KEY=VALUE")]
        set: Vec<String>,
    },

    /// Run an arbitrary command line in the execution environment
    Exec {
        /// The command line, shell-split
        #[arg(value_name = "COMMAND")]
        command: String,

        /// Extra flags as KEY=VALUE
        #[arg(long = "set", value_name = "KEY=VALUE")]
        set: Vec<String>,
    },
}

/// Sniff a `--set` value: `@p` wraps a local path (`@@` escapes a literal
/// leading @), `true`/`false` become booleans, then integers, then floats,
/// then plain strings.
pub fn parse_set_value(raw: &str) -> ArgValue {
    if let Some(rest) = raw.strip_prefix("@@") {
        return ArgValue::Str(format!("@{rest}"));
    }
    if let Some(local) = raw.strip_prefix('@') {
        return ArgValue::Path(path(local));
    }
    match raw {
        "true" => return ArgValue::Bool(true),
        "false" => return ArgValue::Bool(false),
        _ => {}
    }
    if let Ok(v) = raw.parse::<i64>() {
        return ArgValue::Int(v);
    }
    if let Ok(v) = raw.parse::<f64>() {
        return ArgValue::Float(v);
    }
    ArgValue::Str(raw.to_string())
}

/// Apply `KEY=VALUE` pairs to a builder.
pub fn apply_sets(mut builder: CommandBuilder, sets: &[String]) -> Result<CommandBuilder> {
    for pair in sets {
        let (key, value) = pair.split_once('=').ok_or_else(|| {
            nsdock_core::Error::InvalidArgument(format!("--set expects KEY=VALUE, got `{pair}`"))
        })?;
        builder = builder.set(key, parse_set_value(value))?;
    }
    Ok(builder)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_set_value_sniffing() {
        assert_eq!(parse_set_value("true"), ArgValue::Bool(true));
        assert_eq!(parse_set_value("false"), ArgValue::Bool(false));
        assert_eq!(parse_set_value("7007"), ArgValue::Int(7007));
        assert_eq!(parse_set_value("0.05"), ArgValue::Float(0.05));
        assert_eq!(
            parse_set_value("exhaustive"),
            ArgValue::Str("exhaustive".to_string())
        );
        assert_eq!(
            parse_set_value("@/tmp/frames"),
            ArgValue::Path(path("/tmp/frames"))
        );
        assert_eq!(
            parse_set_value("@@literal"),
            ArgValue::Str("@literal".to_string())
        );
    }
}
