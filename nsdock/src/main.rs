use anyhow::{Context, Result};
use clap::Parser;

use nsdock::cli::{apply_sets, parse_set_value, BackendKind, Cli, Commands};
use nsdock::{observability, path, CommandBuilder, Error, ExecutionResult, Session};

fn main() -> Result<()> {
    observability::init_tracing();
    let cli = Cli::parse();

    let session = build_session(&cli)?;
    let command = build_command(&session, &cli)?;

    match command.run() {
        Ok(result) => {
            print_result(&result, cli.json)?;
            Ok(())
        }
        Err(Error::Execution {
            command_line,
            exit_code,
            stderr_tail,
        }) => {
            tracing::error!(command = %command_line, exit_code, "command failed");
            if !stderr_tail.is_empty() {
                eprintln!("{stderr_tail}");
            }
            std::process::exit(exit_code);
        }
        Err(e) => Err(e).context("command execution failed"),
    }
}

fn build_session(cli: &Cli) -> Result<Session> {
    let session = match cli.backend {
        BackendKind::Docker => {
            let mut config = nsdock::config::docker_config_from_env();
            if let Some(image) = &cli.image {
                config.image = image.clone();
            }
            if cli.no_gpu {
                config.gpus = false;
            }
            Session::docker(&cli.output_base, &config).context("failed to start docker backend")?
        }
        BackendKind::Host => {
            Session::host(&cli.output_base).context("failed to set up host backend")?
        }
    };
    Ok(session)
}

fn build_command(session: &Session, cli: &Cli) -> Result<CommandBuilder> {
    let command = match &cli.command {
        Commands::ProcessImages {
            input,
            output_dir,
            set,
        } => apply_sets(session.process_images(path(input.as_path()), output_dir)?, set)?,
        Commands::ProcessData {
            processor,
            data,
            set,
        } => apply_sets(
            session.process_data(processor, parse_set_value(data))?,
            set,
        )?,
        Commands::Train { method, data, set } => {
            let mut builder = session.train(method);
            if let Some(data) = data {
                builder = builder.set("data", parse_set_value(data))?;
            }
            apply_sets(builder, set)?
        }
        Commands::Exec { command, set } => apply_sets(session.custom_command(command)?, set)?,
    };
    Ok(command)
}

fn print_result(result: &ExecutionResult, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
    } else if !result.stdout.is_empty() {
        print!("{}", result.stdout);
    }
    Ok(())
}
