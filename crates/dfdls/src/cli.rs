use std::process::ExitCode;

use anyhow::Context;
use anyhow::Result;
use clap::Parser;
use dfdls_conf::Settings;

use crate::args::Args;
use crate::commands::Command;
use crate::commands::DfdlsCommand;
use crate::logging::init_tracing;

/// The main CLI structure that defines the command-line interface
#[derive(Parser)]
#[command(name = "dfdls")]
#[command(version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: DfdlsCommand,

    #[command(flatten)]
    pub args: Args,
}

/// Parse CLI arguments, load settings for the current directory and execute
/// the chosen command
pub fn run(args: Vec<String>) -> Result<ExitCode> {
    let cli = Cli::try_parse_from(args).unwrap_or_else(|e| {
        e.exit();
    });

    let project_root = std::env::current_dir().context("Failed to get current directory")?;
    let settings = Settings::new(&project_root).context("Failed to load settings")?;
    init_tracing(&cli.args.global, settings.debug);

    let exit = cli.command.execute(&cli.args, &settings)?;
    if !cli.args.global.quiet {
        if let Some(message) = exit.message() {
            eprintln!("{message}");
        }
    }
    Ok(exit.code())
}
