pub mod commands;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "sokoni",
    about = "Sokoni operator CLI",
    long_about = "Operate the Sokoni assistant: config inspection, readiness checks, and one-shot chat.",
    after_help = "Examples:\n  sokoni doctor --json\n  sokoni config\n  sokoni chat \"how should I price woven baskets?\""
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(
        about = "Inspect effective configuration values with source attribution and redaction"
    )]
    Config,
    #[command(about = "Validate config and generation backend wiring")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "Send one message through the assistant and print the response envelope")]
    Chat {
        #[arg(help = "The user message to dispatch")]
        message: String,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
        Command::Doctor { json } => commands::doctor::run(json),
        Command::Chat { message } => commands::chat::run(&message),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
