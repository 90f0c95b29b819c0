pub mod commands;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "stocky",
    about = "Stocky inventory assistant CLI",
    long_about = "Ask natural-language questions about the inventory database, run migrations, load demo data, and inspect configuration.",
    after_help = "Examples:\n  stocky migrate\n  stocky seed\n  stocky ask \"Which products are low on stock?\"\n  stocky doctor --json"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Apply pending database migrations and return structured status output")]
    Migrate,
    #[command(about = "Load and verify the demo inventory dataset")]
    Seed,
    #[command(about = "Answer one natural-language question with the agent loop")]
    Ask {
        #[arg(help = "The question to answer")]
        question: String,
        #[arg(long, help = "Override the iteration budget for this question")]
        max_iterations: Option<u32>,
    },
    #[command(about = "Inspect effective configuration values with secret redaction")]
    Config,
    #[command(about = "Validate config and database connectivity")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Migrate => commands::migrate::run(),
        Command::Seed => commands::seed::run(),
        Command::Ask { question, max_iterations } => commands::ask::run(&question, max_iterations),
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
        Command::Doctor { json } => {
            commands::CommandResult { exit_code: 0, output: commands::doctor::run(json) }
        }
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
