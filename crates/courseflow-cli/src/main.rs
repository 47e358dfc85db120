//! # courseflow CLI Entry Point
//!
//! Assembles subcommands and dispatches to handler modules.

use clap::Parser;

/// Courseflow CLI — course lifecycle tooling.
///
/// Inspects transition tables, dry-runs status transitions, and
/// previews lesson schedules for the Courseflow platform.
#[derive(Parser, Debug)]
#[command(name = "courseflow", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Print an entity kind's transition table.
    States(courseflow_cli::states::StatesArgs),
    /// Dry-run a status transition through the validator.
    Check(courseflow_cli::check::CheckArgs),
    /// Preview a generated lesson schedule.
    Schedule(courseflow_cli::schedule::ScheduleArgs),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::States(args) => courseflow_cli::states::run(&args),
        Commands::Check(args) => courseflow_cli::check::run(&args),
        Commands::Schedule(args) => courseflow_cli::schedule::run(&args),
    }
}
