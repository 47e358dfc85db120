//! # Check Subcommand
//!
//! Dry-runs a status transition through the validator, including the
//! guard chain, without touching any store. Aggregate counts the guards
//! would read from loaded state are supplied as flags.

use clap::Args;

use courseflow_core::EntityKind;
use courseflow_state::{validate_named, GuardContext};

/// Arguments for the check subcommand.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Entity kind: course, lesson, enrollment, or payment.
    pub kind: String,
    /// Current status name (e.g. DRAFT).
    pub from: String,
    /// Requested status name (e.g. TOPIC_VOTING).
    pub to: String,

    /// Module count to feed the guard chain.
    #[arg(long, default_value_t = 0)]
    pub modules: usize,

    /// Lesson count to feed the guard chain.
    #[arg(long, default_value_t = 0)]
    pub lessons: usize,
}

/// Run the dry-run and print the verdict.
pub fn run(args: &CheckArgs) -> anyhow::Result<()> {
    let kind: EntityKind = args.kind.parse()?;
    println!("{}", verdict(kind, args));
    Ok(())
}

/// The rendered verdict line.
pub fn verdict(kind: EntityKind, args: &CheckArgs) -> String {
    let ctx = GuardContext {
        module_count: args.modules,
        lesson_count: args.lessons,
    };
    match validate_named(kind, &args.from, &args.to, &ctx) {
        Ok(()) => format!("ALLOWED  {} {} -> {}", kind, args.from, args.to),
        Err(err) => format!(
            "DENIED   {} {} -> {}  [{}] {}",
            kind,
            args.from,
            args.to,
            err.reason_code(),
            err
        ),
    }
}
