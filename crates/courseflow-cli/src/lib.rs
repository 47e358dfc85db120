//! # courseflow-cli — Courseflow Command-Line Interface
//!
//! Operator tooling over the lifecycle core, useful when configuring a
//! tenant or debugging a denied transition without touching the API.
//!
//! ## Subcommands
//!
//! - `states` — print an entity kind's transition table
//! - `check` — dry-run a status transition through the validator,
//!   including the guard chain
//! - `schedule` — preview a generated lesson schedule without
//!   persisting anything
//!
//! ## Crate Policy
//!
//! - CLI construction (argument parsing) is separated from handlers.
//! - Handlers delegate to the domain crates — no business logic here.

pub mod check;
pub mod schedule;
pub mod states;
