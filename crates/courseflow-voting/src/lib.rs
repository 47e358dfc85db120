//! # courseflow-voting — Topic Voting
//!
//! Pure voting logic for the topic-voting phase of a course lifecycle:
//!
//! - **Ballot validation** (`ballot.rs`): one student's submission must
//!   name exactly `REQUIRED_TOPICS` distinct modules, all belonging to
//!   the course being voted on.
//! - **Tally and selection** (`tally.rs`): per-module counts of distinct
//!   voting students, sorted by count descending with ascending
//!   `order_index` as the deterministic tie-break, and the top
//!   `REQUIRED_TOPICS` selection that finalization applies.
//!
//! Persistence of vote rows (the delete-then-insert replacement of a
//! student's vote set) and the course status flip live in the
//! orchestrator; this crate never touches a store.

pub mod ballot;
pub mod tally;

pub use ballot::{validate_ballot, VotingError};
pub use tally::{tally_standings, select_top, CandidateModule, CastVote, FinalizationOutcome, ModuleStanding};
