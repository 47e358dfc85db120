//! # courseflow-schedule — Lesson Schedule Generation
//!
//! A pure function from scheduling parameters and an ordered list of
//! selected topics to a fully dated lesson sequence. No I/O, no stored
//! side effects: the orchestrator persists the result as a whole batch
//! and derives the course's date bounds from it.
//!
//! Determinism matters here the same way it does in the voting tally:
//! regenerating a schedule from the same inputs must produce the same
//! batch, because regeneration always discards and replaces the
//! previous one.

pub mod generator;

pub use generator::{
    date_bounds, generate, Frequency, LessonDescriptor, ScheduleError, ScheduleParams,
    ScheduledTopic,
};
