//! # courseflow-engine — Lifecycle Orchestration
//!
//! Composes the pure domain crates into the externally visible course
//! lifecycle operations: authoring, status changes, topic voting and
//! finalization, schedule generation, admission, and deletion.
//!
//! ## Architecture
//!
//! - **Records** (`model.rs`): the persisted shapes of courses, modules,
//!   lessons, enrollments, progress, and votes.
//! - **Store seam** (`store.rs`): the `LifecycleStore` trait. Reads are
//!   plain lookups; every multi-step write is a single trait method the
//!   implementation must apply atomically (replace-whole-collection and
//!   paired update-plus-status-change operations).
//! - **In-memory store** (`memory.rs`): the mutex-backed reference
//!   implementation used by tests, the CLI preview, and the demo API.
//! - **Orchestrator** (`orchestrator.rs`): loads state, runs the
//!   validation pipeline, and applies exactly one atomic write per
//!   operation. A failed check writes nothing.
//!
//! ## Crate Policy
//!
//! - Sits above the pure domain crates; the only crate that talks to a
//!   store.
//! - All denials carry stable reason codes via `EngineError`.
//! - No HTTP or CLI concerns here; those live in `courseflow-api` and
//!   `courseflow-cli`.

pub mod error;
pub mod memory;
pub mod model;
pub mod orchestrator;
pub mod store;

pub use error::EngineError;
pub use memory::MemoryStore;
pub use model::{
    Course, Enrollment, Lesson, Module, Progress, Student, Teacher, TopicVote, TransitionRecord,
};
pub use orchestrator::{AdmissionReport, Orchestrator, StatusChanged};
pub use store::{LifecycleStore, StoreError};
