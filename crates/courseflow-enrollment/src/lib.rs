//! # courseflow-enrollment — Admission Decisions
//!
//! Pure admission logic for enrolling students into a course under the
//! capacity invariant: the count of PENDING/ACTIVE enrollments never
//! exceeds the course's `max_students` after a committed admission.
//!
//! The checks here are decisions over already-loaded state. The
//! orchestrator loads the capacity view and the existing-enrollment
//! set, asks this crate for a verdict or a bulk plan, and applies the
//! resulting writes as one atomic batch. Capacity is check-then-act by
//! design: the decision is only as fresh as the counts the caller
//! loaded (see the store contract for the concurrency consequences).

pub mod admission;

pub use admission::{
    check_single, initial_progress, plan_bulk, seed_payment_status, AdmissionError,
    BulkAdmissionPlan, CapacityView, ProgressSeed,
};
