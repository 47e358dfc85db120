//! # courseflow-state — Status State Machines
//!
//! Implements the status lifecycles of the four managed entity kinds.
//! Each status enum carries its own static transition table; the shared
//! validator checks a requested edge against the table first and only
//! then runs the precondition guards declared for the target status.
//!
//! ## State Machines
//!
//! - **Course** (`course.rs`): DRAFT → TOPIC_VOTING → SCHEDULED →
//!   IN_PROGRESS → COMPLETED → ARCHIVED, with CANCELLED branches.
//! - **Lesson** (`lesson.rs`): the delivery chain SCHEDULED →
//!   REMINDER_SENT → … → FEEDBACK_SENT, with CANCELLED reachable from
//!   the first five states.
//! - **Enrollment** (`enrollment.rs`): PENDING/ACTIVE/SUSPENDED with
//!   COMPLETED and DROPPED terminals.
//! - **Payment** (`payment.rs`): PENDING/PARTIAL/OVERDUE converging on
//!   PAID, with REFUNDED terminal.
//!
//! ## Design
//!
//! Statuses are enums with runtime-validated transitions rather than
//! typestate types: the validator is selected by a runtime `EntityKind`
//! arriving from the CRUD layer, so the current status is only known at
//! runtime. The enum approach keeps the table in one place per kind and
//! makes the table-vs-validator equivalence property directly testable.
//!
//! The validator itself is pure and table-driven. It performs no I/O;
//! guards read aggregate counts the caller has already loaded. A
//! structurally illegal edge never reaches guard evaluation.

pub mod course;
pub mod enrollment;
pub mod lesson;
pub mod payment;
pub mod validator;

// ─── Status re-exports ──────────────────────────────────────────────

pub use course::CourseStatus;
pub use enrollment::EnrollmentStatus;
pub use lesson::LessonStatus;
pub use payment::PaymentStatus;

// ─── Validator re-exports ───────────────────────────────────────────

pub use validator::{
    validate, validate_named, validate_with_guards, GuardContext, LifecycleStatus,
    TransitionError,
};
