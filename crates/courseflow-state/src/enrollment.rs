//! # Enrollment Status Machine
//!
//! Models the standing of one student within one course.
//!
//! ## States
//!
//! ```text
//! Pending ──▶ Active ──▶ Suspended ──▶ Active (reinstatement)
//!    │           │            │
//!    │           ├──▶ Completed (terminal)
//!    │           │
//!    └───────────┴──▶ Dropped (terminal)
//! ```
//!
//! PENDING and ACTIVE enrollments count against course capacity; the
//! other three statuses do not. The capacity invariant is bounded on
//! exactly that pair, so suspending an enrollment frees a seat until it
//! is reinstated.

use serde::{Deserialize, Serialize};

use crate::validator::LifecycleStatus;
use courseflow_core::EntityKind;

/// The status of an enrollment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EnrollmentStatus {
    /// Admission recorded but not yet confirmed.
    Pending,
    /// Student is actively enrolled.
    Active,
    /// Participation paused (unpaid, disciplinary, leave).
    Suspended,
    /// Student finished the course (terminal).
    Completed,
    /// Student left or was removed before completion (terminal).
    Dropped,
}

impl EnrollmentStatus {
    /// All enrollment statuses in canonical order.
    pub fn all() -> &'static [EnrollmentStatus] {
        &[
            Self::Pending,
            Self::Active,
            Self::Suspended,
            Self::Completed,
            Self::Dropped,
        ]
    }

    /// The statuses directly reachable from this one.
    pub fn successors(&self) -> &'static [EnrollmentStatus] {
        match self {
            Self::Pending => &[Self::Active, Self::Dropped],
            Self::Active => &[Self::Suspended, Self::Completed, Self::Dropped],
            Self::Suspended => &[Self::Active, Self::Dropped],
            Self::Completed => &[],
            Self::Dropped => &[],
        }
    }

    /// Whether this status is terminal.
    pub fn is_terminal(&self) -> bool {
        self.successors().is_empty()
    }

    /// Whether this enrollment occupies a capacity seat.
    pub fn counts_against_capacity(&self) -> bool {
        matches!(self, Self::Pending | Self::Active)
    }

    /// The canonical status name (e.g. `ACTIVE`).
    pub fn name(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Active => "ACTIVE",
            Self::Suspended => "SUSPENDED",
            Self::Completed => "COMPLETED",
            Self::Dropped => "DROPPED",
        }
    }

    /// Parse a status from its canonical name.
    pub fn from_name(s: &str) -> Option<EnrollmentStatus> {
        Self::all().iter().find(|v| v.name() == s).copied()
    }
}

impl LifecycleStatus for EnrollmentStatus {
    const KIND: EntityKind = EntityKind::Enrollment;

    fn all_statuses() -> &'static [Self] {
        Self::all()
    }

    fn successors(&self) -> &'static [Self] {
        EnrollmentStatus::successors(self)
    }

    fn name(&self) -> &'static str {
        EnrollmentStatus::name(self)
    }
}

impl std::fmt::Display for EnrollmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
