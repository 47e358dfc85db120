//! # Engine Error
//!
//! Aggregates the domain-crate denials behind one error type and adds
//! the orchestrator's own denials (missing aggregates, authoring caps,
//! deletion conflicts). Every business denial exposes its stable reason
//! code; store failures are infrastructure faults and expose none.

use thiserror::Error;

use courseflow_core::ReasonCode;
use courseflow_enrollment::AdmissionError;
use courseflow_state::TransitionError;
use courseflow_voting::VotingError;

use crate::store::StoreError;

/// Errors surfaced by orchestrator operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// A status transition was denied.
    #[error(transparent)]
    Transition(#[from] TransitionError),

    /// A vote submission or finalization was denied.
    #[error(transparent)]
    Voting(#[from] VotingError),

    /// An admission was denied.
    #[error(transparent)]
    Admission(#[from] AdmissionError),

    /// The addressed aggregate does not exist or is tombstoned.
    #[error("{entity} {id} not found")]
    NotFound {
        /// Aggregate kind ("course", "lesson", "enrollment", "student").
        entity: &'static str,
        /// The identifier as supplied.
        id: String,
    },

    /// Module authoring beyond the per-course topic cap.
    #[error("course already has {count} modules, the maximum is {max}")]
    MaxTopicsExceeded {
        /// Current module count.
        count: usize,
        /// The cap.
        max: usize,
    },

    /// A module reordering did not reference exactly the course's
    /// module set.
    #[error("module ordering must reference exactly the course's {expected} module(s)")]
    InvalidModuleSet {
        /// The course's module count.
        expected: usize,
    },

    /// A teacher assignment referenced teachers outside the school.
    #[error("{missing} teacher id(s) do not resolve within the course's school")]
    InvalidTeachers {
        /// How many ids failed to resolve.
        missing: usize,
    },

    /// Course deletion while seats are held.
    #[error("course has {active} enrollment(s) holding seats and cannot be deleted")]
    HasActiveEnrollments {
        /// PENDING/ACTIVE enrollment count.
        active: usize,
    },

    /// The persistence collaborator failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl EngineError {
    /// Construct a not-found denial.
    pub fn not_found(entity: &'static str, id: impl std::fmt::Display) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// The stable reason code, if this is a business denial. Store
    /// failures return `None` and map to an internal error upstream.
    pub fn reason_code(&self) -> Option<ReasonCode> {
        match self {
            Self::Transition(e) => Some(e.reason_code()),
            Self::Voting(e) => Some(e.reason_code()),
            Self::Admission(e) => Some(e.reason_code()),
            Self::NotFound { .. } => Some(ReasonCode::NotFound),
            Self::MaxTopicsExceeded { .. } => Some(ReasonCode::MaxTopicsExceeded),
            Self::InvalidModuleSet { .. } => Some(ReasonCode::InvalidModules),
            Self::InvalidTeachers { .. } => Some(ReasonCode::InvalidTeachers),
            Self::HasActiveEnrollments { .. } => Some(ReasonCode::HasActiveEnrollments),
            Self::Store(_) => None,
        }
    }
}
