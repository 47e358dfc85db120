//! # Reason Codes — Stable Denial Taxonomy
//!
//! Every business denial in Courseflow carries a `ReasonCode`. The
//! string form of each code is a wire contract with the calling CRUD
//! layer: codes are stable, human messages are not. The calling layer
//! maps codes to transport status; [`ReasonCode::http_hint()`] records
//! the recommended mapping without binding this crate to any HTTP
//! framework.
//!
//! ## Classes
//!
//! - **Structural** — the requested status edge is not in the table.
//! - **Precondition** — the edge exists but an aggregate-count guard or
//!   capacity rule fails.
//! - **Referential** — a supplied identifier does not belong where the
//!   operation requires it to.
//! - **Conflict** — the operation collides with existing state.
//!
//! None of these are retried automatically; they are caller errors, not
//! transient faults.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::CoreError;

/// The class of a denial, for logging and transport mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasonClass {
    /// Illegal transition-table edge.
    Structural,
    /// Guard or capacity rule failed.
    Precondition,
    /// A referenced identifier is foreign to the operation's scope.
    Referential,
    /// Collision with existing state.
    Conflict,
    /// The addressed aggregate does not exist (or is tombstoned).
    NotFound,
}

/// Stable denial codes surfaced to the calling layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReasonCode {
    /// The requested status is not reachable from the current status.
    InvalidStatusTransition,
    /// Course has fewer modules than `MIN_TOPICS_FOR_COURSE`.
    InsufficientModules,
    /// Course has no lessons yet.
    NoLessons,
    /// Single admission against a course at capacity.
    CourseFull,
    /// Bulk admission batch exceeds remaining capacity.
    InsufficientCapacity,
    /// Module authoring beyond `MAX_TOPICS_PER_COURSE`.
    MaxTopicsExceeded,
    /// A module id does not belong to the course.
    InvalidModules,
    /// A student id does not resolve within the school.
    InvalidStudents,
    /// A teacher id does not resolve within the school.
    InvalidTeachers,
    /// Student and course belong to different schools.
    SchoolMismatch,
    /// The addressed aggregate does not exist.
    NotFound,
    /// The (student, course) pair is already enrolled.
    AlreadyEnrolled,
    /// Every student in a bulk admission batch was already enrolled.
    AllAlreadyEnrolled,
    /// Course deletion while PENDING/ACTIVE enrollments exist.
    HasActiveEnrollments,
    /// Vote set size differs from `REQUIRED_TOPICS`.
    InvalidVoteCount,
    /// Vote submission against a course not in TOPIC_VOTING.
    VotingClosed,
    /// Vote submission without an ACTIVE enrollment.
    NotEnrolled,
}

impl ReasonCode {
    /// The stable wire string for this code (e.g. `INVALID_STATUS_TRANSITION`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidStatusTransition => "INVALID_STATUS_TRANSITION",
            Self::InsufficientModules => "INSUFFICIENT_MODULES",
            Self::NoLessons => "NO_LESSONS",
            Self::CourseFull => "COURSE_FULL",
            Self::InsufficientCapacity => "INSUFFICIENT_CAPACITY",
            Self::MaxTopicsExceeded => "MAX_TOPICS_EXCEEDED",
            Self::InvalidModules => "INVALID_MODULES",
            Self::InvalidStudents => "INVALID_STUDENTS",
            Self::InvalidTeachers => "INVALID_TEACHERS",
            Self::SchoolMismatch => "SCHOOL_MISMATCH",
            Self::NotFound => "NOT_FOUND",
            Self::AlreadyEnrolled => "ALREADY_ENROLLED",
            Self::AllAlreadyEnrolled => "ALL_ALREADY_ENROLLED",
            Self::HasActiveEnrollments => "HAS_ACTIVE_ENROLLMENTS",
            Self::InvalidVoteCount => "INVALID_VOTE_COUNT",
            Self::VotingClosed => "VOTING_CLOSED",
            Self::NotEnrolled => "NOT_ENROLLED",
        }
    }

    /// The denial class this code belongs to.
    pub fn class(&self) -> ReasonClass {
        match self {
            Self::InvalidStatusTransition => ReasonClass::Structural,
            Self::InsufficientModules
            | Self::NoLessons
            | Self::CourseFull
            | Self::InsufficientCapacity
            | Self::MaxTopicsExceeded
            | Self::InvalidVoteCount
            | Self::VotingClosed
            | Self::NotEnrolled => ReasonClass::Precondition,
            Self::InvalidModules
            | Self::InvalidStudents
            | Self::InvalidTeachers
            | Self::SchoolMismatch => ReasonClass::Referential,
            Self::AlreadyEnrolled | Self::AllAlreadyEnrolled | Self::HasActiveEnrollments => {
                ReasonClass::Conflict
            }
            Self::NotFound => ReasonClass::NotFound,
        }
    }

    /// Recommended HTTP status for this code.
    ///
    /// A hint only; the transport mapping belongs to the calling layer.
    pub fn http_hint(&self) -> u16 {
        match self.class() {
            ReasonClass::Structural | ReasonClass::Conflict => 409,
            ReasonClass::Precondition | ReasonClass::Referential => 422,
            ReasonClass::NotFound => 404,
        }
    }

    /// Returns every code in canonical order, for exhaustive tests.
    pub fn all_codes() -> &'static [ReasonCode] {
        &[
            Self::InvalidStatusTransition,
            Self::InsufficientModules,
            Self::NoLessons,
            Self::CourseFull,
            Self::InsufficientCapacity,
            Self::MaxTopicsExceeded,
            Self::InvalidModules,
            Self::InvalidStudents,
            Self::InvalidTeachers,
            Self::SchoolMismatch,
            Self::NotFound,
            Self::AlreadyEnrolled,
            Self::AllAlreadyEnrolled,
            Self::HasActiveEnrollments,
            Self::InvalidVoteCount,
            Self::VotingClosed,
            Self::NotEnrolled,
        ]
    }
}

impl std::fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReasonCode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all_codes()
            .iter()
            .find(|c| c.as_str() == s)
            .copied()
            .ok_or_else(|| CoreError::UnknownReasonCode(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_str_roundtrip() {
        for code in ReasonCode::all_codes() {
            let parsed: ReasonCode = code.as_str().parse().unwrap();
            assert_eq!(*code, parsed);
        }
    }

    #[test]
    fn test_all_codes_unique() {
        let mut seen = std::collections::HashSet::new();
        for code in ReasonCode::all_codes() {
            assert!(seen.insert(code.as_str()), "Duplicate code: {code}");
        }
    }

    #[test]
    fn test_serde_matches_as_str() {
        for code in ReasonCode::all_codes() {
            let json = serde_json::to_string(code).unwrap();
            assert_eq!(json, format!("\"{}\"", code.as_str()));
        }
    }

    #[test]
    fn test_http_hints() {
        assert_eq!(ReasonCode::InvalidStatusTransition.http_hint(), 409);
        assert_eq!(ReasonCode::AlreadyEnrolled.http_hint(), 409);
        assert_eq!(ReasonCode::InsufficientModules.http_hint(), 422);
        assert_eq!(ReasonCode::SchoolMismatch.http_hint(), 422);
        assert_eq!(ReasonCode::NotFound.http_hint(), 404);
    }

    #[test]
    fn test_every_code_has_a_class() {
        for code in ReasonCode::all_codes() {
            // class() must be total; http_hint() derives from it.
            let _ = code.class();
            assert!(code.http_hint() >= 400);
        }
    }

    #[test]
    fn test_from_str_invalid() {
        assert!("NO_SUCH_CODE".parse::<ReasonCode>().is_err());
        assert!("invalid_status_transition".parse::<ReasonCode>().is_err());
    }
}
