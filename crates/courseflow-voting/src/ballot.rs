//! # Ballot Validation
//!
//! Validates one student's vote submission before it replaces their
//! stored vote set. A ballot must name exactly `REQUIRED_TOPICS`
//! distinct modules, every one of them belonging to the course being
//! voted on. Submissions replace the prior set wholesale, so
//! resubmitting an identical ballot is always safe; there is no
//! "already voted" denial.

use std::collections::HashSet;

use thiserror::Error;

use courseflow_core::{ModuleId, ReasonCode, REQUIRED_TOPICS};

/// Errors raised while accepting or finalizing votes.
///
/// `VotingClosed` and `NotEnrolled` are constructed by the orchestrator
/// (they depend on loaded course and enrollment state); the ballot
/// checks below raise the other two.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VotingError {
    /// The ballot did not contain exactly `REQUIRED_TOPICS` distinct modules.
    #[error("expected exactly {required} distinct module votes, got {actual}")]
    InvalidVoteCount {
        /// The required distinct-vote count.
        required: usize,
        /// The distinct-module count actually submitted.
        actual: usize,
    },

    /// One or more voted modules do not belong to the course.
    #[error("{foreign} voted module(s) do not belong to the course")]
    InvalidModules {
        /// How many submitted ids were foreign to the course.
        foreign: usize,
    },

    /// The course is not in TOPIC_VOTING.
    #[error("course is not open for topic voting (status {status})")]
    VotingClosed {
        /// The course's current status name.
        status: String,
    },

    /// The voting student holds no ACTIVE enrollment in the course.
    #[error("student {student} holds no active enrollment in this course")]
    NotEnrolled {
        /// The student's display identifier.
        student: String,
    },
}

impl VotingError {
    /// The stable reason code for this denial.
    pub fn reason_code(&self) -> ReasonCode {
        match self {
            Self::InvalidVoteCount { .. } => ReasonCode::InvalidVoteCount,
            Self::InvalidModules { .. } => ReasonCode::InvalidModules,
            Self::VotingClosed { .. } => ReasonCode::VotingClosed,
            Self::NotEnrolled { .. } => ReasonCode::NotEnrolled,
        }
    }
}

/// Validate a ballot against the course's module set.
///
/// Returns the normalized vote set (deduplicated, submission order
/// preserved) that should replace the student's stored votes. The
/// distinct-count check runs first so a ballot that is both short and
/// foreign reports the count problem, matching the order a voter can
/// actually fix things in.
pub fn validate_ballot(
    submitted: &[ModuleId],
    course_modules: &HashSet<ModuleId>,
) -> Result<Vec<ModuleId>, VotingError> {
    let mut seen = HashSet::with_capacity(submitted.len());
    let mut distinct = Vec::with_capacity(submitted.len());
    for id in submitted {
        if seen.insert(*id) {
            distinct.push(*id);
        }
    }

    if distinct.len() != REQUIRED_TOPICS {
        return Err(VotingError::InvalidVoteCount {
            required: REQUIRED_TOPICS,
            actual: distinct.len(),
        });
    }

    let foreign = distinct
        .iter()
        .filter(|id| !course_modules.contains(id))
        .count();
    if foreign > 0 {
        return Err(VotingError::InvalidModules { foreign });
    }

    Ok(distinct)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn course_of(n: usize) -> (Vec<ModuleId>, HashSet<ModuleId>) {
        let ids: Vec<ModuleId> = (0..n).map(|_| ModuleId::new()).collect();
        let set = ids.iter().copied().collect();
        (ids, set)
    }

    #[test]
    fn test_exact_ballot_accepted() {
        let (ids, set) = course_of(12);
        let ballot: Vec<ModuleId> = ids[..REQUIRED_TOPICS].to_vec();
        let accepted = validate_ballot(&ballot, &set).unwrap();
        assert_eq!(accepted, ballot);
    }

    #[test]
    fn test_short_ballot_rejected() {
        let (ids, set) = course_of(12);
        let err = validate_ballot(&ids[..REQUIRED_TOPICS - 1], &set).unwrap_err();
        assert_eq!(err.reason_code(), ReasonCode::InvalidVoteCount);
    }

    #[test]
    fn test_long_ballot_rejected() {
        let (ids, set) = course_of(12);
        let err = validate_ballot(&ids[..REQUIRED_TOPICS + 1], &set).unwrap_err();
        assert_eq!(
            err,
            VotingError::InvalidVoteCount {
                required: REQUIRED_TOPICS,
                actual: REQUIRED_TOPICS + 1
            }
        );
    }

    #[test]
    fn test_duplicates_collapse_to_distinct_count() {
        let (ids, set) = course_of(12);
        // Correct length, but one module appears twice: only 7 distinct.
        let mut ballot: Vec<ModuleId> = ids[..REQUIRED_TOPICS - 1].to_vec();
        ballot.push(ids[0]);
        assert_eq!(ballot.len(), REQUIRED_TOPICS);
        let err = validate_ballot(&ballot, &set).unwrap_err();
        assert_eq!(
            err,
            VotingError::InvalidVoteCount {
                required: REQUIRED_TOPICS,
                actual: REQUIRED_TOPICS - 1
            }
        );
    }

    #[test]
    fn test_foreign_module_rejected() {
        let (ids, set) = course_of(12);
        let mut ballot: Vec<ModuleId> = ids[..REQUIRED_TOPICS - 1].to_vec();
        ballot.push(ModuleId::new()); // not in the course
        let err = validate_ballot(&ballot, &set).unwrap_err();
        assert_eq!(err, VotingError::InvalidModules { foreign: 1 });
        assert_eq!(err.reason_code(), ReasonCode::InvalidModules);
    }

    #[test]
    fn test_count_checked_before_membership() {
        let (_, set) = course_of(12);
        // Entirely foreign AND short: the count denial wins.
        let ballot: Vec<ModuleId> = (0..3).map(|_| ModuleId::new()).collect();
        let err = validate_ballot(&ballot, &set).unwrap_err();
        assert_eq!(err.reason_code(), ReasonCode::InvalidVoteCount);
    }

    #[test]
    fn test_resubmission_is_not_an_error() {
        let (ids, set) = course_of(12);
        let ballot: Vec<ModuleId> = ids[..REQUIRED_TOPICS].to_vec();
        assert!(validate_ballot(&ballot, &set).is_ok());
        assert!(validate_ballot(&ballot, &set).is_ok());
    }
}
