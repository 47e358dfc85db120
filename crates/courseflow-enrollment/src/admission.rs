//! # Admission Checks
//!
//! Single and bulk admission against one shared capacity rule:
//! `active_count < max_students` at the time of the check.
//!
//! Single admission validates school membership, duplication, and
//! capacity in that order, so the caller always learns about the most
//! fundamental problem first. Bulk admission partitions the batch into
//! already-enrolled students (skipped, not an error) and new students,
//! then applies an all-or-nothing capacity check over the new set.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use courseflow_core::{ReasonCode, SchoolId, StudentId};
use courseflow_state::PaymentStatus;

/// Errors raised while admitting students.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AdmissionError {
    /// Student and course belong to different schools.
    #[error("student school {student_school} does not match course school {course_school}")]
    SchoolMismatch {
        /// The student's owning school.
        student_school: SchoolId,
        /// The course's owning school.
        course_school: SchoolId,
    },

    /// The (student, course) pair already has an enrollment.
    #[error("student {student} is already enrolled in this course")]
    AlreadyEnrolled {
        /// The duplicate student.
        student: StudentId,
    },

    /// Single admission against a full course.
    #[error("course is full ({active} of {capacity} seats taken)")]
    CourseFull {
        /// Seats currently occupied (PENDING or ACTIVE).
        active: u32,
        /// The course's `max_students`.
        capacity: u32,
    },

    /// Bulk admission batch larger than the remaining capacity.
    #[error("batch of {requested} new students exceeds remaining capacity of {available}")]
    InsufficientCapacity {
        /// New (non-duplicate) students in the batch.
        requested: usize,
        /// Seats still free.
        available: u32,
    },

    /// Every student in the bulk batch was already enrolled.
    #[error("all {count} students in the batch are already enrolled")]
    AllAlreadyEnrolled {
        /// Size of the (deduplicated) batch.
        count: usize,
    },

    /// The batch referenced students unknown to the school.
    #[error("{missing} student id(s) do not resolve within the school")]
    InvalidStudents {
        /// How many ids failed to resolve.
        missing: usize,
    },
}

impl AdmissionError {
    /// The stable reason code for this denial.
    pub fn reason_code(&self) -> ReasonCode {
        match self {
            Self::SchoolMismatch { .. } => ReasonCode::SchoolMismatch,
            Self::AlreadyEnrolled { .. } => ReasonCode::AlreadyEnrolled,
            Self::CourseFull { .. } => ReasonCode::CourseFull,
            Self::InsufficientCapacity { .. } => ReasonCode::InsufficientCapacity,
            Self::AllAlreadyEnrolled { .. } => ReasonCode::AllAlreadyEnrolled,
            Self::InvalidStudents { .. } => ReasonCode::InvalidStudents,
        }
    }
}

// ─── Capacity ────────────────────────────────────────────────────────

/// A course's seat accounting at the moment of the check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapacityView {
    /// The course's configured capacity (`max_students`, at least 1).
    pub max_students: u32,
    /// Enrollments currently counting against capacity (PENDING or ACTIVE).
    pub active_count: u32,
}

impl CapacityView {
    /// Seats still free. Saturates at zero if the store already holds
    /// more active enrollments than the configured capacity.
    pub fn remaining(&self) -> u32 {
        self.max_students.saturating_sub(self.active_count)
    }
}

// ─── Single Admission ────────────────────────────────────────────────

/// Decide a single admission.
///
/// Check order: school membership, duplication, capacity. Success means
/// the caller may create one ACTIVE enrollment for the pair.
pub fn check_single(
    student: StudentId,
    student_school: SchoolId,
    course_school: SchoolId,
    already_enrolled: bool,
    capacity: CapacityView,
) -> Result<(), AdmissionError> {
    if student_school != course_school {
        return Err(AdmissionError::SchoolMismatch {
            student_school,
            course_school,
        });
    }
    if already_enrolled {
        return Err(AdmissionError::AlreadyEnrolled { student });
    }
    if capacity.remaining() == 0 {
        return Err(AdmissionError::CourseFull {
            active: capacity.active_count,
            capacity: capacity.max_students,
        });
    }
    Ok(())
}

// ─── Bulk Admission ──────────────────────────────────────────────────

/// The writes a bulk admission should apply, with the skipped set the
/// caller reports back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkAdmissionPlan {
    /// Students to enroll, in request order, duplicates removed.
    pub admit: Vec<StudentId>,
    /// Students skipped because they were already enrolled.
    pub skipped: Vec<StudentId>,
}

/// Plan a bulk admission.
///
/// Students already enrolled are skipped, not rejected; the capacity
/// check is all-or-nothing over the remaining new students. An entirely
/// duplicate batch is a conflict (there is nothing to admit), and an
/// empty batch is treated the same way.
pub fn plan_bulk(
    requested: &[StudentId],
    enrolled: &HashSet<StudentId>,
    capacity: CapacityView,
) -> Result<BulkAdmissionPlan, AdmissionError> {
    let mut seen = HashSet::with_capacity(requested.len());
    let mut admit = Vec::new();
    let mut skipped = Vec::new();
    for student in requested {
        if !seen.insert(*student) {
            continue;
        }
        if enrolled.contains(student) {
            skipped.push(*student);
        } else {
            admit.push(*student);
        }
    }

    if admit.is_empty() {
        return Err(AdmissionError::AllAlreadyEnrolled { count: seen.len() });
    }
    if admit.len() > capacity.remaining() as usize {
        return Err(AdmissionError::InsufficientCapacity {
            requested: admit.len(),
            available: capacity.remaining(),
        });
    }

    Ok(BulkAdmissionPlan { admit, skipped })
}

// ─── Seeding ─────────────────────────────────────────────────────────

/// The payment status a fresh enrollment starts in: PAID when nothing
/// is due, PENDING otherwise.
pub fn seed_payment_status(due_cents: u64) -> PaymentStatus {
    if due_cents == 0 {
        PaymentStatus::Paid
    } else {
        PaymentStatus::Pending
    }
}

/// A fresh progress record for one admitted student.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressSeed {
    /// Lessons completed so far (always zero at admission).
    pub completed_lessons: u32,
    /// Total lessons snapshotted from the course at admission time.
    pub total_lessons: u32,
}

/// Snapshot the course's current lesson count into a progress record.
pub fn initial_progress(lesson_count: u32) -> ProgressSeed {
    ProgressSeed {
        completed_lessons: 0,
        total_lessons: lesson_count,
    }
}

// ─── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn capacity(max: u32, active: u32) -> CapacityView {
        CapacityView {
            max_students: max,
            active_count: active,
        }
    }

    // ── Single admission ─────────────────────────────────────────────

    #[test]
    fn test_single_admission_happy_path() {
        let school = SchoolId::new();
        let result = check_single(StudentId::new(), school, school, false, capacity(20, 5));
        assert!(result.is_ok());
    }

    #[test]
    fn test_school_mismatch_checked_first() {
        // Mismatched school on an already-enrolled student in a full
        // course: the mismatch wins.
        let err = check_single(
            StudentId::new(),
            SchoolId::new(),
            SchoolId::new(),
            true,
            capacity(1, 1),
        )
        .unwrap_err();
        assert_eq!(err.reason_code(), ReasonCode::SchoolMismatch);
    }

    #[test]
    fn test_duplicate_checked_before_capacity() {
        let school = SchoolId::new();
        let err = check_single(StudentId::new(), school, school, true, capacity(1, 1))
            .unwrap_err();
        assert_eq!(err.reason_code(), ReasonCode::AlreadyEnrolled);
    }

    #[test]
    fn test_full_course_denies_single() {
        let school = SchoolId::new();
        let err = check_single(StudentId::new(), school, school, false, capacity(8, 8))
            .unwrap_err();
        assert_eq!(
            err,
            AdmissionError::CourseFull {
                active: 8,
                capacity: 8
            }
        );
    }

    #[test]
    fn test_last_seat_is_admittable() {
        let school = SchoolId::new();
        assert!(check_single(StudentId::new(), school, school, false, capacity(8, 7)).is_ok());
    }

    // ── Bulk admission ───────────────────────────────────────────────

    #[test]
    fn test_bulk_skips_duplicates_without_error() {
        // One already-enrolled, one new, one free seat: admit the new
        // student and skip the duplicate.
        let s1 = StudentId::new();
        let s2 = StudentId::new();
        let enrolled: HashSet<StudentId> = [s1].into_iter().collect();
        let plan = plan_bulk(&[s1, s2], &enrolled, capacity(5, 4)).unwrap();
        assert_eq!(plan.admit, vec![s2]);
        assert_eq!(plan.skipped, vec![s1]);
    }

    #[test]
    fn test_bulk_capacity_is_all_or_nothing() {
        let students: Vec<StudentId> = (0..3).map(|_| StudentId::new()).collect();
        let err = plan_bulk(&students, &HashSet::new(), capacity(10, 8)).unwrap_err();
        assert_eq!(
            err,
            AdmissionError::InsufficientCapacity {
                requested: 3,
                available: 2
            }
        );
    }

    #[test]
    fn test_bulk_capacity_counts_only_new_students() {
        // Batch of 3 with 2 duplicates needs one seat, not three.
        let s1 = StudentId::new();
        let s2 = StudentId::new();
        let s3 = StudentId::new();
        let enrolled: HashSet<StudentId> = [s1, s2].into_iter().collect();
        let plan = plan_bulk(&[s1, s2, s3], &enrolled, capacity(10, 9)).unwrap();
        assert_eq!(plan.admit, vec![s3]);
        assert_eq!(plan.skipped, vec![s1, s2]);
    }

    #[test]
    fn test_bulk_exact_fit_admits() {
        let students: Vec<StudentId> = (0..4).map(|_| StudentId::new()).collect();
        let plan = plan_bulk(&students, &HashSet::new(), capacity(10, 6)).unwrap();
        assert_eq!(plan.admit.len(), 4);
    }

    #[test]
    fn test_bulk_all_already_enrolled_is_conflict() {
        let s1 = StudentId::new();
        let s2 = StudentId::new();
        let enrolled: HashSet<StudentId> = [s1, s2].into_iter().collect();
        let err = plan_bulk(&[s1, s2], &enrolled, capacity(10, 2)).unwrap_err();
        assert_eq!(err, AdmissionError::AllAlreadyEnrolled { count: 2 });
        assert_eq!(err.reason_code(), ReasonCode::AllAlreadyEnrolled);
    }

    #[test]
    fn test_bulk_empty_batch_is_conflict() {
        let err = plan_bulk(&[], &HashSet::new(), capacity(10, 0)).unwrap_err();
        assert_eq!(err, AdmissionError::AllAlreadyEnrolled { count: 0 });
    }

    #[test]
    fn test_bulk_dedupes_request_repeats() {
        let s1 = StudentId::new();
        let plan = plan_bulk(&[s1, s1, s1], &HashSet::new(), capacity(10, 9)).unwrap();
        assert_eq!(plan.admit, vec![s1]);
        assert!(plan.skipped.is_empty());
    }

    // ── Seeding ──────────────────────────────────────────────────────

    #[test]
    fn test_payment_seeding() {
        assert_eq!(seed_payment_status(0), PaymentStatus::Paid);
        assert_eq!(seed_payment_status(1), PaymentStatus::Pending);
        assert_eq!(seed_payment_status(45_000), PaymentStatus::Pending);
    }

    #[test]
    fn test_progress_snapshot() {
        let seed = initial_progress(12);
        assert_eq!(seed.completed_lessons, 0);
        assert_eq!(seed.total_lessons, 12);
    }

    #[test]
    fn test_plan_serialization_roundtrip() {
        let s1 = StudentId::new();
        let s2 = StudentId::new();
        let enrolled: HashSet<StudentId> = [s1].into_iter().collect();
        let plan = plan_bulk(&[s1, s2], &enrolled, capacity(5, 1)).unwrap();
        let json = serde_json::to_string(&plan).unwrap();
        let parsed: BulkAdmissionPlan = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, plan);
    }
}
