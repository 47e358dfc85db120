//! # Persisted Records
//!
//! The entity shapes this core owns in the store. These are records,
//! not aggregates with behavior: all invariants are enforced by the
//! orchestrator before a write, and every record is serializable so a
//! row-store collaborator can persist it as-is.

use serde::{Deserialize, Serialize};

use courseflow_core::{
    CourseId, EnrollmentId, LessonId, ModuleId, SchoolId, StudentId, TeacherId, Timestamp,
};
use courseflow_state::{CourseStatus, EnrollmentStatus, LessonStatus, PaymentStatus};

// ─── Course ──────────────────────────────────────────────────────────

/// Record of a single course status transition.
///
/// Every successful status change appends one of these, giving each
/// course an immutable audit trail of its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionRecord {
    /// Status before the transition.
    pub from_status: CourseStatus,
    /// Status after the transition.
    pub to_status: CourseStatus,
    /// When the transition occurred (UTC).
    pub timestamp: Timestamp,
    /// Caller-supplied reason, if any.
    pub reason: Option<String>,
}

/// A course with its lifecycle status and transition history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    /// Unique course identifier.
    pub id: CourseId,
    /// The school (tenant) that owns the course.
    pub school_id: SchoolId,
    /// Display title.
    pub title: String,
    /// Current lifecycle status.
    pub status: CourseStatus,
    /// Capacity bound on PENDING/ACTIVE enrollments (at least 1).
    pub max_students: u32,
    /// Effective due amount per enrollment, in cents. Zero seeds
    /// admissions as PAID.
    pub price_cents: u64,
    /// First lesson instant; derived from the schedule, never set by
    /// the author.
    pub start_date: Option<Timestamp>,
    /// Last lesson instant; derived from the schedule.
    pub end_date: Option<Timestamp>,
    /// When the course was created.
    pub created_at: Timestamp,
    /// Tombstone; a set value hides the course from every operation.
    pub deleted_at: Option<Timestamp>,
    /// Ordered log of all status transitions.
    pub transitions: Vec<TransitionRecord>,
}

impl Course {
    /// Create a new course in DRAFT.
    ///
    /// Creation is not itself a transition; the log starts empty.
    pub fn new(school_id: SchoolId, title: String, max_students: u32, price_cents: u64) -> Self {
        Self {
            id: CourseId::new(),
            school_id,
            title,
            status: CourseStatus::Draft,
            max_students,
            price_cents,
            start_date: None,
            end_date: None,
            created_at: Timestamp::now(),
            deleted_at: None,
            transitions: Vec::new(),
        }
    }

    /// Whether the course has been soft-deleted.
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Append a transition record and move to `to`.
    pub fn record_transition(&mut self, to: CourseStatus, reason: Option<String>) {
        self.transitions.push(TransitionRecord {
            from_status: self.status,
            to_status: to,
            timestamp: Timestamp::now(),
            reason,
        });
        self.status = to;
    }
}

// ─── Module ──────────────────────────────────────────────────────────

/// A course module (topic). `order_index` values within a course are
/// dense and zero-based; they define both display order and the
/// round-robin lesson assignment order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    /// Unique module identifier.
    pub id: ModuleId,
    /// The owning course.
    pub course_id: CourseId,
    /// Display title; interior lessons are titled after it.
    pub title: String,
    /// Dense zero-based position within the course.
    pub order_index: u32,
    /// Whether voting finalization selected this module. Meaningless
    /// before finalization.
    pub is_selected: bool,
}

// ─── Lesson ──────────────────────────────────────────────────────────

/// A scheduled lesson. Lessons are generated and replaced as whole
/// batches per course; `lesson_number` is 1-based and unique per course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lesson {
    /// Unique lesson identifier.
    pub id: LessonId,
    /// The owning course.
    pub course_id: CourseId,
    /// The topic covered, if any (introduction and conclusion have none).
    pub module_id: Option<ModuleId>,
    /// 1-based position within the course.
    pub lesson_number: u32,
    /// Display title.
    pub title: String,
    /// Absolute start instant (UTC).
    pub scheduled_at: Timestamp,
    /// Duration in minutes.
    pub duration_minutes: u32,
    /// Delivery status.
    pub status: LessonStatus,
}

// ─── Enrollment ──────────────────────────────────────────────────────

/// One student's enrollment in one course; the pair is unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enrollment {
    /// Unique enrollment identifier.
    pub id: EnrollmentId,
    /// The course enrolled into.
    pub course_id: CourseId,
    /// The enrolled student.
    pub student_id: StudentId,
    /// Enrollment standing.
    pub status: EnrollmentStatus,
    /// Payment standing; evolves under its own transition table.
    pub payment_status: PaymentStatus,
    /// When the enrollment was created.
    pub enrolled_at: Timestamp,
}

/// Per-student progress through a course. `total_lessons` is
/// snapshotted from the course's lesson count at admission time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    /// The student progressing.
    pub student_id: StudentId,
    /// The course progressed through.
    pub course_id: CourseId,
    /// Lessons completed so far.
    pub completed_lessons: u32,
    /// Lesson count at admission.
    pub total_lessons: u32,
}

// ─── Voting ──────────────────────────────────────────────────────────

/// One stored (student, course, module) vote fact. A student's votes
/// for a course are only ever replaced wholesale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicVote {
    /// The voting student.
    pub student_id: StudentId,
    /// The course being voted on.
    pub course_id: CourseId,
    /// The module voted for.
    pub module_id: ModuleId,
}

// ─── People ──────────────────────────────────────────────────────────

/// A student within a school.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    /// Unique student identifier.
    pub id: StudentId,
    /// The school the student belongs to.
    pub school_id: SchoolId,
    /// Display name.
    pub name: String,
}

/// A teacher within a school.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Teacher {
    /// Unique teacher identifier.
    pub id: TeacherId,
    /// The school the teacher belongs to.
    pub school_id: SchoolId,
    /// Display name.
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_course_is_draft_with_empty_log() {
        let course = Course::new(SchoolId::new(), "Spanish B1".into(), 20, 45_000);
        assert_eq!(course.status, CourseStatus::Draft);
        assert!(course.transitions.is_empty());
        assert!(course.start_date.is_none());
        assert!(!course.is_deleted());
    }

    #[test]
    fn test_record_transition_appends_and_moves() {
        let mut course = Course::new(SchoolId::new(), "Spanish B1".into(), 20, 0);
        course.record_transition(CourseStatus::TopicVoting, Some("voting opened".into()));
        assert_eq!(course.status, CourseStatus::TopicVoting);
        assert_eq!(course.transitions.len(), 1);
        assert_eq!(course.transitions[0].from_status, CourseStatus::Draft);
        assert_eq!(course.transitions[0].to_status, CourseStatus::TopicVoting);
    }

    #[test]
    fn test_course_serialization_roundtrip() {
        let mut course = Course::new(SchoolId::new(), "Spanish B1".into(), 20, 45_000);
        course.record_transition(CourseStatus::TopicVoting, None);
        let json = serde_json::to_string(&course).unwrap();
        let parsed: Course = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, course);
    }
}
