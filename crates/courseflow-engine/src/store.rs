//! # Store Seam
//!
//! The `LifecycleStore` trait is the persistence boundary of the
//! orchestration core. Implementations wrap whatever transactional
//! row store the platform runs on; the in-memory implementation in
//! `memory.rs` is the reference used by tests and demos.
//!
//! ## Atomicity Contract
//!
//! Read methods are plain lookups. Every write method must be applied
//! as **one atomic unit**: either all of its effects are visible or
//! none are. That is why multi-step writes are single trait methods
//! (`replace_votes`, `apply_finalization`, `replace_lessons`,
//! `admit_batch`, `replace_teacher_assignments`, `reorder_modules`)
//! instead of add/remove primitives the orchestrator would have to
//! sequence. Replacement methods are idempotent: re-running one with
//! the same arguments leaves the same state.
//!
//! ## Concurrency Note
//!
//! The orchestrator checks capacity against the counts it loaded and
//! then calls `admit_batch`; the store is not asked to re-verify. Under
//! concurrent admissions a SQL-backed implementation can therefore
//! transiently over-admit (two transactions both read a free seat
//! before either commits). Admission is admin-driven and
//! low-concurrency, so this window is accepted; an implementation that
//! needs to close it should take a row-level lock on the course inside
//! `admit_batch`.

use thiserror::Error;

use courseflow_core::{
    CourseId, EnrollmentId, LessonId, ModuleId, StudentId, TeacherId, Timestamp,
};
use courseflow_state::{CourseStatus, EnrollmentStatus, LessonStatus, PaymentStatus};

use crate::model::{
    Course, Enrollment, Lesson, Module, Progress, Student, Teacher, TopicVote, TransitionRecord,
};

/// A failure inside the persistence collaborator.
///
/// Backend failures are infrastructure faults, not business denials;
/// they carry no reason code and abort the whole operation. Transient
/// retry of the commit belongs to the store implementation, never to
/// the orchestrator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The underlying storage failed.
    #[error("storage backend failure: {0}")]
    Backend(String),
}

/// The transactional persistence seam for the lifecycle core.
///
/// All collection-returning reads produce rows in their natural order:
/// modules by `order_index`, lessons by `lesson_number`.
pub trait LifecycleStore: Send + Sync {
    // ── Reads ────────────────────────────────────────────────────────

    /// Load a course, tombstoned or not. Callers filter tombstones.
    fn course(&self, id: CourseId) -> Result<Option<Course>, StoreError>;

    /// All modules of a course, ordered by `order_index`.
    fn modules_of(&self, course: CourseId) -> Result<Vec<Module>, StoreError>;

    /// All lessons of a course, ordered by `lesson_number`.
    fn lessons_of(&self, course: CourseId) -> Result<Vec<Lesson>, StoreError>;

    /// Load a single lesson.
    fn lesson(&self, id: LessonId) -> Result<Option<Lesson>, StoreError>;

    /// All enrollments of a course.
    fn enrollments_of(&self, course: CourseId) -> Result<Vec<Enrollment>, StoreError>;

    /// Load a single enrollment.
    fn enrollment(&self, id: EnrollmentId) -> Result<Option<Enrollment>, StoreError>;

    /// All stored votes of a course's current voting round.
    fn votes_of(&self, course: CourseId) -> Result<Vec<TopicVote>, StoreError>;

    /// All progress records of a course.
    fn progress_of(&self, course: CourseId) -> Result<Vec<Progress>, StoreError>;

    /// Load a student.
    fn student(&self, id: StudentId) -> Result<Option<Student>, StoreError>;

    /// Load a teacher.
    fn teacher(&self, id: TeacherId) -> Result<Option<Teacher>, StoreError>;

    /// The teachers currently assigned to a course.
    fn teacher_assignments_of(&self, course: CourseId) -> Result<Vec<TeacherId>, StoreError>;

    // ── Atomic writes ────────────────────────────────────────────────

    /// Insert a freshly created course.
    fn insert_course(&self, course: Course) -> Result<(), StoreError>;

    /// Insert a freshly authored module.
    fn insert_module(&self, module: Module) -> Result<(), StoreError>;

    /// Insert a student (tenant provisioning).
    fn insert_student(&self, student: Student) -> Result<(), StoreError>;

    /// Insert a teacher (tenant provisioning).
    fn insert_teacher(&self, teacher: Teacher) -> Result<(), StoreError>;

    /// Update a course's status and append the transition record, as
    /// one unit.
    fn set_course_status(
        &self,
        id: CourseId,
        status: CourseStatus,
        record: TransitionRecord,
    ) -> Result<(), StoreError>;

    /// Replace one student's entire vote set for a course
    /// (delete-then-insert, one unit).
    fn replace_votes(
        &self,
        course: CourseId,
        student: StudentId,
        votes: Vec<TopicVote>,
    ) -> Result<(), StoreError>;

    /// Apply a voting finalization: set `is_selected` on the two module
    /// sets, move the course to the new status, and append the record,
    /// all as one unit. A partial application (modules flagged but
    /// status unchanged) must be impossible to observe.
    fn apply_finalization(
        &self,
        course: CourseId,
        selected: &[ModuleId],
        rejected: &[ModuleId],
        status: CourseStatus,
        record: TransitionRecord,
    ) -> Result<(), StoreError>;

    /// Replace a course's entire lesson batch and set its derived date
    /// bounds, as one unit. The previous batch is always discarded in
    /// full; there is no partial regeneration.
    fn replace_lessons(
        &self,
        course: CourseId,
        lessons: Vec<Lesson>,
        bounds: Option<(Timestamp, Timestamp)>,
    ) -> Result<(), StoreError>;

    /// Update a lesson's status.
    fn set_lesson_status(&self, id: LessonId, status: LessonStatus) -> Result<(), StoreError>;

    /// Create a batch of enrollments and their paired progress records,
    /// as one unit.
    fn admit_batch(
        &self,
        course: CourseId,
        enrollments: Vec<Enrollment>,
        progress: Vec<Progress>,
    ) -> Result<(), StoreError>;

    /// Update an enrollment's status.
    fn set_enrollment_status(
        &self,
        id: EnrollmentId,
        status: EnrollmentStatus,
    ) -> Result<(), StoreError>;

    /// Update an enrollment's payment status.
    fn set_payment_status(&self, id: EnrollmentId, status: PaymentStatus)
        -> Result<(), StoreError>;

    /// Replace a course's teacher assignments (delete-then-insert, one
    /// unit).
    fn replace_teacher_assignments(
        &self,
        course: CourseId,
        teachers: Vec<TeacherId>,
    ) -> Result<(), StoreError>;

    /// Reassign dense zero-based `order_index` values following the
    /// supplied ordering, as one unit. The caller guarantees `ordered`
    /// is a permutation of the course's module set.
    fn reorder_modules(&self, course: CourseId, ordered: Vec<ModuleId>) -> Result<(), StoreError>;

    /// Tombstone a course.
    fn tombstone_course(&self, id: CourseId, at: Timestamp) -> Result<(), StoreError>;
}
