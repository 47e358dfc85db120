//! # Course Orchestrator
//!
//! Composes the validator, guards, voting tally, schedule generator,
//! and admission checks into the externally visible lifecycle
//! operations, and owns the transactional discipline: every operation
//! loads what it needs, validates, and then applies **at most one**
//! atomic store write. A failed check writes nothing, so no partial
//! state is ever observable.
//!
//! Operation ordering inside each method is fixed: existence and
//! tombstone checks, then the structural table check, then guards and
//! referential checks, then the single write. Structural denials are
//! therefore never masked by guard or referential ones.

use std::collections::HashSet;
use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use courseflow_core::{
    CourseId, EnrollmentId, EntityKind, LessonId, ModuleId, SchoolId, StudentId, TeacherId,
    Timestamp, MAX_TOPICS_PER_COURSE,
};
use courseflow_enrollment::{
    check_single, initial_progress, plan_bulk, seed_payment_status, AdmissionError, CapacityView,
};
use courseflow_schedule::{date_bounds, generate, ScheduleParams, ScheduledTopic};
use courseflow_state::{
    validate, validate_with_guards, CourseStatus, EnrollmentStatus, GuardContext, LessonStatus,
    PaymentStatus, TransitionError,
};
use courseflow_voting::{
    select_top, tally_standings, validate_ballot, CandidateModule, CastVote, VotingError,
};

use crate::error::EngineError;
use crate::model::{
    Course, Enrollment, Lesson, Module, Progress, Student, TopicVote, TransitionRecord,
};
use crate::store::LifecycleStore;

// ─── Results ─────────────────────────────────────────────────────────

/// The entity updated by a generic status change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StatusChanged {
    /// A course status change.
    Course(Course),
    /// A lesson status change.
    Lesson(Lesson),
    /// An enrollment or payment status change.
    Enrollment(Enrollment),
}

/// Outcome of a bulk admission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdmissionReport {
    /// Students enrolled by this call, in request order.
    pub enrolled: Vec<StudentId>,
    /// Students skipped because they were already enrolled.
    pub skipped: Vec<StudentId>,
}

// ─── Orchestrator ────────────────────────────────────────────────────

/// The lifecycle orchestrator over a transactional store.
#[derive(Debug)]
pub struct Orchestrator<S> {
    store: S,
}

impl<S: LifecycleStore> Orchestrator<S> {
    /// Wrap a store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Access the underlying store (read-side inspection).
    pub fn store(&self) -> &S {
        &self.store
    }

    // ── Loading helpers ──────────────────────────────────────────────

    fn load_course(&self, id: CourseId) -> Result<Course, EngineError> {
        self.store
            .course(id)?
            .filter(|c| !c.is_deleted())
            .ok_or_else(|| EngineError::not_found("course", id))
    }

    fn load_lesson(&self, id: LessonId) -> Result<Lesson, EngineError> {
        self.store
            .lesson(id)?
            .ok_or_else(|| EngineError::not_found("lesson", id))
    }

    fn load_enrollment(&self, id: EnrollmentId) -> Result<Enrollment, EngineError> {
        self.store
            .enrollment(id)?
            .ok_or_else(|| EngineError::not_found("enrollment", id))
    }

    fn load_student(&self, id: StudentId) -> Result<Student, EngineError> {
        self.store
            .student(id)?
            .ok_or_else(|| EngineError::not_found("student", id))
    }

    fn guard_context(&self, course: CourseId) -> Result<GuardContext, EngineError> {
        Ok(GuardContext {
            module_count: self.store.modules_of(course)?.len(),
            lesson_count: self.store.lessons_of(course)?.len(),
        })
    }

    fn capacity_view(&self, course: &Course) -> Result<(CapacityView, Vec<Enrollment>), EngineError> {
        let enrollments = self.store.enrollments_of(course.id)?;
        let active = enrollments
            .iter()
            .filter(|e| e.status.counts_against_capacity())
            .count() as u32;
        Ok((
            CapacityView {
                max_students: course.max_students,
                active_count: active,
            },
            enrollments,
        ))
    }

    // ── Authoring ────────────────────────────────────────────────────

    /// Create a course in DRAFT.
    pub fn create_course(
        &self,
        school_id: SchoolId,
        title: impl Into<String>,
        max_students: NonZeroU32,
        price_cents: u64,
    ) -> Result<Course, EngineError> {
        let course = Course::new(school_id, title.into(), max_students.get(), price_cents);
        self.store.insert_course(course.clone())?;
        info!(course = %course.id, school = %school_id, "course created");
        Ok(course)
    }

    /// Author a module onto a course, appending it at the next dense
    /// `order_index`.
    pub fn add_module(
        &self,
        course_id: CourseId,
        title: impl Into<String>,
    ) -> Result<Module, EngineError> {
        let course = self.load_course(course_id)?;
        let count = self.store.modules_of(course.id)?.len();
        if count >= MAX_TOPICS_PER_COURSE {
            return Err(EngineError::MaxTopicsExceeded {
                count,
                max: MAX_TOPICS_PER_COURSE,
            });
        }
        let module = Module {
            id: ModuleId::new(),
            course_id: course.id,
            title: title.into(),
            order_index: count as u32,
            is_selected: false,
        };
        self.store.insert_module(module.clone())?;
        debug!(course = %course.id, module = %module.id, index = module.order_index, "module added");
        Ok(module)
    }

    /// Replace a course's module ordering. `ordered` must be a
    /// permutation of the course's module set; dense zero-based indices
    /// are reassigned in the given order as one unit.
    pub fn reorder_modules(
        &self,
        course_id: CourseId,
        ordered: &[ModuleId],
    ) -> Result<(), EngineError> {
        let course = self.load_course(course_id)?;
        let current: HashSet<ModuleId> =
            self.store.modules_of(course.id)?.iter().map(|m| m.id).collect();
        let supplied: HashSet<ModuleId> = ordered.iter().copied().collect();
        if supplied.len() != ordered.len() || supplied != current {
            return Err(EngineError::InvalidModuleSet {
                expected: current.len(),
            });
        }
        self.store.reorder_modules(course.id, ordered.to_vec())?;
        debug!(course = %course.id, "modules reordered");
        Ok(())
    }

    /// Replace a course's teacher assignments as one unit. Every id
    /// must resolve to a teacher of the course's school.
    pub fn assign_teachers(
        &self,
        course_id: CourseId,
        teacher_ids: &[TeacherId],
    ) -> Result<(), EngineError> {
        let course = self.load_course(course_id)?;
        let mut seen = HashSet::with_capacity(teacher_ids.len());
        let mut assignment = Vec::with_capacity(teacher_ids.len());
        let mut missing = 0usize;
        for id in teacher_ids {
            if !seen.insert(*id) {
                continue;
            }
            match self.store.teacher(*id)? {
                Some(teacher) if teacher.school_id == course.school_id => assignment.push(*id),
                _ => missing += 1,
            }
        }
        if missing > 0 {
            return Err(EngineError::InvalidTeachers { missing });
        }
        self.store
            .replace_teacher_assignments(course.id, assignment)?;
        debug!(course = %course.id, "teacher assignments replaced");
        Ok(())
    }

    // ── Status changes ───────────────────────────────────────────────

    /// Change a course's status through the table and guard pipeline.
    pub fn change_course_status(
        &self,
        course_id: CourseId,
        requested: CourseStatus,
        reason: Option<String>,
    ) -> Result<Course, EngineError> {
        let mut course = self.load_course(course_id)?;
        let ctx = self.guard_context(course.id)?;
        validate_with_guards(course.status, requested, &ctx)?;
        let record = TransitionRecord {
            from_status: course.status,
            to_status: requested,
            timestamp: Timestamp::now(),
            reason,
        };
        self.store
            .set_course_status(course.id, requested, record.clone())?;
        course.transitions.push(record);
        course.status = requested;
        info!(course = %course.id, status = %requested, "course status changed");
        Ok(course)
    }

    /// Change a lesson's delivery status. Lesson edges carry no guards.
    pub fn change_lesson_status(
        &self,
        lesson_id: LessonId,
        requested: LessonStatus,
    ) -> Result<Lesson, EngineError> {
        let mut lesson = self.load_lesson(lesson_id)?;
        validate(lesson.status, requested)?;
        self.store.set_lesson_status(lesson.id, requested)?;
        lesson.status = requested;
        info!(lesson = %lesson.id, status = %requested, "lesson status changed");
        Ok(lesson)
    }

    /// Change an enrollment's status.
    pub fn change_enrollment_status(
        &self,
        enrollment_id: EnrollmentId,
        requested: EnrollmentStatus,
    ) -> Result<Enrollment, EngineError> {
        let mut enrollment = self.load_enrollment(enrollment_id)?;
        validate(enrollment.status, requested)?;
        self.store.set_enrollment_status(enrollment.id, requested)?;
        enrollment.status = requested;
        info!(enrollment = %enrollment.id, status = %requested, "enrollment status changed");
        Ok(enrollment)
    }

    /// Drop an enrollment, freeing its seat.
    pub fn withdraw(&self, enrollment_id: EnrollmentId) -> Result<Enrollment, EngineError> {
        self.change_enrollment_status(enrollment_id, EnrollmentStatus::Dropped)
    }

    /// Record a payment-status change against the payment table. The
    /// enrollment's own status is untouched.
    pub fn record_payment_status(
        &self,
        enrollment_id: EnrollmentId,
        requested: PaymentStatus,
    ) -> Result<Enrollment, EngineError> {
        let mut enrollment = self.load_enrollment(enrollment_id)?;
        validate(enrollment.payment_status, requested)?;
        self.store.set_payment_status(enrollment.id, requested)?;
        enrollment.payment_status = requested;
        info!(enrollment = %enrollment.id, payment = %requested, "payment status recorded");
        Ok(enrollment)
    }

    /// Generic status change addressed by entity kind and status name,
    /// as the CRUD layer calls it. The reason is recorded on course
    /// transitions; the other kinds keep no per-transition log.
    ///
    /// An unrecognized status name is denied as an invalid transition
    /// from the entity's current status.
    pub fn change_status(
        &self,
        kind: EntityKind,
        id: Uuid,
        requested: &str,
        reason: Option<String>,
    ) -> Result<StatusChanged, EngineError> {
        match kind {
            EntityKind::Course => {
                let course_id = CourseId(id);
                let course = self.load_course(course_id)?;
                let status = CourseStatus::from_name(requested)
                    .ok_or_else(|| invalid_edge(kind, course.status.name(), requested))?;
                self.change_course_status(course_id, status, reason)
                    .map(StatusChanged::Course)
            }
            EntityKind::Lesson => {
                let lesson_id = LessonId(id);
                let lesson = self.load_lesson(lesson_id)?;
                let status = LessonStatus::from_name(requested)
                    .ok_or_else(|| invalid_edge(kind, lesson.status.name(), requested))?;
                self.change_lesson_status(lesson_id, status)
                    .map(StatusChanged::Lesson)
            }
            EntityKind::Enrollment => {
                let enrollment_id = EnrollmentId(id);
                let enrollment = self.load_enrollment(enrollment_id)?;
                let status = EnrollmentStatus::from_name(requested)
                    .ok_or_else(|| invalid_edge(kind, enrollment.status.name(), requested))?;
                self.change_enrollment_status(enrollment_id, status)
                    .map(StatusChanged::Enrollment)
            }
            EntityKind::Payment => {
                let enrollment_id = EnrollmentId(id);
                let enrollment = self.load_enrollment(enrollment_id)?;
                let status = PaymentStatus::from_name(requested).ok_or_else(|| {
                    invalid_edge(kind, enrollment.payment_status.name(), requested)
                })?;
                self.record_payment_status(enrollment_id, status)
                    .map(StatusChanged::Enrollment)
            }
        }
    }

    // ── Voting ───────────────────────────────────────────────────────

    /// Replace one student's vote set for a course.
    ///
    /// Requires the course to be in TOPIC_VOTING and the student to
    /// hold an ACTIVE enrollment. Resubmission is always safe; the
    /// stored set is replaced wholesale.
    pub fn submit_votes(
        &self,
        student_id: StudentId,
        course_id: CourseId,
        module_ids: &[ModuleId],
    ) -> Result<(), EngineError> {
        let course = self.load_course(course_id)?;
        if course.status != CourseStatus::TopicVoting {
            return Err(VotingError::VotingClosed {
                status: course.status.to_string(),
            }
            .into());
        }
        let actively_enrolled = self
            .store
            .enrollments_of(course.id)?
            .iter()
            .any(|e| e.student_id == student_id && e.status == EnrollmentStatus::Active);
        if !actively_enrolled {
            return Err(VotingError::NotEnrolled {
                student: student_id.to_string(),
            }
            .into());
        }

        let course_modules: HashSet<ModuleId> =
            self.store.modules_of(course.id)?.iter().map(|m| m.id).collect();
        let accepted = validate_ballot(module_ids, &course_modules)?;

        let votes: Vec<TopicVote> = accepted
            .into_iter()
            .map(|module_id| TopicVote {
                student_id,
                course_id: course.id,
                module_id,
            })
            .collect();
        self.store.replace_votes(course.id, student_id, votes)?;
        info!(course = %course.id, student = %student_id, "vote set replaced");
        Ok(())
    }

    /// Finalize a course's voting round: tally, select the winning
    /// modules, and move the course to SCHEDULED, all as one unit.
    pub fn finalize_voting(&self, course_id: CourseId) -> Result<Course, EngineError> {
        let mut course = self.load_course(course_id)?;
        validate(course.status, CourseStatus::Scheduled)?;

        let modules = self.store.modules_of(course.id)?;
        let candidates: Vec<CandidateModule> = modules
            .iter()
            .map(|m| CandidateModule {
                id: m.id,
                order_index: m.order_index,
            })
            .collect();
        let cast: Vec<CastVote> = self
            .store
            .votes_of(course.id)?
            .iter()
            .map(|v| CastVote {
                student: v.student_id,
                module: v.module_id,
            })
            .collect();

        let outcome = select_top(&tally_standings(&candidates, &cast));
        let record = TransitionRecord {
            from_status: course.status,
            to_status: CourseStatus::Scheduled,
            timestamp: Timestamp::now(),
            reason: Some("topic voting finalized".to_string()),
        };
        self.store.apply_finalization(
            course.id,
            &outcome.selected,
            &outcome.rejected,
            CourseStatus::Scheduled,
            record.clone(),
        )?;
        course.transitions.push(record);
        course.status = CourseStatus::Scheduled;
        info!(
            course = %course.id,
            selected = outcome.selected.len(),
            ballots = cast.len(),
            "voting finalized"
        );
        Ok(course)
    }

    // ── Scheduling ───────────────────────────────────────────────────

    /// Generate and persist a course's lesson batch, replacing any
    /// previous batch in full and updating the course's date bounds.
    pub fn generate_schedule(
        &self,
        course_id: CourseId,
        params: &ScheduleParams,
    ) -> Result<Vec<Lesson>, EngineError> {
        let course = self.load_course(course_id)?;
        let topics: Vec<ScheduledTopic> = self
            .store
            .modules_of(course.id)?
            .iter()
            .filter(|m| m.is_selected)
            .map(|m| ScheduledTopic {
                module_id: m.id,
                title: m.title.clone(),
            })
            .collect();

        let descriptors = generate(params, &topics);
        let bounds = date_bounds(&descriptors);
        let lessons: Vec<Lesson> = descriptors
            .into_iter()
            .map(|d| Lesson {
                id: LessonId::new(),
                course_id: course.id,
                module_id: d.module_id,
                lesson_number: d.lesson_number,
                title: d.title,
                scheduled_at: d.scheduled_at,
                duration_minutes: d.duration_minutes,
                status: LessonStatus::Scheduled,
            })
            .collect();

        self.store
            .replace_lessons(course.id, lessons.clone(), bounds)?;
        info!(course = %course.id, lessons = lessons.len(), "lesson schedule generated");
        Ok(lessons)
    }

    // ── Admission ────────────────────────────────────────────────────

    /// Admit one student, creating an ACTIVE enrollment and its paired
    /// progress record.
    pub fn admit(
        &self,
        course_id: CourseId,
        student_id: StudentId,
    ) -> Result<Enrollment, EngineError> {
        let course = self.load_course(course_id)?;
        let student = self.load_student(student_id)?;
        let (capacity, enrollments) = self.capacity_view(&course)?;
        let already_enrolled = enrollments.iter().any(|e| e.student_id == student_id);
        check_single(
            student.id,
            student.school_id,
            course.school_id,
            already_enrolled,
            capacity,
        )?;

        let lesson_count = self.store.lessons_of(course.id)?.len() as u32;
        let seed = initial_progress(lesson_count);
        let enrollment = Enrollment {
            id: EnrollmentId::new(),
            course_id: course.id,
            student_id,
            status: EnrollmentStatus::Active,
            payment_status: seed_payment_status(course.price_cents),
            enrolled_at: Timestamp::now(),
        };
        let progress = Progress {
            student_id,
            course_id: course.id,
            completed_lessons: seed.completed_lessons,
            total_lessons: seed.total_lessons,
        };
        self.store
            .admit_batch(course.id, vec![enrollment.clone()], vec![progress])?;
        info!(course = %course.id, student = %student_id, "student admitted");
        Ok(enrollment)
    }

    /// Admit a batch of students. Already-enrolled students are skipped;
    /// the capacity check is all-or-nothing over the new students, and
    /// the whole batch is written as one unit.
    pub fn admit_bulk(
        &self,
        course_id: CourseId,
        student_ids: &[StudentId],
    ) -> Result<AdmissionReport, EngineError> {
        let course = self.load_course(course_id)?;

        let mut missing = 0usize;
        let mut mismatched: Option<SchoolId> = None;
        for id in student_ids {
            match self.store.student(*id)? {
                None => missing += 1,
                Some(student) if student.school_id != course.school_id => {
                    mismatched.get_or_insert(student.school_id);
                }
                Some(_) => {}
            }
        }
        if missing > 0 {
            return Err(AdmissionError::InvalidStudents { missing }.into());
        }
        if let Some(student_school) = mismatched {
            return Err(AdmissionError::SchoolMismatch {
                student_school,
                course_school: course.school_id,
            }
            .into());
        }

        let (capacity, enrollments) = self.capacity_view(&course)?;
        let enrolled: HashSet<StudentId> =
            enrollments.iter().map(|e| e.student_id).collect();
        let plan = plan_bulk(student_ids, &enrolled, capacity)?;

        let lesson_count = self.store.lessons_of(course.id)?.len() as u32;
        let payment = seed_payment_status(course.price_cents);
        let mut batch = Vec::with_capacity(plan.admit.len());
        let mut progress = Vec::with_capacity(plan.admit.len());
        for student_id in &plan.admit {
            batch.push(Enrollment {
                id: EnrollmentId::new(),
                course_id: course.id,
                student_id: *student_id,
                status: EnrollmentStatus::Active,
                payment_status: payment,
                enrolled_at: Timestamp::now(),
            });
            let seed = initial_progress(lesson_count);
            progress.push(Progress {
                student_id: *student_id,
                course_id: course.id,
                completed_lessons: seed.completed_lessons,
                total_lessons: seed.total_lessons,
            });
        }
        self.store.admit_batch(course.id, batch, progress)?;
        info!(
            course = %course.id,
            enrolled = plan.admit.len(),
            skipped = plan.skipped.len(),
            "bulk admission applied"
        );
        Ok(AdmissionReport {
            enrolled: plan.admit,
            skipped: plan.skipped,
        })
    }

    // ── Deletion ─────────────────────────────────────────────────────

    /// Soft-delete a course. Denied while any enrollment holds a seat.
    pub fn delete_course(&self, course_id: CourseId) -> Result<(), EngineError> {
        let course = self.load_course(course_id)?;
        let active = self
            .store
            .enrollments_of(course.id)?
            .iter()
            .filter(|e| e.status.counts_against_capacity())
            .count();
        if active > 0 {
            return Err(EngineError::HasActiveEnrollments { active });
        }
        self.store.tombstone_course(course.id, Timestamp::now())?;
        info!(course = %course.id, "course tombstoned");
        Ok(())
    }

    // ── Read surface ─────────────────────────────────────────────────

    /// Fetch a course (tombstoned courses read as missing).
    pub fn course(&self, course_id: CourseId) -> Result<Course, EngineError> {
        self.load_course(course_id)
    }

    /// A course's modules, in authoring order.
    pub fn modules(&self, course_id: CourseId) -> Result<Vec<Module>, EngineError> {
        self.load_course(course_id)?;
        Ok(self.store.modules_of(course_id)?)
    }

    /// A course's lessons, in lesson-number order.
    pub fn lessons(&self, course_id: CourseId) -> Result<Vec<Lesson>, EngineError> {
        self.load_course(course_id)?;
        Ok(self.store.lessons_of(course_id)?)
    }

    /// A course's enrollments.
    pub fn enrollments(&self, course_id: CourseId) -> Result<Vec<Enrollment>, EngineError> {
        self.load_course(course_id)?;
        Ok(self.store.enrollments_of(course_id)?)
    }
}

fn invalid_edge(kind: EntityKind, from: &str, to: &str) -> EngineError {
    TransitionError::InvalidTransition {
        kind,
        from: from.to_string(),
        to: to.to_string(),
    }
    .into()
}

// ─── Tests ───────────────────────────────────────────────────────────
