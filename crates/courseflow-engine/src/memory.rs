//! # In-Memory Store
//!
//! The reference `LifecycleStore` implementation: a single mutex over
//! plain maps. Every trait call holds the lock for its whole duration,
//! so each write method is trivially one atomic unit and admissions are
//! fully serialized (stricter than the contract requires).
//!
//! Used by the engine tests, the CLI preview, and the demo API; a
//! production deployment supplies a row-store-backed implementation
//! instead.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use courseflow_core::{
    CourseId, EnrollmentId, LessonId, ModuleId, StudentId, TeacherId, Timestamp,
};
use courseflow_state::{CourseStatus, EnrollmentStatus, LessonStatus, PaymentStatus};

use crate::model::{
    Course, Enrollment, Lesson, Module, Progress, Student, Teacher, TopicVote, TransitionRecord,
};
use crate::store::{LifecycleStore, StoreError};

#[derive(Debug, Default)]
struct MemoryInner {
    courses: HashMap<CourseId, Course>,
    modules: HashMap<ModuleId, Module>,
    lessons: HashMap<LessonId, Lesson>,
    enrollments: HashMap<EnrollmentId, Enrollment>,
    progress: Vec<Progress>,
    votes: Vec<TopicVote>,
    students: HashMap<StudentId, Student>,
    teachers: HashMap<TeacherId, Teacher>,
    assignments: HashMap<CourseId, Vec<TeacherId>>,
}

/// Mutex-backed in-memory store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<MemoryInner>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryInner>, StoreError> {
        self.inner
            .lock()
            .map_err(|_| StoreError::Backend("store mutex poisoned".to_string()))
    }
}

impl LifecycleStore for MemoryStore {
    // ── Reads ────────────────────────────────────────────────────────

    fn course(&self, id: CourseId) -> Result<Option<Course>, StoreError> {
        Ok(self.lock()?.courses.get(&id).cloned())
    }

    fn modules_of(&self, course: CourseId) -> Result<Vec<Module>, StoreError> {
        let inner = self.lock()?;
        let mut modules: Vec<Module> = inner
            .modules
            .values()
            .filter(|m| m.course_id == course)
            .cloned()
            .collect();
        modules.sort_by_key(|m| m.order_index);
        Ok(modules)
    }

    fn lessons_of(&self, course: CourseId) -> Result<Vec<Lesson>, StoreError> {
        let inner = self.lock()?;
        let mut lessons: Vec<Lesson> = inner
            .lessons
            .values()
            .filter(|l| l.course_id == course)
            .cloned()
            .collect();
        lessons.sort_by_key(|l| l.lesson_number);
        Ok(lessons)
    }

    fn lesson(&self, id: LessonId) -> Result<Option<Lesson>, StoreError> {
        Ok(self.lock()?.lessons.get(&id).cloned())
    }

    fn enrollments_of(&self, course: CourseId) -> Result<Vec<Enrollment>, StoreError> {
        let inner = self.lock()?;
        let mut rows: Vec<Enrollment> = inner
            .enrollments
            .values()
            .filter(|e| e.course_id == course)
            .cloned()
            .collect();
        rows.sort_by_key(|e| e.enrolled_at);
        Ok(rows)
    }

    fn enrollment(&self, id: EnrollmentId) -> Result<Option<Enrollment>, StoreError> {
        Ok(self.lock()?.enrollments.get(&id).cloned())
    }

    fn votes_of(&self, course: CourseId) -> Result<Vec<TopicVote>, StoreError> {
        let inner = self.lock()?;
        Ok(inner
            .votes
            .iter()
            .filter(|v| v.course_id == course)
            .copied()
            .collect())
    }

    fn progress_of(&self, course: CourseId) -> Result<Vec<Progress>, StoreError> {
        let inner = self.lock()?;
        Ok(inner
            .progress
            .iter()
            .filter(|p| p.course_id == course)
            .copied()
            .collect())
    }

    fn student(&self, id: StudentId) -> Result<Option<Student>, StoreError> {
        Ok(self.lock()?.students.get(&id).cloned())
    }

    fn teacher(&self, id: TeacherId) -> Result<Option<Teacher>, StoreError> {
        Ok(self.lock()?.teachers.get(&id).cloned())
    }

    fn teacher_assignments_of(&self, course: CourseId) -> Result<Vec<TeacherId>, StoreError> {
        Ok(self
            .lock()?
            .assignments
            .get(&course)
            .cloned()
            .unwrap_or_default())
    }

    // ── Atomic writes ────────────────────────────────────────────────

    fn insert_course(&self, course: Course) -> Result<(), StoreError> {
        self.lock()?.courses.insert(course.id, course);
        Ok(())
    }

    fn insert_module(&self, module: Module) -> Result<(), StoreError> {
        self.lock()?.modules.insert(module.id, module);
        Ok(())
    }

    fn insert_student(&self, student: Student) -> Result<(), StoreError> {
        self.lock()?.students.insert(student.id, student);
        Ok(())
    }

    fn insert_teacher(&self, teacher: Teacher) -> Result<(), StoreError> {
        self.lock()?.teachers.insert(teacher.id, teacher);
        Ok(())
    }

    fn set_course_status(
        &self,
        id: CourseId,
        status: CourseStatus,
        record: TransitionRecord,
    ) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        let course = inner
            .courses
            .get_mut(&id)
            .ok_or_else(|| StoreError::Backend(format!("course {id} not present")))?;
        course.transitions.push(record);
        course.status = status;
        Ok(())
    }

    fn replace_votes(
        &self,
        course: CourseId,
        student: StudentId,
        votes: Vec<TopicVote>,
    ) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        inner
            .votes
            .retain(|v| !(v.course_id == course && v.student_id == student));
        inner.votes.extend(votes);
        Ok(())
    }

    fn apply_finalization(
        &self,
        course: CourseId,
        selected: &[ModuleId],
        rejected: &[ModuleId],
        status: CourseStatus,
        record: TransitionRecord,
    ) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        for id in selected {
            if let Some(module) = inner.modules.get_mut(id) {
                module.is_selected = true;
            }
        }
        for id in rejected {
            if let Some(module) = inner.modules.get_mut(id) {
                module.is_selected = false;
            }
        }
        let row = inner
            .courses
            .get_mut(&course)
            .ok_or_else(|| StoreError::Backend(format!("course {course} not present")))?;
        row.transitions.push(record);
        row.status = status;
        Ok(())
    }

    fn replace_lessons(
        &self,
        course: CourseId,
        lessons: Vec<Lesson>,
        bounds: Option<(Timestamp, Timestamp)>,
    ) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        inner.lessons.retain(|_, l| l.course_id != course);
        for lesson in lessons {
            inner.lessons.insert(lesson.id, lesson);
        }
        let row = inner
            .courses
            .get_mut(&course)
            .ok_or_else(|| StoreError::Backend(format!("course {course} not present")))?;
        row.start_date = bounds.map(|(start, _)| start);
        row.end_date = bounds.map(|(_, end)| end);
        Ok(())
    }

    fn set_lesson_status(&self, id: LessonId, status: LessonStatus) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        let lesson = inner
            .lessons
            .get_mut(&id)
            .ok_or_else(|| StoreError::Backend(format!("lesson {id} not present")))?;
        lesson.status = status;
        Ok(())
    }

    fn admit_batch(
        &self,
        _course: CourseId,
        enrollments: Vec<Enrollment>,
        progress: Vec<Progress>,
    ) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        for enrollment in enrollments {
            inner.enrollments.insert(enrollment.id, enrollment);
        }
        inner.progress.extend(progress);
        Ok(())
    }

    fn set_enrollment_status(
        &self,
        id: EnrollmentId,
        status: EnrollmentStatus,
    ) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        let enrollment = inner
            .enrollments
            .get_mut(&id)
            .ok_or_else(|| StoreError::Backend(format!("enrollment {id} not present")))?;
        enrollment.status = status;
        Ok(())
    }

    fn set_payment_status(
        &self,
        id: EnrollmentId,
        status: PaymentStatus,
    ) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        let enrollment = inner
            .enrollments
            .get_mut(&id)
            .ok_or_else(|| StoreError::Backend(format!("enrollment {id} not present")))?;
        enrollment.payment_status = status;
        Ok(())
    }

    fn replace_teacher_assignments(
        &self,
        course: CourseId,
        teachers: Vec<TeacherId>,
    ) -> Result<(), StoreError> {
        self.lock()?.assignments.insert(course, teachers);
        Ok(())
    }

    fn reorder_modules(&self, course: CourseId, ordered: Vec<ModuleId>) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        for (index, id) in ordered.iter().enumerate() {
            let module = inner
                .modules
                .get_mut(id)
                .filter(|m| m.course_id == course)
                .ok_or_else(|| StoreError::Backend(format!("module {id} not present")))?;
            module.order_index = index as u32;
        }
        Ok(())
    }

    fn tombstone_course(&self, id: CourseId, at: Timestamp) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        let course = inner
            .courses
            .get_mut(&id)
            .ok_or_else(|| StoreError::Backend(format!("course {id} not present")))?;
        course.deleted_at = Some(at);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use courseflow_core::SchoolId;

    fn seeded_course(store: &MemoryStore) -> Course {
        let course = Course::new(SchoolId::new(), "Spanish B1".into(), 20, 0);
        store.insert_course(course.clone()).unwrap();
        course
    }

    #[test]
    fn test_modules_sorted_by_order_index() {
        let store = MemoryStore::new();
        let course = seeded_course(&store);
        for index in [2u32, 0, 1] {
            store
                .insert_module(Module {
                    id: ModuleId::new(),
                    course_id: course.id,
                    title: format!("Topic {index}"),
                    order_index: index,
                    is_selected: false,
                })
                .unwrap();
        }
        let modules = store.modules_of(course.id).unwrap();
        let indices: Vec<u32> = modules.iter().map(|m| m.order_index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn test_replace_votes_is_wholesale() {
        let store = MemoryStore::new();
        let course = seeded_course(&store);
        let student = StudentId::new();
        let first = vec![TopicVote {
            student_id: student,
            course_id: course.id,
            module_id: ModuleId::new(),
        }];
        let second = vec![
            TopicVote {
                student_id: student,
                course_id: course.id,
                module_id: ModuleId::new(),
            },
            TopicVote {
                student_id: student,
                course_id: course.id,
                module_id: ModuleId::new(),
            },
        ];
        store.replace_votes(course.id, student, first).unwrap();
        store
            .replace_votes(course.id, student, second.clone())
            .unwrap();
        let stored = store.votes_of(course.id).unwrap();
        assert_eq!(stored, second);
    }

    #[test]
    fn test_replace_votes_leaves_other_students_untouched() {
        let store = MemoryStore::new();
        let course = seeded_course(&store);
        let alice = StudentId::new();
        let bob = StudentId::new();
        let bob_vote = TopicVote {
            student_id: bob,
            course_id: course.id,
            module_id: ModuleId::new(),
        };
        store.replace_votes(course.id, bob, vec![bob_vote]).unwrap();
        store.replace_votes(course.id, alice, vec![]).unwrap();
        assert_eq!(store.votes_of(course.id).unwrap(), vec![bob_vote]);
    }

    #[test]
    fn test_replace_lessons_discards_previous_batch() {
        let store = MemoryStore::new();
        let course = seeded_course(&store);
        let make_lesson = |n: u32| Lesson {
            id: LessonId::new(),
            course_id: course.id,
            module_id: None,
            lesson_number: n,
            title: format!("Lesson {n}"),
            scheduled_at: Timestamp::now(),
            duration_minutes: 60,
            status: LessonStatus::Scheduled,
        };
        store
            .replace_lessons(course.id, vec![make_lesson(1), make_lesson(2)], None)
            .unwrap();
        let replacement = vec![make_lesson(1)];
        let bounds = (replacement[0].scheduled_at, replacement[0].scheduled_at);
        store
            .replace_lessons(course.id, replacement.clone(), Some(bounds))
            .unwrap();
        assert_eq!(store.lessons_of(course.id).unwrap(), replacement);
        let reloaded = store.course(course.id).unwrap().unwrap();
        assert_eq!(reloaded.start_date, Some(bounds.0));
        assert_eq!(reloaded.end_date, Some(bounds.1));
    }

    #[test]
    fn test_set_course_status_appends_record() {
        let store = MemoryStore::new();
        let course = seeded_course(&store);
        store
            .set_course_status(
                course.id,
                CourseStatus::Cancelled,
                TransitionRecord {
                    from_status: CourseStatus::Draft,
                    to_status: CourseStatus::Cancelled,
                    timestamp: Timestamp::now(),
                    reason: None,
                },
            )
            .unwrap();
        let reloaded = store.course(course.id).unwrap().unwrap();
        assert_eq!(reloaded.status, CourseStatus::Cancelled);
        assert_eq!(reloaded.transitions.len(), 1);
    }

    #[test]
    fn test_reorder_modules_assigns_dense_indices() {
        let store = MemoryStore::new();
        let course = seeded_course(&store);
        let ids: Vec<ModuleId> = (0..3)
            .map(|index| {
                let id = ModuleId::new();
                store
                    .insert_module(Module {
                        id,
                        course_id: course.id,
                        title: format!("Topic {index}"),
                        order_index: index,
                        is_selected: false,
                    })
                    .unwrap();
                id
            })
            .collect();
        store
            .reorder_modules(course.id, vec![ids[2], ids[0], ids[1]])
            .unwrap();
        let modules = store.modules_of(course.id).unwrap();
        assert_eq!(modules[0].id, ids[2]);
        assert_eq!(modules[1].id, ids[0]);
        assert_eq!(modules[2].id, ids[1]);
        let indices: Vec<u32> = modules.iter().map(|m| m.order_index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn test_tombstone_preserves_row() {
        let store = MemoryStore::new();
        let course = seeded_course(&store);
        store.tombstone_course(course.id, Timestamp::now()).unwrap();
        let reloaded = store.course(course.id).unwrap().unwrap();
        assert!(reloaded.is_deleted());
    }
}
