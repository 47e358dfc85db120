//! # Status Transition Validator
//!
//! The shared, table-driven validator for all four entity kinds. A
//! requested edge passes through a two-phase pipeline:
//!
//! 1. **Structural check** — is the requested status in the current
//!    status's successor set? Unknown statuses fail here too.
//! 2. **Guard chain** — the precondition guards declared for the
//!    (entity kind, target status) pair, evaluated in declaration order,
//!    short-circuiting on first failure.
//!
//! A structurally illegal edge never reaches guard evaluation, so the
//! caller gets the sharper INVALID_STATUS_TRANSITION denial and no
//! aggregate counts are consulted needlessly.
//!
//! ## Purity
//!
//! The validator performs no I/O and holds no state. Guards read only
//! the aggregate counts the orchestrator has already loaded into
//! [`GuardContext`]; adding a guard for a new (kind, target) pair means
//! adding one row to `GUARDS`, the transition tables are untouched.

use thiserror::Error;

use courseflow_core::{EntityKind, ReasonCode, MIN_TOPICS_FOR_COURSE};

use crate::course::CourseStatus;
use crate::enrollment::EnrollmentStatus;
use crate::lesson::LessonStatus;
use crate::payment::PaymentStatus;

// ─── Sealed Trait ────────────────────────────────────────────────────

mod private {
    pub trait Sealed {}
    impl Sealed for super::CourseStatus {}
    impl Sealed for super::LessonStatus {}
    impl Sealed for super::EnrollmentStatus {}
    impl Sealed for super::PaymentStatus {}
}

/// Marker trait tying a status enum to its entity kind and transition
/// table.
///
/// Sealed — only the four status enums in this crate implement it.
/// External crates cannot add new lifecycle-managed kinds without going
/// through `EntityKind`, which keeps the validator dispatch exhaustive.
pub trait LifecycleStatus: private::Sealed + Copy + Eq + std::fmt::Debug + 'static {
    /// The entity kind this status enum belongs to.
    const KIND: EntityKind;

    /// Every status of this kind, in canonical order.
    fn all_statuses() -> &'static [Self];

    /// The statuses directly reachable from this one.
    fn successors(&self) -> &'static [Self];

    /// The canonical status name (e.g. `TOPIC_VOTING`).
    fn name(&self) -> &'static str;

    /// Whether this status is terminal (empty successor set).
    fn is_terminal(&self) -> bool {
        self.successors().is_empty()
    }
}

// ─── Errors ──────────────────────────────────────────────────────────

/// A denied transition, with the stable reason code it maps to.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    /// The requested status is not in the current status's successor
    /// set, or one of the supplied status names is unrecognized.
    #[error("invalid {kind} status transition: {from} -> {to}")]
    InvalidTransition {
        /// Entity kind whose table was consulted.
        kind: EntityKind,
        /// Current status as supplied by the caller.
        from: String,
        /// Requested status as supplied by the caller.
        to: String,
    },

    /// Course → TOPIC_VOTING with too few modules.
    #[error("course has {actual} modules, needs at least {required} to open topic voting")]
    InsufficientModules {
        /// The minimum module count.
        required: usize,
        /// The course's current module count.
        actual: usize,
    },

    /// Course → IN_PROGRESS with no lessons scheduled.
    #[error("course has no lessons, generate a schedule before starting")]
    NoLessons,
}

impl TransitionError {
    /// The stable reason code for this denial.
    pub fn reason_code(&self) -> ReasonCode {
        match self {
            Self::InvalidTransition { .. } => ReasonCode::InvalidStatusTransition,
            Self::InsufficientModules { .. } => ReasonCode::InsufficientModules,
            Self::NoLessons => ReasonCode::NoLessons,
        }
    }
}

// ─── Guard Context and Chain ─────────────────────────────────────────

/// Aggregate counts the orchestrator loads before asking for a guarded
/// transition. Guards never query anything themselves.
#[derive(Debug, Clone, Copy, Default)]
pub struct GuardContext {
    /// Number of modules currently authored on the course.
    pub module_count: usize,
    /// Number of lessons currently scheduled on the course.
    pub lesson_count: usize,
}

type Guard = fn(&GuardContext) -> Result<(), TransitionError>;

/// The guard chain, declared per (entity kind, target status name).
/// Evaluation order is declaration order; the first failure wins.
const GUARDS: &[(EntityKind, &str, Guard)] = &[
    (EntityKind::Course, "TOPIC_VOTING", guard_min_modules),
    (EntityKind::Course, "IN_PROGRESS", guard_has_lessons),
];

fn guard_min_modules(ctx: &GuardContext) -> Result<(), TransitionError> {
    if ctx.module_count < MIN_TOPICS_FOR_COURSE {
        return Err(TransitionError::InsufficientModules {
            required: MIN_TOPICS_FOR_COURSE,
            actual: ctx.module_count,
        });
    }
    Ok(())
}

fn guard_has_lessons(ctx: &GuardContext) -> Result<(), TransitionError> {
    if ctx.lesson_count == 0 {
        return Err(TransitionError::NoLessons);
    }
    Ok(())
}

// ─── Validation Entry Points ─────────────────────────────────────────

/// Structural check only: is `requested` in `current`'s successor set?
///
/// Terminal statuses have empty successor sets, so every transition out
/// of them is denied here.
pub fn validate<S: LifecycleStatus>(current: S, requested: S) -> Result<(), TransitionError> {
    if current.successors().contains(&requested) {
        Ok(())
    } else {
        Err(TransitionError::InvalidTransition {
            kind: S::KIND,
            from: current.name().to_string(),
            to: requested.name().to_string(),
        })
    }
}

/// Full pipeline: structural check, then the guard chain for the
/// (kind, target) pair.
pub fn validate_with_guards<S: LifecycleStatus>(
    current: S,
    requested: S,
    ctx: &GuardContext,
) -> Result<(), TransitionError> {
    validate(current, requested)?;
    for (kind, target, guard) in GUARDS {
        if *kind == S::KIND && *target == requested.name() {
            guard(ctx)?;
        }
    }
    Ok(())
}

/// Full pipeline addressed by runtime kind and status names, as the
/// CRUD layer supplies them.
///
/// Unrecognized status names are denied as invalid transitions rather
/// than surfaced as a distinct error: the caller asked for an edge that
/// does not exist in the table, whichever token was at fault.
pub fn validate_named(
    kind: EntityKind,
    current: &str,
    requested: &str,
    ctx: &GuardContext,
) -> Result<(), TransitionError> {
    match kind {
        EntityKind::Course => named_pipeline(CourseStatus::from_name, current, requested, ctx),
        EntityKind::Lesson => named_pipeline(LessonStatus::from_name, current, requested, ctx),
        EntityKind::Enrollment => {
            named_pipeline(EnrollmentStatus::from_name, current, requested, ctx)
        }
        EntityKind::Payment => named_pipeline(PaymentStatus::from_name, current, requested, ctx),
    }
}

fn named_pipeline<S: LifecycleStatus>(
    parse: fn(&str) -> Option<S>,
    current: &str,
    requested: &str,
    ctx: &GuardContext,
) -> Result<(), TransitionError> {
    let invalid = || TransitionError::InvalidTransition {
        kind: S::KIND,
        from: current.to_string(),
        to: requested.to_string(),
    };
    let from = parse(current).ok_or_else(invalid)?;
    let to = parse(requested).ok_or_else(invalid)?;
    validate_with_guards(from, to, ctx)
}

// ─── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn votable() -> GuardContext {
        GuardContext {
            module_count: MIN_TOPICS_FOR_COURSE,
            lesson_count: 0,
        }
    }

    // ── Table-vs-validator equivalence, all four kinds ───────────────

    fn assert_closure<S: LifecycleStatus>() {
        for from in S::all_statuses() {
            for to in S::all_statuses() {
                let allowed = from.successors().contains(to);
                let result = validate(*from, *to);
                assert_eq!(
                    result.is_ok(),
                    allowed,
                    "{:?}: {} -> {} should be {}",
                    S::KIND,
                    from.name(),
                    to.name(),
                    if allowed { "allowed" } else { "denied" }
                );
                if !allowed {
                    assert_eq!(
                        result.unwrap_err().reason_code(),
                        ReasonCode::InvalidStatusTransition
                    );
                }
            }
        }
    }

    #[test]
    fn test_course_closure() {
        assert_closure::<CourseStatus>();
    }

    #[test]
    fn test_lesson_closure() {
        assert_closure::<LessonStatus>();
    }

    #[test]
    fn test_enrollment_closure() {
        assert_closure::<EnrollmentStatus>();
    }

    #[test]
    fn test_payment_closure() {
        assert_closure::<PaymentStatus>();
    }

    // ── Guard evaluation ─────────────────────────────────────────────

    #[test]
    fn test_voting_guard_denies_thin_course() {
        let ctx = GuardContext {
            module_count: MIN_TOPICS_FOR_COURSE - 1,
            lesson_count: 0,
        };
        let err = validate_with_guards(CourseStatus::Draft, CourseStatus::TopicVoting, &ctx)
            .unwrap_err();
        assert_eq!(err.reason_code(), ReasonCode::InsufficientModules);
        match err {
            TransitionError::InsufficientModules { required, actual } => {
                assert_eq!(required, MIN_TOPICS_FOR_COURSE);
                assert_eq!(actual, MIN_TOPICS_FOR_COURSE - 1);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_voting_guard_passes_at_minimum() {
        assert!(
            validate_with_guards(CourseStatus::Draft, CourseStatus::TopicVoting, &votable())
                .is_ok()
        );
    }

    #[test]
    fn test_start_guard_requires_a_lesson() {
        let ctx = GuardContext {
            module_count: MIN_TOPICS_FOR_COURSE,
            lesson_count: 0,
        };
        let err = validate_with_guards(CourseStatus::Scheduled, CourseStatus::InProgress, &ctx)
            .unwrap_err();
        assert_eq!(err.reason_code(), ReasonCode::NoLessons);

        let ctx = GuardContext {
            lesson_count: 1,
            ..ctx
        };
        assert!(
            validate_with_guards(CourseStatus::Scheduled, CourseStatus::InProgress, &ctx).is_ok()
        );
    }

    #[test]
    fn test_structural_check_runs_before_guards() {
        // COMPLETED -> TOPIC_VOTING is structurally illegal; the failing
        // module-count guard must never be consulted.
        let ctx = GuardContext::default();
        let err = validate_with_guards(CourseStatus::Completed, CourseStatus::TopicVoting, &ctx)
            .unwrap_err();
        assert_eq!(err.reason_code(), ReasonCode::InvalidStatusTransition);
    }

    #[test]
    fn test_guards_scoped_to_course_kind() {
        // Lesson SCHEDULED -> REMINDER_SENT carries no guard even with
        // zeroed counts.
        let ctx = GuardContext::default();
        assert!(
            validate_with_guards(LessonStatus::Scheduled, LessonStatus::ReminderSent, &ctx)
                .is_ok()
        );
    }

    #[test]
    fn test_unguarded_course_edges_ignore_context() {
        let ctx = GuardContext::default();
        assert!(validate_with_guards(CourseStatus::Draft, CourseStatus::Cancelled, &ctx).is_ok());
        assert!(
            validate_with_guards(CourseStatus::Completed, CourseStatus::Archived, &ctx).is_ok()
        );
    }

    // ── Named dispatch ───────────────────────────────────────────────

    #[test]
    fn test_named_happy_path() {
        assert!(validate_named(EntityKind::Course, "DRAFT", "TOPIC_VOTING", &votable()).is_ok());
        assert!(validate_named(
            EntityKind::Enrollment,
            "ACTIVE",
            "SUSPENDED",
            &GuardContext::default()
        )
        .is_ok());
        assert!(validate_named(
            EntityKind::Payment,
            "OVERDUE",
            "PAID",
            &GuardContext::default()
        )
        .is_ok());
    }

    #[test]
    fn test_named_denies_illegal_edge() {
        let err = validate_named(
            EntityKind::Course,
            "ARCHIVED",
            "DRAFT",
            &GuardContext::default(),
        )
        .unwrap_err();
        assert_eq!(err.reason_code(), ReasonCode::InvalidStatusTransition);
    }

    #[test]
    fn test_named_denies_unknown_status() {
        for (current, requested) in [("NO_SUCH_STATE", "DRAFT"), ("DRAFT", "NO_SUCH_STATE")] {
            let err = validate_named(
                EntityKind::Course,
                current,
                requested,
                &GuardContext::default(),
            )
            .unwrap_err();
            assert_eq!(err.reason_code(), ReasonCode::InvalidStatusTransition);
        }
    }

    #[test]
    fn test_named_statuses_are_kind_scoped() {
        // TOPIC_VOTING is a course status; the lesson table must not
        // recognize it.
        let err = validate_named(
            EntityKind::Lesson,
            "SCHEDULED",
            "TOPIC_VOTING",
            &GuardContext::default(),
        )
        .unwrap_err();
        assert_eq!(err.reason_code(), ReasonCode::InvalidStatusTransition);
    }

    #[test]
    fn test_named_guard_denial_surfaces_code() {
        let ctx = GuardContext {
            module_count: 3,
            lesson_count: 0,
        };
        let err =
            validate_named(EntityKind::Course, "DRAFT", "TOPIC_VOTING", &ctx).unwrap_err();
        assert_eq!(err.reason_code(), ReasonCode::InsufficientModules);
    }

    // ── Terminal statuses ────────────────────────────────────────────

    #[test]
    fn test_terminal_statuses_deny_everything() {
        fn assert_terminal<S: LifecycleStatus>() {
            for from in S::all_statuses().iter().filter(|s| s.is_terminal()) {
                for to in S::all_statuses() {
                    assert!(validate(*from, *to).is_err());
                }
            }
        }
        assert_terminal::<CourseStatus>();
        assert_terminal::<LessonStatus>();
        assert_terminal::<EnrollmentStatus>();
        assert_terminal::<PaymentStatus>();
    }
}
