//! # Lesson Status Machine
//!
//! Models the delivery pipeline of a single lesson, from its scheduled
//! slot through reminder and question collection to feedback delivery.
//!
//! ## States
//!
//! ```text
//! Scheduled ──▶ ReminderSent ──▶ QuestionsRequested ──▶ QuestionsReady
//!     │              │                   │                    │
//!     │              │                   │                    ▼
//!     │              │                   │               InProgress
//!     │              │                   │                    │
//!     └──────────────┴───────────────────┴──▶ Cancelled ◀─────┤
//!                                                             ▼
//!                            Completed ──▶ FeedbackPending ──▶ FeedbackSent
//! ```
//!
//! The chain is strictly sequential: reminder dispatch, question
//! collection, and feedback automation each key off the previous stage
//! having happened. CANCELLED is reachable from the first five states
//! only; a completed lesson can no longer be cancelled, it can only run
//! out its feedback tail. FEEDBACK_SENT and CANCELLED are terminal.

use serde::{Deserialize, Serialize};

use crate::validator::LifecycleStatus;
use courseflow_core::EntityKind;

/// The delivery status of a lesson.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LessonStatus {
    /// Lesson has a scheduled slot and nothing has happened yet.
    Scheduled,
    /// The reminder for the upcoming lesson went out.
    ReminderSent,
    /// Students were asked to submit questions.
    QuestionsRequested,
    /// The question set was compiled for the teacher.
    QuestionsReady,
    /// The lesson is being delivered.
    InProgress,
    /// Delivery finished.
    Completed,
    /// Feedback collection is open.
    FeedbackPending,
    /// Feedback was delivered (terminal).
    FeedbackSent,
    /// Lesson was called off before completion (terminal).
    Cancelled,
}

impl LessonStatus {
    /// All lesson statuses in canonical order.
    pub fn all() -> &'static [LessonStatus] {
        &[
            Self::Scheduled,
            Self::ReminderSent,
            Self::QuestionsRequested,
            Self::QuestionsReady,
            Self::InProgress,
            Self::Completed,
            Self::FeedbackPending,
            Self::FeedbackSent,
            Self::Cancelled,
        ]
    }

    /// The statuses directly reachable from this one.
    pub fn successors(&self) -> &'static [LessonStatus] {
        match self {
            Self::Scheduled => &[Self::ReminderSent, Self::Cancelled],
            Self::ReminderSent => &[Self::QuestionsRequested, Self::Cancelled],
            Self::QuestionsRequested => &[Self::QuestionsReady, Self::Cancelled],
            Self::QuestionsReady => &[Self::InProgress, Self::Cancelled],
            Self::InProgress => &[Self::Completed, Self::Cancelled],
            Self::Completed => &[Self::FeedbackPending],
            Self::FeedbackPending => &[Self::FeedbackSent],
            Self::FeedbackSent => &[],
            Self::Cancelled => &[],
        }
    }

    /// Whether this status is terminal.
    pub fn is_terminal(&self) -> bool {
        self.successors().is_empty()
    }

    /// The canonical status name (e.g. `REMINDER_SENT`).
    pub fn name(&self) -> &'static str {
        match self {
            Self::Scheduled => "SCHEDULED",
            Self::ReminderSent => "REMINDER_SENT",
            Self::QuestionsRequested => "QUESTIONS_REQUESTED",
            Self::QuestionsReady => "QUESTIONS_READY",
            Self::InProgress => "IN_PROGRESS",
            Self::Completed => "COMPLETED",
            Self::FeedbackPending => "FEEDBACK_PENDING",
            Self::FeedbackSent => "FEEDBACK_SENT",
            Self::Cancelled => "CANCELLED",
        }
    }

    /// Parse a status from its canonical name.
    pub fn from_name(s: &str) -> Option<LessonStatus> {
        Self::all().iter().find(|v| v.name() == s).copied()
    }
}

impl LifecycleStatus for LessonStatus {
    const KIND: EntityKind = EntityKind::Lesson;

    fn all_statuses() -> &'static [Self] {
        Self::all()
    }

    fn successors(&self) -> &'static [Self] {
        LessonStatus::successors(self)
    }

    fn name(&self) -> &'static str {
        LessonStatus::name(self)
    }
}

impl std::fmt::Display for LessonStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
