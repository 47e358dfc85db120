//! # Course Status Machine
//!
//! Models the lifecycle of a course from draft authoring through
//! archival.
//!
//! ## States
//!
//! ```text
//! Draft ──▶ TopicVoting ──▶ Scheduled ──▶ InProgress ──▶ Completed ──▶ Archived
//!   │            │              │              │                          ▲
//!   └────────────┴──────────────┴──────────────┴──▶ Cancelled ────────────┘
//! ```
//!
//! Archival is one-directional: both COMPLETED and CANCELLED courses can
//! be archived, and ARCHIVED is terminal. Entering TOPIC_VOTING and
//! IN_PROGRESS additionally requires the aggregate-count guards declared
//! in `validator.rs`; the table here records reachability only.

use serde::{Deserialize, Serialize};

use crate::validator::LifecycleStatus;
use courseflow_core::EntityKind;

/// The lifecycle status of a course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CourseStatus {
    /// Course is being authored; modules are added and ordered here.
    Draft,
    /// Students are voting on which modules make the final syllabus.
    TopicVoting,
    /// Topics are selected and the lesson schedule can be generated.
    Scheduled,
    /// Lessons are underway.
    InProgress,
    /// All lessons delivered (terminal apart from archival).
    Completed,
    /// Course was called off before completion.
    Cancelled,
    /// Course is archived and immutable (terminal).
    Archived,
}

impl CourseStatus {
    /// All course statuses in canonical order.
    pub fn all() -> &'static [CourseStatus] {
        &[
            Self::Draft,
            Self::TopicVoting,
            Self::Scheduled,
            Self::InProgress,
            Self::Completed,
            Self::Cancelled,
            Self::Archived,
        ]
    }

    /// The statuses directly reachable from this one.
    pub fn successors(&self) -> &'static [CourseStatus] {
        match self {
            Self::Draft => &[Self::TopicVoting, Self::Cancelled],
            Self::TopicVoting => &[Self::Scheduled, Self::Cancelled],
            Self::Scheduled => &[Self::InProgress, Self::Cancelled],
            Self::InProgress => &[Self::Completed, Self::Cancelled],
            Self::Completed => &[Self::Archived],
            Self::Cancelled => &[Self::Archived],
            Self::Archived => &[],
        }
    }

    /// Whether this status is terminal.
    pub fn is_terminal(&self) -> bool {
        self.successors().is_empty()
    }

    /// The canonical status name (e.g. `TOPIC_VOTING`).
    pub fn name(&self) -> &'static str {
        match self {
            Self::Draft => "DRAFT",
            Self::TopicVoting => "TOPIC_VOTING",
            Self::Scheduled => "SCHEDULED",
            Self::InProgress => "IN_PROGRESS",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
            Self::Archived => "ARCHIVED",
        }
    }

    /// Parse a status from its canonical name.
    pub fn from_name(s: &str) -> Option<CourseStatus> {
        Self::all().iter().find(|v| v.name() == s).copied()
    }
}

impl LifecycleStatus for CourseStatus {
    const KIND: EntityKind = EntityKind::Course;

    fn all_statuses() -> &'static [Self] {
        Self::all()
    }

    fn successors(&self) -> &'static [Self] {
        CourseStatus::successors(self)
    }

    fn name(&self) -> &'static str {
        CourseStatus::name(self)
    }
}

impl std::fmt::Display for CourseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
