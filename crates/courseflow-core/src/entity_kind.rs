//! # Entity Kinds — Single Source of Truth
//!
//! Defines the `EntityKind` enum naming the four entity kinds whose
//! status is lifecycle-managed: course, lesson, enrollment, payment.
//! This is the ONE definition used across the entire workspace. Every
//! `match` on `EntityKind` must be exhaustive — adding a kind forces
//! every consumer (validator dispatch, CLI, API) to handle it at
//! compile time.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::CoreError;

/// The four entity kinds with a managed status lifecycle.
///
/// Each kind has its own transition table in `courseflow-state`. The
/// CRUD layer addresses kinds by their snake_case string identifier
/// when requesting a status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// A course moving from draft authoring through archival.
    Course,
    /// A lesson moving from scheduled through feedback delivery.
    Lesson,
    /// An enrollment of one student in one course.
    Enrollment,
    /// The payment standing of one enrollment.
    Payment,
}

/// Total number of lifecycle-managed entity kinds.
pub const ENTITY_KIND_COUNT: usize = 4;

impl EntityKind {
    /// Returns all entity kinds in canonical order.
    pub fn all_kinds() -> &'static [EntityKind] {
        &[Self::Course, Self::Lesson, Self::Enrollment, Self::Payment]
    }

    /// Returns the snake_case string identifier for this kind.
    ///
    /// This must match the serde serialization format and the kind
    /// strings accepted by the status-change API.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Course => "course",
            Self::Lesson => "lesson",
            Self::Enrollment => "enrollment",
            Self::Payment => "payment",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = CoreError;

    /// Parse an entity kind from its snake_case string identifier.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "course" => Ok(Self::Course),
            "lesson" => Ok(Self::Lesson),
            "enrollment" => Ok(Self::Enrollment),
            "payment" => Ok(Self::Payment),
            other => Err(CoreError::UnknownEntityKind(other.to_string())),
        }
    }
}
