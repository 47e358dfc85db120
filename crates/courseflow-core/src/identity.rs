//! # Domain Identity Newtypes
//!
//! Newtype wrappers for all domain identifiers in Courseflow. These
//! prevent accidental identifier confusion — you cannot pass a
//! `StudentId` where a `CourseId` is expected.
//!
//! Identifiers render as `kind:uuid` (e.g. `course:7f3a…`) so log lines
//! and error messages are unambiguous about which namespace an id
//! belongs to.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Defines a UUID-backed identifier newtype with constructor, accessor,
/// and a namespaced `Display` implementation.
macro_rules! define_id {
    ($(#[$doc:meta])* $name:ident, $prefix:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Generate a new random identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Access the inner UUID.
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, concat!($prefix, ":{}"), self.0)
            }
        }
    };
}

define_id!(
    /// Unique identifier for a school (tenant).
    SchoolId,
    "school"
);

define_id!(
    /// Unique identifier for a course.
    CourseId,
    "course"
);

define_id!(
    /// Unique identifier for a course module (topic).
    ModuleId,
    "module"
);

define_id!(
    /// Unique identifier for a lesson.
    LessonId,
    "lesson"
);

define_id!(
    /// Unique identifier for a student.
    StudentId,
    "student"
);

define_id!(
    /// Unique identifier for a teacher.
    TeacherId,
    "teacher"
);

define_id!(
    /// Unique identifier for an enrollment (one student in one course).
    EnrollmentId,
    "enrollment"
);

define_id!(
    /// Unique identifier for a payment against an enrollment.
    PaymentId,
    "payment"
);
