//! # Route Modules
//!
//! Each module defines an Axum Router for one API surface area.
//! Routers are merged into the application in `lib.rs`.

pub mod courses;
pub mod enrollments;
pub mod schedule;
pub mod votes;
