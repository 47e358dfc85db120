//! # Error Types — Core Error Hierarchy
//!
//! The error type for failures originating in this crate. Domain crates
//! define their own `thiserror` enums and convert into richer aggregate
//! errors at the orchestrator boundary; `CoreError` covers only parsing
//! and construction of the primitives defined here.

use thiserror::Error;

/// Errors produced by `courseflow-core` primitives.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Timestamp construction or parsing failed.
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// An entity-kind string did not match any known kind.
    #[error("unknown entity kind: {0:?}")]
    UnknownEntityKind(String),

    /// A reason-code string did not match any known code.
    #[error("unknown reason code: {0:?}")]
    UnknownReasonCode(String),
}
