//! # Application State
//!
//! Shared state for the Axum application: the orchestration engine over
//! its store. The demo binary runs on the in-memory store; a production
//! deployment constructs the same state over a row-store-backed
//! implementation.

use std::sync::Arc;

use courseflow_engine::{MemoryStore, Orchestrator};

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    /// The lifecycle orchestrator.
    pub engine: Arc<Orchestrator<MemoryStore>>,
}

impl AppState {
    /// State over a fresh in-memory store.
    pub fn in_memory() -> Self {
        Self {
            engine: Arc::new(Orchestrator::new(MemoryStore::new())),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::in_memory()
    }
}
