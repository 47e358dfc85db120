//! # Voting Routes
//!
//! Routes:
//! - PUT  /v1/courses/{id}/votes/{student_id} — replace a student's vote set
//! - POST /v1/courses/{id}/votes/finalize — tally, select, move to SCHEDULED
//!
//! The student id arrives already authorization-checked by the calling
//! layer; this surface only enforces the voting-phase business rules.

use axum::extract::{Path, State};
use axum::routing::{post, put};
use axum::{Json, Router};
use serde::Deserialize;
use uuid::Uuid;

use courseflow_core::{CourseId, ModuleId, StudentId};
use courseflow_engine::Course;

use crate::error::AppError;
use crate::state::AppState;

/// The voting surface router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/courses/{id}/votes/{student_id}", put(submit_votes))
        .route("/v1/courses/{id}/votes/finalize", post(finalize_voting))
}

#[derive(Debug, Deserialize)]
struct SubmitVotesRequest {
    module_ids: Vec<Uuid>,
}

async fn submit_votes(
    State(state): State<AppState>,
    Path((course_id, student_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<SubmitVotesRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let modules: Vec<ModuleId> = req.module_ids.into_iter().map(ModuleId).collect();
    state
        .engine
        .submit_votes(StudentId(student_id), CourseId(course_id), &modules)?;
    Ok(Json(serde_json::json!({ "accepted": modules.len() })))
}

async fn finalize_voting(
    State(state): State<AppState>,
    Path(course_id): Path<Uuid>,
) -> Result<Json<Course>, AppError> {
    Ok(Json(state.engine.finalize_voting(CourseId(course_id))?))
}
