//! # Schedule Routes
//!
//! Routes:
//! - POST /v1/courses/{id}/schedule — generate and persist the lesson batch
//! - GET  /v1/courses/{id}/lessons — list the current batch
//! - PUT  /v1/lessons/{id}/status — lesson delivery status change
//!
//! Generation parameters default to the platform configuration:
//! `frequency="weekly"`, `preferred_time="10:00"`, `skip_weekends=true`,
//! `number_of_lessons=10`, `duration=60`.

use axum::extract::{Path, State};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use uuid::Uuid;

use courseflow_core::{CourseId, EntityKind};
use courseflow_engine::{Lesson, StatusChanged};
use courseflow_schedule::{Frequency, ScheduleParams};

use crate::error::AppError;
use crate::state::AppState;

/// The scheduling surface router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/courses/{id}/schedule", post(generate_schedule))
        .route("/v1/courses/{id}/lessons", get(list_lessons))
        .route("/v1/lessons/{id}/status", put(change_lesson_status))
}

#[derive(Debug, Deserialize)]
struct GenerateScheduleRequest {
    /// First candidate date, `YYYY-MM-DD`.
    start_date: NaiveDate,
    #[serde(default = "default_frequency")]
    frequency: String,
    #[serde(default = "default_time")]
    preferred_time: String,
    #[serde(default = "default_skip_weekends")]
    skip_weekends: bool,
    #[serde(default = "default_lessons")]
    number_of_lessons: u32,
    #[serde(default = "default_duration")]
    duration: u32,
}

fn default_frequency() -> String {
    "weekly".to_string()
}

fn default_time() -> String {
    "10:00".to_string()
}

fn default_skip_weekends() -> bool {
    true
}

fn default_lessons() -> u32 {
    10
}

fn default_duration() -> u32 {
    60
}

impl GenerateScheduleRequest {
    fn into_params(self) -> Result<ScheduleParams, AppError> {
        let frequency: Frequency = self
            .frequency
            .parse()
            .map_err(|e| AppError::Validation(format!("{e}")))?;
        let time_of_day = NaiveTime::parse_from_str(&self.preferred_time, "%H:%M")
            .map_err(|_| {
                AppError::Validation(format!(
                    "preferred_time must be HH:MM, got {:?}",
                    self.preferred_time
                ))
            })?;
        Ok(ScheduleParams {
            start_date: self.start_date,
            frequency,
            time_of_day,
            skip_weekends: self.skip_weekends,
            lesson_count: self.number_of_lessons,
            duration_minutes: self.duration,
        })
    }
}

async fn generate_schedule(
    State(state): State<AppState>,
    Path(course_id): Path<Uuid>,
    Json(req): Json<GenerateScheduleRequest>,
) -> Result<Json<Vec<Lesson>>, AppError> {
    let params = req.into_params()?;
    Ok(Json(
        state.engine.generate_schedule(CourseId(course_id), &params)?,
    ))
}

async fn list_lessons(
    State(state): State<AppState>,
    Path(course_id): Path<Uuid>,
) -> Result<Json<Vec<Lesson>>, AppError> {
    Ok(Json(state.engine.lessons(CourseId(course_id))?))
}

#[derive(Debug, Deserialize)]
struct ChangeStatusRequest {
    status: String,
}

async fn change_lesson_status(
    State(state): State<AppState>,
    Path(lesson_id): Path<Uuid>,
    Json(req): Json<ChangeStatusRequest>,
) -> Result<Json<StatusChanged>, AppError> {
    Ok(Json(state.engine.change_status(
        EntityKind::Lesson,
        lesson_id,
        &req.status,
        None,
    )?))
}
