//! # Enrollment Routes
//!
//! Routes:
//! - POST /v1/courses/{id}/enrollments — admit one student
//! - POST /v1/courses/{id}/enrollments/bulk — admit a batch
//! - GET  /v1/courses/{id}/enrollments — list a course's enrollments
//! - PUT  /v1/enrollments/{id}/status — enrollment status change
//! - PUT  /v1/enrollments/{id}/payment-status — payment recording

use axum::extract::{Path, State};
use axum::routing::{post, put};
use axum::{Json, Router};
use serde::Deserialize;
use uuid::Uuid;

use courseflow_core::{CourseId, EntityKind, StudentId};
use courseflow_engine::{AdmissionReport, Enrollment, StatusChanged};

use crate::error::AppError;
use crate::state::AppState;

/// The enrollment surface router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/v1/courses/{id}/enrollments",
            post(admit).get(list_enrollments),
        )
        .route("/v1/courses/{id}/enrollments/bulk", post(admit_bulk))
        .route("/v1/enrollments/{id}/status", put(change_enrollment_status))
        .route("/v1/enrollments/{id}/payment-status", put(record_payment))
}

#[derive(Debug, Deserialize)]
struct AdmitRequest {
    student_id: Uuid,
}

async fn admit(
    State(state): State<AppState>,
    Path(course_id): Path<Uuid>,
    Json(req): Json<AdmitRequest>,
) -> Result<Json<Enrollment>, AppError> {
    Ok(Json(state.engine.admit(
        CourseId(course_id),
        StudentId(req.student_id),
    )?))
}

#[derive(Debug, Deserialize)]
struct AdmitBulkRequest {
    student_ids: Vec<Uuid>,
}

async fn admit_bulk(
    State(state): State<AppState>,
    Path(course_id): Path<Uuid>,
    Json(req): Json<AdmitBulkRequest>,
) -> Result<Json<AdmissionReport>, AppError> {
    let students: Vec<StudentId> = req.student_ids.into_iter().map(StudentId).collect();
    Ok(Json(
        state.engine.admit_bulk(CourseId(course_id), &students)?,
    ))
}

async fn list_enrollments(
    State(state): State<AppState>,
    Path(course_id): Path<Uuid>,
) -> Result<Json<Vec<Enrollment>>, AppError> {
    Ok(Json(state.engine.enrollments(CourseId(course_id))?))
}

#[derive(Debug, Deserialize)]
struct ChangeStatusRequest {
    status: String,
}

async fn change_enrollment_status(
    State(state): State<AppState>,
    Path(enrollment_id): Path<Uuid>,
    Json(req): Json<ChangeStatusRequest>,
) -> Result<Json<StatusChanged>, AppError> {
    Ok(Json(state.engine.change_status(
        EntityKind::Enrollment,
        enrollment_id,
        &req.status,
        None,
    )?))
}

async fn record_payment(
    State(state): State<AppState>,
    Path(enrollment_id): Path<Uuid>,
    Json(req): Json<ChangeStatusRequest>,
) -> Result<Json<StatusChanged>, AppError> {
    Ok(Json(state.engine.change_status(
        EntityKind::Payment,
        enrollment_id,
        &req.status,
        None,
    )?))
}
