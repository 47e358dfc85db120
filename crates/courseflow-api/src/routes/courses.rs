//! # Course Routes
//!
//! Routes:
//! - POST   /v1/courses — create a course in DRAFT
//! - GET    /v1/courses/{id} — fetch a course
//! - DELETE /v1/courses/{id} — soft-delete (denied while seats are held)
//! - PUT    /v1/courses/{id}/status — lifecycle status change
//! - POST   /v1/courses/{id}/modules — author a module
//! - GET    /v1/courses/{id}/modules — list modules in authoring order
//! - PUT    /v1/courses/{id}/modules/order — replace the module ordering
//! - PUT    /v1/courses/{id}/teachers — replace teacher assignments
//! - POST   /v1/students — provision a student (demo surface)
//! - POST   /v1/teachers — provision a teacher (demo surface)

use std::num::NonZeroU32;

use axum::extract::{Path, State};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::Deserialize;
use uuid::Uuid;

use courseflow_core::{CourseId, EntityKind, ModuleId, SchoolId, StudentId, TeacherId};
use courseflow_engine::{Course, LifecycleStore, Module, Student, StatusChanged, Teacher};

use crate::error::AppError;
use crate::state::AppState;

/// The course surface router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/courses", post(create_course))
        .route("/v1/courses/{id}", get(get_course).delete(delete_course))
        .route("/v1/courses/{id}/status", put(change_status))
        .route("/v1/courses/{id}/modules", post(add_module).get(list_modules))
        .route("/v1/courses/{id}/modules/order", put(reorder_modules))
        .route("/v1/courses/{id}/teachers", put(assign_teachers))
        .route("/v1/students", post(create_student))
        .route("/v1/teachers", post(create_teacher))
}

#[derive(Debug, Deserialize)]
struct CreateCourseRequest {
    school_id: Uuid,
    title: String,
    max_students: u32,
    #[serde(default)]
    price_cents: u64,
}

async fn create_course(
    State(state): State<AppState>,
    Json(req): Json<CreateCourseRequest>,
) -> Result<Json<Course>, AppError> {
    let capacity = NonZeroU32::new(req.max_students)
        .ok_or_else(|| AppError::Validation("max_students must be at least 1".to_string()))?;
    let course = state.engine.create_course(
        SchoolId(req.school_id),
        req.title,
        capacity,
        req.price_cents,
    )?;
    Ok(Json(course))
}

async fn get_course(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Course>, AppError> {
    Ok(Json(state.engine.course(CourseId(id))?))
}

async fn delete_course(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    state.engine.delete_course(CourseId(id))?;
    Ok(Json(serde_json::json!({ "deleted": true })))
}

#[derive(Debug, Deserialize)]
struct ChangeStatusRequest {
    status: String,
    #[serde(default)]
    reason: Option<String>,
}

async fn change_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ChangeStatusRequest>,
) -> Result<Json<StatusChanged>, AppError> {
    let changed = state
        .engine
        .change_status(EntityKind::Course, id, &req.status, req.reason)?;
    Ok(Json(changed))
}

#[derive(Debug, Deserialize)]
struct AddModuleRequest {
    title: String,
}

async fn add_module(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<AddModuleRequest>,
) -> Result<Json<Module>, AppError> {
    Ok(Json(state.engine.add_module(CourseId(id), req.title)?))
}

async fn list_modules(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Module>>, AppError> {
    Ok(Json(state.engine.modules(CourseId(id))?))
}

#[derive(Debug, Deserialize)]
struct ReorderRequest {
    module_ids: Vec<Uuid>,
}

async fn reorder_modules(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ReorderRequest>,
) -> Result<Json<Vec<Module>>, AppError> {
    let ordered: Vec<ModuleId> = req.module_ids.into_iter().map(ModuleId).collect();
    state.engine.reorder_modules(CourseId(id), &ordered)?;
    Ok(Json(state.engine.modules(CourseId(id))?))
}

#[derive(Debug, Deserialize)]
struct AssignTeachersRequest {
    teacher_ids: Vec<Uuid>,
}

async fn assign_teachers(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<AssignTeachersRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let teachers: Vec<TeacherId> = req.teacher_ids.into_iter().map(TeacherId).collect();
    state.engine.assign_teachers(CourseId(id), &teachers)?;
    Ok(Json(serde_json::json!({ "assigned": teachers.len() })))
}

#[derive(Debug, Deserialize)]
struct CreatePersonRequest {
    school_id: Uuid,
    name: String,
}

async fn create_student(
    State(state): State<AppState>,
    Json(req): Json<CreatePersonRequest>,
) -> Result<Json<Student>, AppError> {
    let student = Student {
        id: StudentId::new(),
        school_id: SchoolId(req.school_id),
        name: req.name,
    };
    state
        .engine
        .store()
        .insert_student(student.clone())
        .map_err(courseflow_engine::EngineError::from)?;
    Ok(Json(student))
}

async fn create_teacher(
    State(state): State<AppState>,
    Json(req): Json<CreatePersonRequest>,
) -> Result<Json<Teacher>, AppError> {
    let teacher = Teacher {
        id: TeacherId::new(),
        school_id: SchoolId(req.school_id),
        name: req.name,
    };
    state
        .engine
        .store()
        .insert_teacher(teacher.clone())
        .map_err(courseflow_engine::EngineError::from)?;
    Ok(Json(teacher))
}
