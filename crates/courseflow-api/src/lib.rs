//! # courseflow-api — Axum API Services
//!
//! The HTTP surface of the Courseflow lifecycle core, built on
//! Axum/Tower/Tokio. Assembles the route modules into one application
//! with request tracing.
//!
//! ## Routes
//!
//! - `/v1/courses/*` — authoring, status changes, deletion
//! - `/v1/courses/{id}/votes/*` — vote submission and finalization
//! - `/v1/courses/{id}/schedule`, `/v1/lessons/*` — schedule generation
//!   and lesson status
//! - `/v1/courses/{id}/enrollments/*`, `/v1/enrollments/*` — admission,
//!   withdrawal, payment recording
//!
//! ## Crate Policy
//!
//! - No business logic in route handlers — every handler deserializes,
//!   delegates to the orchestrator, and serializes.
//! - All denials map to structured HTTP responses via `AppError`,
//!   carrying the stable reason code alongside the message.

pub mod error;
pub mod routes;
pub mod state;

use axum::Router;
use tower_http::trace::TraceLayer;

pub use error::AppError;
pub use state::AppState;

/// Assemble the application router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(routes::courses::router())
        .merge(routes::votes::router())
        .merge(routes::schedule::router())
        .merge(routes::enrollments::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve the application on `addr` until the process is stopped.
pub async fn serve(addr: std::net::SocketAddr, state: AppState) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "courseflow api listening");
    axum::serve(listener, app(state)).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn call(
        app: &Router,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let request = match body {
            Some(value) => Request::builder()
                .method(method)
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(value.to_string()))
                .unwrap(),
            None => Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        };
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    #[tokio::test]
    async fn test_full_lifecycle_over_http() {
        let app = app(AppState::in_memory());
        let school = uuid::Uuid::new_v4();

        // Provision a student and author a course with ten modules.
        let (status, student) = call(
            &app,
            Method::POST,
            "/v1/students",
            Some(json!({ "school_id": school, "name": "Dana" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let student_id = student["id"].as_str().unwrap().to_string();

        let (status, course) = call(
            &app,
            Method::POST,
            "/v1/courses",
            Some(json!({
                "school_id": school,
                "title": "Spanish B1",
                "max_students": 20,
                "price_cents": 0,
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let course_id = course["id"].as_str().unwrap().to_string();

        let mut module_ids = Vec::new();
        for i in 0..10 {
            let (status, module) = call(
                &app,
                Method::POST,
                &format!("/v1/courses/{course_id}/modules"),
                Some(json!({ "title": format!("Topic {i}") })),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
            module_ids.push(module["id"].as_str().unwrap().to_string());
        }

        // Admit, open voting, vote, finalize.
        let (status, _) = call(
            &app,
            Method::POST,
            &format!("/v1/courses/{course_id}/enrollments"),
            Some(json!({ "student_id": student_id })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = call(
            &app,
            Method::PUT,
            &format!("/v1/courses/{course_id}/status"),
            Some(json!({ "status": "TOPIC_VOTING" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = call(
            &app,
            Method::PUT,
            &format!("/v1/courses/{course_id}/votes/{student_id}"),
            Some(json!({ "module_ids": &module_ids[..8] })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, finalized) = call(
            &app,
            Method::POST,
            &format!("/v1/courses/{course_id}/votes/finalize"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(finalized["status"], "SCHEDULED");

        // Generate a schedule from a Monday with defaults.
        let (status, lessons) = call(
            &app,
            Method::POST,
            &format!("/v1/courses/{course_id}/schedule"),
            Some(json!({ "start_date": "2026-09-07" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let lessons = lessons.as_array().unwrap();
        assert_eq!(lessons.len(), 10);
        assert_eq!(lessons[0]["title"], "Introduction");
        assert_eq!(lessons[9]["title"], "Conclusion");

        // Start the course now that lessons exist.
        let (status, started) = call(
            &app,
            Method::PUT,
            &format!("/v1/courses/{course_id}/status"),
            Some(json!({ "status": "IN_PROGRESS" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(started["status"], "IN_PROGRESS");
    }

    #[tokio::test]
    async fn test_denials_map_to_reason_codes() {
        let app = app(AppState::in_memory());
        let school = uuid::Uuid::new_v4();

        let (_, course) = call(
            &app,
            Method::POST,
            "/v1/courses",
            Some(json!({
                "school_id": school,
                "title": "Spanish B1",
                "max_students": 1,
            })),
        )
        .await;
        let course_id = course["id"].as_str().unwrap().to_string();

        // Structural denial: DRAFT -> COMPLETED.
        let (status, body) = call(
            &app,
            Method::PUT,
            &format!("/v1/courses/{course_id}/status"),
            Some(json!({ "status": "COMPLETED" })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["reason"], "INVALID_STATUS_TRANSITION");

        // Guard denial: voting with zero modules.
        let (status, body) = call(
            &app,
            Method::PUT,
            &format!("/v1/courses/{course_id}/status"),
            Some(json!({ "status": "TOPIC_VOTING" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["reason"], "INSUFFICIENT_MODULES");

        // Unknown course: 404.
        let missing = uuid::Uuid::new_v4();
        let (status, body) = call(&app, Method::GET, &format!("/v1/courses/{missing}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["reason"], "NOT_FOUND");

        // Request validation: zero capacity.
        let (status, _) = call(
            &app,
            Method::POST,
            "/v1/courses",
            Some(json!({
                "school_id": school,
                "title": "Empty",
                "max_students": 0,
            })),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }
}
