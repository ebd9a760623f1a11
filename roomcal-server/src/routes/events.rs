//! Event payload endpoints

use axum::{
    Json, Router,
    extract::State,
    http::header,
    response::IntoResponse,
    routing::get,
};
use chrono::{DateTime, Utc};
use roomcal_core::store::CACHE_CONTROL;
use serde::Serialize;

use crate::routes::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/events.json", get(events_json))
        .route("/health", get(health))
}

/// GET /events.json - All records of the current snapshot
async fn events_json(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let body = state.store().await.to_json()?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/json"),
            (header::CACHE_CONTROL, CACHE_CONTROL),
        ],
        body,
    ))
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub records: usize,
    pub refreshed_at: DateTime<Utc>,
}

/// GET /health - Snapshot size and age
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let store = state.store().await;
    Json(HealthResponse {
        status: "ok",
        records: store.len(),
        refreshed_at: store.refreshed_at(),
    })
}

#[cfg(test)]
mod tests {
    use axum::http::{StatusCode, header};

    use crate::routes::test_support::{body_json, get};

    #[tokio::test]
    async fn test_events_json_has_cache_header() {
        let response = get("/events.json").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CACHE_CONTROL).unwrap(),
            "max-age=3600"
        );
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
    }

    #[tokio::test]
    async fn test_events_json_lists_every_record() {
        let body = body_json(get("/events.json").await).await;
        let records = body.as_array().unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(records[0]["location"]["building"], "Exactum");
        assert_eq!(records[0]["location"]["room"], "A123");
        assert!(records[0]["event"]["start"]["date"].is_string());
    }

    #[tokio::test]
    async fn test_health() {
        let body = body_json(get("/health").await).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["records"], 3);
    }
}
