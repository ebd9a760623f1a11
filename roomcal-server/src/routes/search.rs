//! Search endpoint

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use chrono::Utc;
use roomcal_core::search::{SearchEngine, SearchOptions, week_start};
use roomcal_core::week::WeekView;
use serde::Deserialize;

use crate::routes::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/search", get(search))
}

#[derive(Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub query: String,
}

/// GET /search?query=... - This week's matching events, bucketed by day
async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<WeekView>, AppError> {
    let config = state.config();
    let monday = week_start(Utc::now(), config.tz()?);
    let options = SearchOptions {
        threshold: config.fuzzy_threshold,
        max_results: config.max_results,
    };

    let store = state.store().await;
    let result = SearchEngine::new(store.records(), monday).filter(&params.query, &options);

    Ok(Json(WeekView::bucket(result, monday)))
}
