use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use crate::render::{self, series};
use crate::services::{DashboardLoader, LoadMoreError, SectionKind, SectionState};
use super::websocket::ws_handler;

pub struct AppState {
    pub loader: Arc<DashboardLoader>,
}

/// GET / - rendered dashboard page
async fn index(State(state): State<Arc<AppState>>) -> Html<String> {
    let dashboard = state.loader.dashboard();
    Html(render::render_page(&dashboard.snapshot(), state.loader.queries().recent_swaps))
}

/// GET /api/swaps - feed state plus buckets from this render pass
async fn get_swaps(State(state): State<Arc<AppState>>) -> Json<Value> {
    let dashboard = state.loader.dashboard();
    let section = dashboard.swaps.state();
    let derived = section.data().map(|feed| {
        let buckets = dashboard.aggregator().aggregate(&feed.swaps);
        json!({
            "policy": dashboard.aggregator().policy().describe(),
            "series": series::swap_volume_series(&buckets),
            "cards": series::swap_cards(feed, &buckets),
            "averages": buckets.iter().map(|b| b.average_usd()).collect::<Vec<f64>>(),
            "buckets": buckets,
        })
    });
    Json(json!({ "section": section, "derived": derived }))
}

/// GET /api/tokens
async fn get_tokens(State(state): State<Arc<AppState>>) -> Json<Value> {
    let section = state.loader.dashboard().tokens.state();
    let series = section.data().map(|t| series::token_volume_series(&t.records));
    Json(json!({ "section": section, "series": series }))
}

/// GET /api/pools
async fn get_pools(State(state): State<Arc<AppState>>) -> Json<Value> {
    let section = state.loader.dashboard().pools.state();
    let series = section.data().map(|p| series::pool_volume_series(&p.records));
    Json(json!({ "section": section, "series": series }))
}

/// GET /api/protocol
async fn get_protocol(State(state): State<Arc<AppState>>) -> Json<Value> {
    let section = state.loader.dashboard().protocol.state();
    let charts = section.data().map(|d| series::protocol_series(&d.records));
    let cards = section.data().map(|d| series::protocol_cards(&d.records));
    Json(json!({ "section": section, "series": charts, "cards": cards }))
}

/// POST /api/swaps/more - append the next swap page
async fn load_more(State(state): State<Arc<AppState>>) -> Response {
    match state.loader.load_more_swaps().await {
        Ok(added) => Json(json!({ "added": added })).into_response(),
        Err(e @ (LoadMoreError::NotLoaded | LoadMoreError::Superseded)) => {
            (StatusCode::CONFLICT, Json(json!({ "error": e.to_string() }))).into_response()
        }
        Err(e) => {
            tracing::warn!("Load more failed: {}", e);
            (StatusCode::BAD_GATEWAY, Json(json!({ "error": e.to_string() }))).into_response()
        }
    }
}

/// POST /api/sections/:section/reload - manual re-fetch of one section
async fn reload(
    State(state): State<Arc<AppState>>,
    Path(section): Path<String>,
) -> Response {
    let kind: SectionKind = match section.parse() {
        Ok(kind) => kind,
        Err(e) => return (StatusCode::NOT_FOUND, Json(json!({ "error": e }))).into_response(),
    };
    state.loader.reload(kind).await;
    Json(json!({ "section": kind, "status": state.loader.dashboard().status(kind) })).into_response()
}

/// GET /health
async fn health() -> &'static str {
    "OK"
}

/// GET /stats
async fn stats(State(state): State<Arc<AppState>>) -> Json<Value> {
    let dashboard = state.loader.dashboard();
    let statuses: serde_json::Map<String, Value> = SectionKind::ALL
        .iter()
        .map(|k| (k.to_string(), json!(dashboard.status(*k))))
        .collect();
    let swaps = match dashboard.swaps.state() {
        SectionState::Succeeded { data } => data.swaps.len(),
        _ => 0,
    };

    Json(json!({
        "cached_responses": state.loader.cache().len(),
        "swaps_loaded": swaps,
        "settled": dashboard.is_settled(),
        "sections": statuses,
    }))
}

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/swaps", get(get_swaps))
        .route("/api/swaps/more", post(load_more))
        .route("/api/tokens", get(get_tokens))
        .route("/api/pools", get(get_pools))
        .route("/api/protocol", get(get_protocol))
        .route("/api/sections/:section/reload", post(reload))
        .route("/health", get(health))
        .route("/stats", get(stats))
        .route("/ws", get(ws_handler))
        .with_state(state)
}
