//! JSON HTTP surface over one session: the presentation layer's view of the core.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::catalog::{load_catalog_default, Catalog, Item, SkippedRecord};
use crate::config::AssistantConfig;
use crate::insights::TagInsight;
use crate::learn::{ActionType, InteractionPayload, LearnError, TrackOutcome};
use crate::preferences::UserPreferences;
use crate::recommend::SkippedItem;
use crate::session::{Session, SessionHandle};

#[derive(Clone)]
pub struct AppState {
    pub session: SessionHandle,
    pub catalog: Arc<Catalog>,
    pub simulate_limit: usize,
}

impl AppState {
    pub fn new(cfg: &AssistantConfig, catalog: Catalog) -> Self {
        Self {
            session: SessionHandle::new(Session::from_config(cfg)),
            catalog: Arc::new(catalog),
            simulate_limit: cfg.simulate_limit,
        }
    }

    /// Resolve config and catalog from env/files (see `config` and `catalog`).
    pub fn from_env() -> anyhow::Result<Self> {
        let cfg = AssistantConfig::load_default()?;
        let catalog = load_catalog_default(cfg.catalog.path.as_deref())?;
        Ok(Self::new(&cfg, catalog))
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/catalog", get(catalog_summary))
        .route("/recommendations", get(recommendations))
        .route("/preferences", get(get_preferences).put(put_preferences))
        .route("/weights", get(weights))
        .route("/interactions", post(track_interaction))
        .route("/simulate", post(simulate))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

/// Request failure rendered as `{ "error": ... }`.
#[derive(Debug)]
pub enum ApiError {
    /// Well-formed body that fails event validation (422).
    Invalid(LearnError),
    /// Body axum could not decode; keeps the rejection's status.
    Body(JsonRejection),
}

impl From<LearnError> for ApiError {
    fn from(e: LearnError) -> Self {
        Self::Invalid(e)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(e: JsonRejection) -> Self {
        Self::Body(e)
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            ApiError::Invalid(e) => (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()),
            ApiError::Body(rej) => (rej.status(), rej.body_text()),
        };
        (status, Json(ErrorBody { error })).into_response()
    }
}

#[derive(Serialize)]
struct CatalogOut {
    items: usize,
    skipped: Vec<SkippedRecord>,
}

async fn catalog_summary(State(state): State<AppState>) -> Json<CatalogOut> {
    Json(CatalogOut {
        items: state.catalog.len(),
        skipped: state.catalog.skipped.clone(),
    })
}

#[derive(Deserialize)]
struct RecommendationsQuery {
    #[serde(default)]
    limit: Option<usize>,
}

#[derive(Serialize)]
struct RecommendationOut {
    rank: usize,
    item: Item,
    base_score: f32,
    adjusted_score: f32,
    delta: f32,
    highlighted_tags: Vec<String>,
}

#[derive(Serialize)]
struct RecommendationsOut {
    recommendations: Vec<RecommendationOut>,
    skipped: Vec<SkippedItem>,
    disqualified: usize,
}

async fn recommendations(
    State(state): State<AppState>,
    Query(q): Query<RecommendationsQuery>,
) -> Json<RecommendationsOut> {
    let session = state.session.read();
    let ranking = session.recommend(&state.catalog.items);
    let limit = q.limit.unwrap_or(usize::MAX);

    let recommendations = ranking
        .recommendations
        .iter()
        .take(limit)
        .enumerate()
        .map(|(i, r)| RecommendationOut {
            rank: i + 1,
            item: r.item.clone(),
            base_score: r.base_score,
            adjusted_score: r.adjusted_score,
            delta: r.delta(),
            highlighted_tags: r.highlighted_tags.clone(),
        })
        .collect();

    Json(RecommendationsOut {
        recommendations,
        skipped: ranking.skipped,
        disqualified: ranking.disqualified,
    })
}

async fn get_preferences(State(state): State<AppState>) -> Json<UserPreferences> {
    Json(state.session.read().preferences().clone())
}

async fn put_preferences(
    State(state): State<AppState>,
    payload: Result<Json<UserPreferences>, JsonRejection>,
) -> Result<Json<UserPreferences>, ApiError> {
    let Json(prefs) = payload?;
    let mut session = state.session.write();
    session.set_preferences(prefs);
    info!(target: "api", priorities = ?session.preferences().priority_order, "preferences updated");
    Ok(Json(session.preferences().clone()))
}

#[derive(Serialize)]
struct WeightsOut {
    weights: BTreeMap<String, f32>,
    insights: Vec<TagInsight>,
}

async fn weights(State(state): State<AppState>) -> Json<WeightsOut> {
    let session = state.session.read();
    Json(WeightsOut {
        weights: session.get_weights(),
        insights: session.insights(),
    })
}

async fn track_interaction(
    State(state): State<AppState>,
    payload: Result<Json<InteractionPayload>, JsonRejection>,
) -> Result<Json<TrackOutcome>, ApiError> {
    let Json(payload) = payload?;
    let out = state.session.write().track_payload(payload)?;
    Ok(Json(out))
}

#[derive(Deserialize)]
struct SimulateReq {
    tag: String,
    action: String,
    #[serde(default)]
    limit: Option<usize>,
}

#[derive(Serialize)]
struct SimulateOut {
    applied: usize,
    weights: BTreeMap<String, f32>,
}

async fn simulate(
    State(state): State<AppState>,
    req: Result<Json<SimulateReq>, JsonRejection>,
) -> Result<Json<SimulateOut>, ApiError> {
    let Json(req) = req?;
    let action = req.action.parse::<ActionType>().map_err(LearnError::from)?;
    let limit = req.limit.unwrap_or(state.simulate_limit);

    let mut session = state.session.write();
    let applied = session.simulate(&state.catalog.items, &req.tag, action, limit)?;
    Ok(Json(SimulateOut {
        applied,
        weights: session.get_weights(),
    }))
}
