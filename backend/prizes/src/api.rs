//! Axum REST API — routes and handlers for prize proposals.

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::auth::{self, CallerIdentity, TokenVerifier};
use crate::errors::{AppError, Result};
use crate::models::{CreatePrizeProposal, PrizeProposal, ProposalStatus};
use crate::pagination::{infinity_pagination, InfinityPage, PageOptions};
use crate::store::ProposalStore;

pub struct ApiState {
    pub store: ProposalStore,
    pub verifier: Arc<dyn TokenVerifier>,
    /// Callers allowed to approve. Empty lets any authenticated caller approve.
    pub admin_user_ids: Vec<String>,
}

impl ApiState {
    fn can_approve(&self, caller: &CallerIdentity) -> bool {
        self.admin_user_ids.is_empty() || self.admin_user_ids.contains(&caller.user_id)
    }
}

/// Build the application router. Mutating routes sit behind [`auth::require_auth`].
pub fn router(state: Arc<ApiState>) -> Router {
    let guard = middleware::from_fn_with_state(state.clone(), auth::require_auth);

    Router::new()
        .route("/health", get(health))
        .route(
            "/prizes/proposals",
            get(list_proposals).merge(post(create_proposal).route_layer(guard.clone())),
        )
        .route("/prizes/proposals/user/:user_id", get(get_user_proposals))
        .route("/prizes/proposals/:id", get(get_proposal))
        .route(
            "/prizes/proposals/accept/:id",
            post(approve_proposal).route_layer(guard),
        )
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ─────────────────────────────────────────────────────────
// Request / response shapes
// ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub status: Option<ProposalStatus>,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

fn query_error(rejection: QueryRejection) -> AppError {
    AppError::Validation(rejection.body_text())
}

// ─────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────

/// `GET /health`
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// `POST /prizes/proposals`
pub async fn create_proposal(
    State(state): State<Arc<ApiState>>,
    Extension(caller): Extension<CallerIdentity>,
    payload: std::result::Result<Json<CreatePrizeProposal>, JsonRejection>,
) -> Result<(StatusCode, Json<PrizeProposal>)> {
    let Json(payload) = payload.map_err(|e| AppError::Validation(e.body_text()))?;
    info!(caller = %caller.user_id, ?payload, "Received prize proposal");

    let proposal = state.store.create(&payload, &caller.user_id).await?;
    Ok((StatusCode::CREATED, Json(proposal)))
}

/// `GET /prizes/proposals/user/:user_id`
///
/// Proposals owned by one user. `limit` is clamped to 50.
pub async fn get_user_proposals(
    State(state): State<Arc<ApiState>>,
    Path(user_id): Path<String>,
    query: std::result::Result<Query<PageQuery>, QueryRejection>,
) -> Result<Json<InfinityPage<PrizeProposal>>> {
    let Query(query) = query.map_err(query_error)?;
    let options = PageOptions::from_query(query.page, query.limit)?;

    let proposals = state
        .store
        .find_by_user_with_pagination(options, &user_id)
        .await?;
    Ok(Json(infinity_pagination(proposals, options)))
}

/// `GET /prizes/proposals`
///
/// Review queue across all users, optionally filtered by `status`.
pub async fn list_proposals(
    State(state): State<Arc<ApiState>>,
    query: std::result::Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<InfinityPage<PrizeProposal>>> {
    let Query(query) = query.map_err(query_error)?;
    let options = PageOptions::from_query(query.page, query.limit)?;

    let proposals = state
        .store
        .list_with_pagination(options, query.status)
        .await?;
    Ok(Json(infinity_pagination(proposals, options)))
}

/// `GET /prizes/proposals/:id`
pub async fn get_proposal(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
) -> Result<Json<PrizeProposal>> {
    Ok(Json(state.store.find_one(&id).await?))
}

/// `POST /prizes/proposals/accept/:id`
pub async fn approve_proposal(
    State(state): State<Arc<ApiState>>,
    Extension(caller): Extension<CallerIdentity>,
    Path(id): Path<String>,
) -> Result<Json<PrizeProposal>> {
    if !state.can_approve(&caller) {
        return Err(AppError::Forbidden(format!(
            "{} may not approve proposals",
            caller.user_id
        )));
    }
    info!(caller = %caller.user_id, proposal_id = %id, "Approving prize proposal");
    Ok(Json(state.store.approve(&id).await?))
}
