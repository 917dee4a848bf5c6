//! HTTP route handlers.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use tracing::{error, warn};

use crate::domain::{Policy, UnknownPolicy};
use crate::index::BuildError;
use crate::query::RouteNetwork;

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/route", get(find_route))
        .route("/stops", get(list_stops))
        .route("/lines", get(list_lines))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Find the coarse route between two stops.
///
/// An infeasible route is still a successful response; its `failure`
/// field says why.
async fn find_route(
    State(state): State<AppState>,
    Query(req): Query<RouteRequest>,
) -> Result<Json<RouteResponse>, AppError> {
    let policy = parse_policy(req.policy.as_deref())?;
    let route = state
        .router
        .find_coarse_route(&req.from, &req.to, policy)
        .await?;

    Ok(Json(RouteResponse {
        from: req.from,
        to: req.to,
        policy,
        route,
    }))
}

/// List the stops open under a policy.
async fn list_stops(
    State(state): State<AppState>,
    Query(req): Query<PolicyRequest>,
) -> Result<Json<StopsResponse>, AppError> {
    let (policy, network) = network_for(&state, &req).await?;
    let stops = network.index.stops().map(|s| s.to_string()).collect();
    Ok(Json(StopsResponse { policy, stops }))
}

/// List the lines present under a policy.
async fn list_lines(
    State(state): State<AppState>,
    Query(req): Query<PolicyRequest>,
) -> Result<Json<LinesResponse>, AppError> {
    let (policy, network) = network_for(&state, &req).await?;
    let lines = network
        .index
        .lines()
        .into_iter()
        .map(|l| l.to_string())
        .collect();
    Ok(Json(LinesResponse { policy, lines }))
}

async fn network_for(
    state: &AppState,
    req: &PolicyRequest,
) -> Result<(Policy, Arc<RouteNetwork>), AppError> {
    let policy = parse_policy(req.policy.as_deref())?;
    let network = state.router.network(policy).await?;
    Ok((policy, network))
}

fn parse_policy(raw: Option<&str>) -> Result<Policy, AppError> {
    raw.map_or(Ok(Policy::default()), str::parse)
        .map_err(|e: UnknownPolicy| AppError::BadRequest {
            message: e.to_string(),
        })
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    BadGateway { message: String },
}

impl From<Arc<BuildError>> for AppError {
    fn from(e: Arc<BuildError>) -> Self {
        AppError::BadGateway {
            message: e.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => {
                warn!(%message, "bad request");
                (StatusCode::BAD_REQUEST, message)
            }
            AppError::BadGateway { message } => {
                error!(%message, "route network unavailable");
                (StatusCode::BAD_GATEWAY, message)
            }
        };

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
