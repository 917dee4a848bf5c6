//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::Policy;
use crate::query::CoarseRoute;

/// Request for a coarse route between two stops.
#[derive(Debug, Deserialize)]
pub struct RouteRequest {
    /// Origin stop name
    pub from: String,

    /// Destination stop name
    pub to: String,

    /// `nominal` or `closure` (defaults to nominal)
    pub policy: Option<String>,
}

/// Request naming only a policy.
#[derive(Debug, Default, Deserialize)]
pub struct PolicyRequest {
    pub policy: Option<String>,
}

/// A coarse route together with the query that produced it.
#[derive(Debug, Serialize)]
pub struct RouteResponse {
    pub from: String,
    pub to: String,
    pub policy: Policy,

    #[serde(flatten)]
    pub route: CoarseRoute,
}

/// Stops open under a policy, sorted by name.
#[derive(Debug, Serialize)]
pub struct StopsResponse {
    pub policy: Policy,
    pub stops: Vec<String>,
}

/// Lines (or sub-lines) present under a policy, sorted by name.
#[derive(Debug, Serialize)]
pub struct LinesResponse {
    pub policy: Policy,
    pub lines: Vec<String>,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}
