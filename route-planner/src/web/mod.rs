//! Web layer for the route planner.
//!
//! Exposes coarse route queries and the open stops and lines of each
//! policy as JSON over HTTP.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
