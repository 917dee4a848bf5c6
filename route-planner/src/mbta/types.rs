//! MBTA v3 API response types.
//!
//! The API speaks JSON:API: every response is a `data` array of resources,
//! each with an `id` and an `attributes` object. Only the fields the
//! planner needs are modelled.

use serde::Deserialize;
use tracing::debug;

use crate::domain::{Line, LineId, LineName, StopName};

/// A JSON:API collection response.
#[derive(Debug, Deserialize)]
pub struct Collection<A> {
    pub data: Vec<Resource<A>>,
}

/// A single JSON:API resource.
#[derive(Debug, Deserialize)]
pub struct Resource<A> {
    pub id: String,
    pub attributes: A,
}

/// Route attributes.
#[derive(Debug, Deserialize)]
pub struct RouteAttributes {
    pub long_name: String,
}

/// Stop attributes.
#[derive(Debug, Deserialize)]
pub struct StopAttributes {
    pub name: String,
}

/// Convert a routes response into lines, dropping resources with unusable
/// identifiers or names.
pub fn into_lines(routes: Collection<RouteAttributes>) -> Vec<Line> {
    routes
        .data
        .into_iter()
        .filter_map(|route| {
            let id = LineId::parse(&route.id).ok();
            let name = LineName::parse(route.attributes.long_name.trim()).ok();
            match (id, name) {
                (Some(id), Some(name)) => Some(Line::new(id, name)),
                _ => {
                    debug!(route = %route.id, "skipping route with invalid id or name");
                    None
                }
            }
        })
        .collect()
}

/// Convert a stops response into stop names, preserving response order.
pub fn into_stop_names(stops: Collection<StopAttributes>) -> Vec<StopName> {
    stops
        .data
        .into_iter()
        .filter_map(|stop| match StopName::parse_normalized(&stop.attributes.name) {
            Ok(name) => Some(name),
            Err(_) => {
                debug!(stop = %stop.id, "skipping stop with invalid name");
                None
            }
        })
        .collect()
}
