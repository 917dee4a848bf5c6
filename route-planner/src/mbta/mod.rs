//! Line and stop data sources.
//!
//! The planner only needs two questions answered: which lines exist, and
//! which stops does a line serve. [`MbtaClient`] asks the MBTA v3 API;
//! [`StaticNetwork`] answers from memory for offline use and tests.

mod client;
mod error;
mod static_network;
mod types;

use std::future::Future;

pub use client::{MbtaClient, MbtaConfig};
pub use error::FetchError;
pub use static_network::{StaticLine, StaticNetwork};

use crate::domain::{Line, LineId, StopName};

/// How a line's stop list should be ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopOrder {
    /// Alphabetical. Enough when only membership matters.
    ByName,
    /// The order stops are served along the line.
    RouteOrder,
}

/// A source of lines and the stops along them.
///
/// Errors propagate to the caller; implementations do not retry.
pub trait DataFetcher {
    /// List every line the planner should consider.
    fn list_lines(&self) -> impl Future<Output = Result<Vec<Line>, FetchError>> + Send;

    /// List the stops served by a line.
    fn list_stops(
        &self,
        line: &LineId,
        order: StopOrder,
    ) -> impl Future<Output = Result<Vec<StopName>, FetchError>> + Send;
}

/// The data source chosen at startup.
#[derive(Debug, Clone)]
pub enum NetworkSource {
    Live(MbtaClient),
    Static(StaticNetwork),
}

impl DataFetcher for NetworkSource {
    async fn list_lines(&self) -> Result<Vec<Line>, FetchError> {
        match self {
            NetworkSource::Live(client) => client.list_lines().await,
            NetworkSource::Static(network) => network.list_lines().await,
        }
    }

    async fn list_stops(&self, line: &LineId, order: StopOrder) -> Result<Vec<StopName>, FetchError> {
        match self {
            NetworkSource::Live(client) => client.list_stops(line, order).await,
            NetworkSource::Static(network) => network.list_stops(line, order).await,
        }
    }
}
