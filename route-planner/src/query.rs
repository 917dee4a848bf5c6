//! Coarse route queries.
//!
//! [`find_coarse_route`] answers one query against a built network.
//! [`CoarseRouter`] builds networks on demand, one per policy, and keeps
//! them for reuse.

use std::sync::Arc;

use moka::future::Cache as MokaCache;
use serde::Serialize;
use tracing::info;

use crate::domain::{Policy, StopName};
use crate::graph::LineAdjacencyGraph;
use crate::index::{BuildError, IndexBuilder, IndexConfig, StopRouteIndex};
use crate::mbta::DataFetcher;
use crate::planner::{PathFinder, PathStep, SearchOutcome};

/// Index and adjacency graph for one policy.
#[derive(Debug)]
pub struct RouteNetwork {
    pub policy: Policy,
    pub index: StopRouteIndex,
    pub graph: LineAdjacencyGraph,
}

impl RouteNetwork {
    /// Derive the adjacency graph and bundle it with its index.
    pub fn new(policy: Policy, index: StopRouteIndex) -> Self {
        let graph = LineAdjacencyGraph::build(&index);
        Self {
            policy,
            index,
            graph,
        }
    }

    /// Search for a minimum-transfer path.
    pub fn find(&self, from: &StopName, to: &StopName) -> SearchOutcome {
        PathFinder::new(&self.index, &self.graph).find(from, to)
    }
}

/// Why a route is infeasible.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RouteFailure {
    /// The stop is closed under this policy, or does not exist.
    UnknownStop { stop: String },
    /// Both stops are open but not connected.
    NoPath,
}

/// Answer to a coarse route query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoarseRoute {
    pub feasible: bool,
    pub steps: Vec<PathStep>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<RouteFailure>,
}

impl CoarseRoute {
    fn found(steps: Vec<PathStep>) -> Self {
        Self {
            feasible: true,
            steps,
            failure: None,
        }
    }

    fn failed(failure: RouteFailure) -> Self {
        Self {
            feasible: false,
            steps: Vec::new(),
            failure: Some(failure),
        }
    }

    /// Number of line changes, or `None` if infeasible.
    pub fn transfers(&self) -> Option<usize> {
        self.feasible.then(|| self.steps.len().saturating_sub(1))
    }
}

impl From<SearchOutcome> for CoarseRoute {
    fn from(outcome: SearchOutcome) -> Self {
        match outcome {
            SearchOutcome::Found(steps) => CoarseRoute::found(steps),
            SearchOutcome::UnknownStop(stop) => CoarseRoute::failed(RouteFailure::UnknownStop {
                stop: stop.to_string(),
            }),
            SearchOutcome::NoPath => CoarseRoute::failed(RouteFailure::NoPath),
        }
    }
}

/// Find the coarse route between two stops named by the rider.
///
/// Surrounding whitespace is ignored. A name that is not a valid stop name
/// is reported as an unknown stop.
pub fn find_coarse_route(stop_a: &str, stop_b: &str, network: &RouteNetwork) -> CoarseRoute {
    let from = match StopName::parse_normalized(stop_a) {
        Ok(stop) => stop,
        Err(_) => {
            return CoarseRoute::failed(RouteFailure::UnknownStop {
                stop: stop_a.to_string(),
            });
        }
    };
    let to = match StopName::parse_normalized(stop_b) {
        Ok(stop) => stop,
        Err(_) => {
            return CoarseRoute::failed(RouteFailure::UnknownStop {
                stop: stop_b.to_string(),
            });
        }
    };

    network.find(&from, &to).into()
}

/// Builds and keeps one [`RouteNetwork`] per policy.
///
/// Concurrent first requests for the same policy share a single build.
pub struct CoarseRouter<F> {
    fetcher: F,
    config: IndexConfig,
    networks: MokaCache<Policy, Arc<RouteNetwork>>,
}

impl<F: DataFetcher + Sync> CoarseRouter<F> {
    /// Create a router. Nothing is fetched until the first query.
    pub fn new(fetcher: F, config: IndexConfig) -> Self {
        Self {
            fetcher,
            config,
            networks: MokaCache::builder()
                .max_capacity(Policy::ALL.len() as u64)
                .build(),
        }
    }

    /// The network for a policy, building it on first use.
    pub async fn network(&self, policy: Policy) -> Result<Arc<RouteNetwork>, Arc<BuildError>> {
        self.networks
            .try_get_with(policy, async {
                let index = IndexBuilder::new(&self.fetcher, &self.config)
                    .build(policy)
                    .await?;
                let network = RouteNetwork::new(policy, index);
                info!(
                    %policy,
                    stops = network.index.len(),
                    lines = network.index.lines().len(),
                    connected_lines = network.graph.line_count(),
                    transfers = network.graph.edge_count(),
                    "route network ready"
                );
                Ok::<_, BuildError>(Arc::new(network))
            })
            .await
    }

    /// Find the coarse route between two stops under a policy.
    ///
    /// Fails only if the network for the policy cannot be built.
    pub async fn find_coarse_route(
        &self,
        stop_a: &str,
        stop_b: &str,
        policy: Policy,
    ) -> Result<CoarseRoute, Arc<BuildError>> {
        let network = self.network(policy).await?;
        Ok(find_coarse_route(stop_a, stop_b, &network))
    }
}

#[cfg(test)]
#[path = "query_tests.rs"]
mod tests;
