//! Minimum-transfer search.
//!
//! Breadth-first search over the line adjacency graph. Lines are explored
//! in order of the number of changes needed to reach them, so the first
//! destination line dequeued ends a path with the fewest possible changes.

use std::collections::{BTreeSet, VecDeque};

use tracing::debug;

use crate::domain::{LineName, StopName};
use crate::graph::LineAdjacencyGraph;
use crate::index::StopRouteIndex;

use super::tree::{PathStep, PathTree};

/// Result of a search. Every terminal condition is a value, never a panic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// A minimum-transfer path. Empty when origin and destination coincide.
    Found(Vec<PathStep>),
    /// The stop is closed or unknown under the current policy. The origin
    /// is reported if both endpoints are unknown.
    UnknownStop(StopName),
    /// Both stops are open but no sequence of lines connects them.
    NoPath,
}

/// Finds minimum-transfer paths between stops.
pub struct PathFinder<'a> {
    index: &'a StopRouteIndex,
    graph: &'a LineAdjacencyGraph,
}

impl<'a> PathFinder<'a> {
    /// Create a path finder over an index and the graph derived from it.
    pub fn new(index: &'a StopRouteIndex, graph: &'a LineAdjacencyGraph) -> Self {
        Self { index, graph }
    }

    /// Find a path from `from` to `to` with the fewest line changes.
    ///
    /// Origin lines and transfers are taken in line name order, so ties
    /// between equally short paths always resolve the same way.
    pub fn find(&self, from: &StopName, to: &StopName) -> SearchOutcome {
        let Some(origin_lines) = self.index.lines_at(from.as_str()) else {
            return SearchOutcome::UnknownStop(from.clone());
        };
        let Some(destination_lines) = self.index.lines_at(to.as_str()) else {
            return SearchOutcome::UnknownStop(to.clone());
        };

        if from == to {
            return SearchOutcome::Found(Vec::new());
        }

        if let Some(shared) = origin_lines.intersection(destination_lines).next() {
            return SearchOutcome::Found(vec![PathStep {
                line: shared.clone(),
                boarded_at: from.clone(),
                transferred_from: None,
            }]);
        }

        self.breadth_first(from, origin_lines, destination_lines)
    }

    fn breadth_first(
        &self,
        from: &StopName,
        origin_lines: &BTreeSet<LineName>,
        destination_lines: &BTreeSet<LineName>,
    ) -> SearchOutcome {
        let mut tree = PathTree::new();
        let mut frontier = VecDeque::new();
        let mut explored: BTreeSet<LineName> = BTreeSet::new();

        for line in origin_lines {
            frontier.push_back(tree.push_root(line.clone(), from.clone()));
        }

        while let Some(node) = frontier.pop_front() {
            let line = tree.line(node).clone();

            // A line can be queued once per discovering neighbour; only the
            // first, which carries the earliest parent, is expanded.
            if !explored.insert(line.clone()) {
                continue;
            }

            if destination_lines.contains(&line) {
                debug!(
                    lines_explored = explored.len(),
                    nodes = tree.len(),
                    "path found"
                );
                return SearchOutcome::Found(tree.path_to(node));
            }

            for transfer in self.graph.transfers_from(line.as_str()) {
                if !explored.contains(&transfer.to) {
                    frontier.push_back(tree.push_child(
                        node,
                        transfer.to.clone(),
                        transfer.via.clone(),
                    ));
                }
            }
        }

        debug!(
            lines_explored = explored.len(),
            nodes = tree.len(),
            "frontier exhausted without reaching destination"
        );
        SearchOutcome::NoPath
    }
}

#[cfg(test)]
#[path = "search_tests.rs"]
mod tests;
