//! Line adjacency graph.
//!
//! Nodes are lines; two lines are adjacent for every stop they share. The
//! shared stop labels the edge, since it is where a rider changes. Parallel
//! edges (the same two lines meeting at several stops) are all kept.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::domain::{LineName, StopName};
use crate::index::StopRouteIndex;

/// An edge out of a line: change to `to` at stop `via`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Transfer {
    pub to: LineName,
    pub via: StopName,
}

/// Undirected multigraph of lines connected by shared stops.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineAdjacencyGraph {
    adjacent: BTreeMap<LineName, BTreeSet<Transfer>>,
}

impl LineAdjacencyGraph {
    /// Derive the graph from an index.
    ///
    /// Every stop served by two or more lines adds one edge per unordered
    /// pair of those lines. Work is quadratic in the lines per stop, which
    /// stays small on a rail network.
    pub fn build(index: &StopRouteIndex) -> Self {
        let mut graph = Self::default();

        for (stop, lines) in index.iter() {
            if lines.len() < 2 {
                continue;
            }
            let lines: Vec<&LineName> = lines.iter().collect();
            for (i, a) in lines.iter().enumerate() {
                for b in &lines[i + 1..] {
                    graph.add_edge(a, b, stop);
                }
            }
        }

        graph
    }

    fn add_edge(&mut self, a: &LineName, b: &LineName, via: &StopName) {
        self.adjacent.entry(a.clone()).or_default().insert(Transfer {
            to: b.clone(),
            via: via.clone(),
        });
        self.adjacent.entry(b.clone()).or_default().insert(Transfer {
            to: a.clone(),
            via: via.clone(),
        });
    }

    /// Transfers available from a line, ordered by destination line then stop.
    pub fn transfers_from<'a>(&'a self, line: &str) -> impl Iterator<Item = &'a Transfer> + use<'a> {
        self.adjacent.get(line).into_iter().flatten()
    }

    /// Number of lines with at least one transfer.
    pub fn line_count(&self) -> usize {
        self.adjacent.len()
    }

    /// Number of undirected edges, counting parallel edges separately.
    pub fn edge_count(&self) -> usize {
        self.adjacent.values().map(BTreeSet::len).sum::<usize>() / 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index(entries: &[(&str, &[&str])]) -> StopRouteIndex {
        let mut index = StopRouteIndex::new();
        for (stop, lines) in entries {
            for line in *lines {
                index.insert(StopName::parse(stop).unwrap(), LineName::parse(line).unwrap());
            }
        }
        index
    }

    fn transfers(graph: &LineAdjacencyGraph, line: &str) -> Vec<(String, String)> {
        graph
            .transfers_from(line)
            .map(|t| (t.to.to_string(), t.via.to_string()))
            .collect()
    }

    #[test]
    fn shared_stop_connects_lines_both_ways() {
        let graph = LineAdjacencyGraph::build(&index(&[
            ("Ashmont", &["Red Line", "Mattapan Trolley"]),
            ("Milton", &["Mattapan Trolley"]),
        ]));

        assert_eq!(
            transfers(&graph, "Red Line"),
            [("Mattapan Trolley".to_string(), "Ashmont".to_string())]
        );
        assert_eq!(
            transfers(&graph, "Mattapan Trolley"),
            [("Red Line".to_string(), "Ashmont".to_string())]
        );
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn parallel_edges_kept() {
        let graph = LineAdjacencyGraph::build(&index(&[
            ("State", &["Blue Line", "Orange Line"]),
            ("Haymarket", &["Green Line D", "Orange Line"]),
            ("North Station", &["Green Line D", "Orange Line"]),
        ]));

        assert_eq!(
            transfers(&graph, "Green Line D"),
            [
                ("Orange Line".to_string(), "Haymarket".to_string()),
                ("Orange Line".to_string(), "North Station".to_string()),
            ]
        );
        assert_eq!(graph.edge_count(), 3);
    }

    #[test]
    fn every_pair_at_busy_stop() {
        let graph = LineAdjacencyGraph::build(&index(&[(
            "Park Street",
            &["Green Line B", "Green Line C", "Green Line D", "Red Line"],
        )]));

        assert_eq!(graph.line_count(), 4);
        assert_eq!(graph.edge_count(), 6);
        assert!(graph.transfers_from("Green Line C").any(|t| t.to.as_str() == "Red Line"));
        assert!(graph.transfers_from("Red Line").any(|t| t.to.as_str() == "Green Line B"));
    }

    #[test]
    fn isolated_line_has_no_transfers() {
        let graph = LineAdjacencyGraph::build(&index(&[("Kendall/MIT", &["Red Line-2"])]));
        assert_eq!(graph.line_count(), 0);
        assert_eq!(graph.transfers_from("Red Line-2").count(), 0);
    }
}
