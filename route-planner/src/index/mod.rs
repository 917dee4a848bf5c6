//! Stop → line index.
//!
//! The index answers "which lines serve this stop?" under a given
//! [`Policy`](crate::domain::Policy). A stop missing from the index is
//! closed or unknown and cannot be routed to or from.

mod builder;
mod cache;
mod closure;
mod config;

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::domain::{LineName, StopName};

pub use builder::{BuildError, IndexBuilder};
pub use cache::{CacheError, IndexCache};
pub use closure::{BranchOverride, ClosureRule, Segment, closure_contribution, segment_line};
pub use config::IndexConfig;

/// Mapping from stop name to the non-empty set of lines serving it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StopRouteIndex {
    stops: BTreeMap<StopName, BTreeSet<LineName>>,
}

impl StopRouteIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `line` serves `stop`, creating the stop's entry on first use.
    pub fn insert(&mut self, stop: StopName, line: LineName) {
        self.stops.entry(stop).or_default().insert(line);
    }

    /// Union another index into this one.
    pub fn merge(&mut self, other: StopRouteIndex) {
        for (stop, lines) in other.stops {
            self.stops.entry(stop).or_default().extend(lines);
        }
    }

    /// Lines serving a stop, or `None` if the stop is closed or unknown.
    pub fn lines_at(&self, stop: &str) -> Option<&BTreeSet<LineName>> {
        self.stops.get(stop)
    }

    /// Returns true if the stop is open under this index.
    pub fn contains(&self, stop: &str) -> bool {
        self.stops.contains_key(stop)
    }

    /// Iterate over stops and their lines, in stop name order.
    pub fn iter(&self) -> impl Iterator<Item = (&StopName, &BTreeSet<LineName>)> {
        self.stops.iter()
    }

    /// Iterate over stop names, in order.
    pub fn stops(&self) -> impl Iterator<Item = &StopName> {
        self.stops.keys()
    }

    /// Every line appearing in the index.
    pub fn lines(&self) -> BTreeSet<&LineName> {
        self.stops.values().flatten().collect()
    }

    /// Number of open stops.
    pub fn len(&self) -> usize {
        self.stops.len()
    }

    /// Returns true if no stop is open.
    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Returns true if every stop maps to at least one line.
    pub(crate) fn is_well_formed(&self) -> bool {
        self.stops.values().all(|lines| !lines.is_empty())
    }
}
