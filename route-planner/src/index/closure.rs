//! Closure policy: closed stops and line segmentation.
//!
//! Under closure a line is cut at every closed stop. Each maximal run of
//! consecutive open stops becomes a sub-line named `{line}-{run}`, with runs
//! numbered from 0 in stop order. Closed stops are dropped from the index.
//!
//! Stop order is linear, but some lines branch. After a junction the
//! upstream ordering lists one branch then the other, so the first stops of
//! the second branch look adjacent to the end of the first. The
//! [`BranchOverride`] table fixes this by hand: an overridden stop also
//! joins the sub-line of its anchor stop.

use std::collections::BTreeSet;

use crate::domain::{LineName, StopName};

use super::StopRouteIndex;

/// Decides which stops are closed.
///
/// A stop is closed when any whitespace-delimited word of its name starts
/// with one of the trigger characters. Matching is case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClosureRule {
    triggers: BTreeSet<char>,
}

impl ClosureRule {
    /// Create a rule closing stops with a word starting with any of `triggers`.
    pub fn new(triggers: impl IntoIterator<Item = char>) -> Self {
        Self {
            triggers: triggers.into_iter().collect(),
        }
    }

    /// Returns true if the stop is closed under this rule.
    pub fn is_closed(&self, stop: &StopName) -> bool {
        stop.words()
            .filter_map(|word| word.chars().next())
            .any(|first| self.triggers.contains(&first))
    }
}

impl Default for ClosureRule {
    /// Closes every stop with a word starting with C, O, V, I or D.
    fn default() -> Self {
        Self::new("COVID".chars())
    }
}

/// Manual branch topology fix for one stop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchOverride {
    /// Display name of the line the override applies to.
    pub line: LineName,
    /// The stop that gains an extra sub-line.
    pub stop: StopName,
    /// The stop whose sub-line is added.
    pub anchor: StopName,
}

impl BranchOverride {
    /// Build an override from string literals.
    ///
    /// Returns `None` if any name is invalid.
    pub fn new(line: &str, stop: &str, anchor: &str) -> Option<Self> {
        Some(Self {
            line: LineName::parse(line).ok()?,
            stop: StopName::parse(stop).ok()?,
            anchor: StopName::parse(anchor).ok()?,
        })
    }

    /// Overrides for the MBTA rapid-transit network.
    ///
    /// The Red Line splits at JFK/UMass into the Ashmont and Braintree
    /// branches. Route order lists Ashmont first, so the Braintree branch
    /// appears to continue from Ashmont. Every Braintree-branch stop is
    /// anchored back to JFK/UMass.
    pub fn mbta_defaults() -> Vec<BranchOverride> {
        [
            ("Red Line", "North Quincy", "JFK/UMass"),
            ("Red Line", "Wollaston", "JFK/UMass"),
            ("Red Line", "Quincy Center", "JFK/UMass"),
            ("Red Line", "Quincy Adams", "JFK/UMass"),
            ("Red Line", "Braintree", "JFK/UMass"),
        ]
        .into_iter()
        .filter_map(|(line, stop, anchor)| BranchOverride::new(line, stop, anchor))
        .collect()
    }
}

/// A maximal run of consecutive open stops on one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// Sub-line name, `{line}-{run}`.
    pub line: LineName,
    /// Stops in route order.
    pub stops: Vec<StopName>,
}

/// Split an ordered stop list into runs of open stops.
pub fn segment_line(line: &LineName, stops: &[StopName], rule: &ClosureRule) -> Vec<Segment> {
    let mut segments: Vec<Segment> = Vec::new();
    let mut current: Vec<StopName> = Vec::new();

    for stop in stops {
        if rule.is_closed(stop) {
            if !current.is_empty() {
                segments.push(Segment {
                    line: line.segment(segments.len()),
                    stops: std::mem::take(&mut current),
                });
            }
            continue;
        }
        current.push(stop.clone());
    }

    if !current.is_empty() {
        segments.push(Segment {
            line: line.segment(segments.len()),
            stops: current,
        });
    }

    segments
}

/// Index entries one line contributes under the closure policy.
///
/// Overrides for other lines are ignored, as are overrides whose stop or
/// anchor is closed or not on this line.
pub fn closure_contribution(
    line: &LineName,
    stops: &[StopName],
    rule: &ClosureRule,
    overrides: &[BranchOverride],
) -> StopRouteIndex {
    let segments = segment_line(line, stops, rule);
    let mut index = StopRouteIndex::new();

    for segment in &segments {
        for stop in &segment.stops {
            index.insert(stop.clone(), segment.line.clone());
        }
    }

    for fix in overrides.iter().filter(|o| &o.line == line) {
        if !index.contains(fix.stop.as_str()) {
            continue;
        }
        let anchor_segment = segments
            .iter()
            .find(|segment| segment.stops.contains(&fix.anchor));
        if let Some(segment) = anchor_segment {
            index.insert(fix.stop.clone(), segment.line.clone());
        }
    }

    index
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    /// Stop lists where names starting with 'X' are closed.
    fn stop_list() -> impl Strategy<Value = Vec<StopName>> {
        proptest::collection::vec("[A-Z][a-z]{0,3}", 0..30).prop_map(|names| {
            names
                .iter()
                .enumerate()
                .map(|(i, n)| StopName::parse(&format!("{n}{i}")).unwrap())
                .collect()
        })
    }

    proptest! {
        /// Every open stop lands in exactly one segment; closed stops in none.
        #[test]
        fn open_stops_partitioned(stops in stop_list()) {
            let rule = ClosureRule::new(['X']);
            let line = LineName::parse("L").unwrap();
            let segments = segment_line(&line, &stops, &rule);

            for stop in &stops {
                let count = segments.iter().filter(|s| s.stops.contains(stop)).count();
                if rule.is_closed(stop) {
                    prop_assert_eq!(count, 0);
                } else {
                    prop_assert_eq!(count, 1);
                }
            }
        }

        /// Concatenating segments yields the open stops in route order.
        #[test]
        fn order_preserved(stops in stop_list()) {
            let rule = ClosureRule::new(['X']);
            let line = LineName::parse("L").unwrap();
            let flattened: Vec<StopName> = segment_line(&line, &stops, &rule)
                .into_iter()
                .flat_map(|s| s.stops)
                .collect();
            let open: Vec<StopName> = stops.iter().filter(|s| !rule.is_closed(s)).cloned().collect();
            prop_assert_eq!(flattened, open);
        }

        /// Segments are maximal: the segment count equals the number of
        /// open runs, and indices count up from 0.
        #[test]
        fn segments_maximal(stops in stop_list()) {
            let rule = ClosureRule::new(['X']);
            let line = LineName::parse("L").unwrap();
            let segments = segment_line(&line, &stops, &rule);

            let mut runs = 0;
            let mut in_run = false;
            for stop in &stops {
                let open = !rule.is_closed(stop);
                if open && !in_run {
                    runs += 1;
                }
                in_run = open;
            }

            prop_assert_eq!(segments.len(), runs);
            for (i, segment) in segments.iter().enumerate() {
                prop_assert_eq!(segment.line.as_str(), format!("L-{i}"));
                prop_assert!(!segment.stops.is_empty());
            }
        }
    }
}
