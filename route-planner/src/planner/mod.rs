//! Transfer planner using BFS search.
//!
//! Answers "which lines do I ride, and where do I change, to get from stop
//! A to stop B with as few changes as possible?"

mod search;
mod tree;

pub use search::{PathFinder, SearchOutcome};
pub use tree::{NodeId, PathStep, PathTree};
