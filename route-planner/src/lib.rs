//! Coarse route planner for the MBTA rapid-transit network.
//!
//! Answers "which lines do I ride, and where do I change, to get from one
//! stop to another with the fewest transfers?" under either the nominal
//! network or a closure policy that shuts a deterministic subset of stops
//! and splits lines at the gaps.

pub mod config;
pub mod domain;
pub mod graph;
pub mod index;
pub mod mbta;
pub mod planner;
pub mod query;
pub mod web;
