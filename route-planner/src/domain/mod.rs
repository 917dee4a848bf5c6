//! Domain types for the transfer planner.
//!
//! Validated names for lines and stops, plus the operating policy. All
//! types enforce their invariants at construction time.

mod line;
mod policy;
mod stop;

pub use line::{Line, LineId, LineName};
pub use policy::{Policy, UnknownPolicy};
pub use stop::{InvalidName, StopName};
