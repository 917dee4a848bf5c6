//! Network operating policy.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Which stops and lines are considered in service.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Policy {
    /// The full network.
    #[default]
    Nominal,
    /// Designated stops are closed and affected lines split into sub-lines.
    Closure,
}

/// Error returned when parsing an unknown policy name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown policy {0:?} (expected \"nominal\" or \"closure\")")]
pub struct UnknownPolicy(pub String);

impl Policy {
    pub const ALL: [Policy; 2] = [Policy::Nominal, Policy::Closure];

    /// Stable name, also used as the cache key.
    pub fn as_str(&self) -> &'static str {
        match self {
            Policy::Nominal => "nominal",
            Policy::Closure => "closure",
        }
    }
}

impl FromStr for Policy {
    type Err = UnknownPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "nominal" => Ok(Policy::Nominal),
            "closure" => Ok(Policy::Closure),
            _ => Err(UnknownPolicy(s.to_string())),
        }
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
