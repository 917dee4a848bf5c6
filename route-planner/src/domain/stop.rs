//! Stop name type.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an invalid stop or line name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid name {input:?}: {reason}")]
pub struct InvalidName {
    input: String,
    reason: &'static str,
}

impl InvalidName {
    pub(crate) fn new(input: &str, reason: &'static str) -> Self {
        Self {
            input: input.to_string(),
            reason,
        }
    }
}

/// Validate a human-readable name: non-empty, no surrounding whitespace.
pub(crate) fn validate_name(s: &str) -> Result<(), InvalidName> {
    if s.is_empty() {
        return Err(InvalidName::new(s, "must not be empty"));
    }
    if s.trim() != s {
        return Err(InvalidName::new(s, "must not have surrounding whitespace"));
    }
    Ok(())
}

/// The name of a stop, unique within a policy.
///
/// Stop names are the keys riders type ("Park Street", "Kendall/MIT"), so
/// they are kept verbatim. A `StopName` is never empty and never carries
/// leading or trailing whitespace.
///
/// # Examples
///
/// ```
/// use route_planner::domain::StopName;
///
/// let park = StopName::parse("Park Street").unwrap();
/// assert_eq!(park.as_str(), "Park Street");
/// assert_eq!(park.words().collect::<Vec<_>>(), ["Park", "Street"]);
///
/// assert!(StopName::parse("").is_err());
/// assert!(StopName::parse(" Park Street").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StopName(String);

impl StopName {
    /// Parse a stop name.
    pub fn parse(s: &str) -> Result<Self, InvalidName> {
        validate_name(s)?;
        Ok(StopName(s.to_string()))
    }

    /// Parse a stop name, trimming surrounding whitespace first.
    ///
    /// Used for user input, where stray spaces are common.
    pub fn parse_normalized(s: &str) -> Result<Self, InvalidName> {
        Self::parse(s.trim())
    }

    /// Returns the stop name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whitespace-delimited words of the name.
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.0.split_whitespace()
    }
}

impl TryFrom<String> for StopName {
    type Error = InvalidName;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        validate_name(&s)?;
        Ok(StopName(s))
    }
}

impl From<StopName> for String {
    fn from(stop: StopName) -> Self {
        stop.0
    }
}

impl Borrow<str> for StopName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for StopName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StopName({})", self.0)
    }
}

impl fmt::Display for StopName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
