//! Line identifier and name types.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::stop::{InvalidName, validate_name};

/// Upstream route identifier, e.g. `Red` or `Green-B`.
///
/// Only used to ask the data source for a line's stops; everything
/// downstream of the index works with [`LineName`].
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LineId(String);

impl LineId {
    /// Parse a line identifier. Must be non-empty and contain no whitespace.
    pub fn parse(s: &str) -> Result<Self, InvalidName> {
        validate_name(s)?;
        if s.chars().any(char::is_whitespace) {
            return Err(InvalidName::new(s, "must not contain whitespace"));
        }
        Ok(LineId(s.to_string()))
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for LineId {
    type Error = InvalidName;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        LineId::parse(&s)
    }
}

impl From<LineId> for String {
    fn from(id: LineId) -> Self {
        id.0
    }
}

impl fmt::Debug for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LineId({})", self.0)
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The name a line is indexed and reported under.
///
/// Under the nominal policy this is the line's display name ("Red Line").
/// Under the closure policy each contiguous open run of a line becomes its
/// own sub-line, named `{display name}-{run index}` ("Red Line-2").
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LineName(String);

impl LineName {
    /// Parse a line name.
    pub fn parse(s: &str) -> Result<Self, InvalidName> {
        validate_name(s)?;
        Ok(LineName(s.to_string()))
    }

    /// Name of the `run`-th open segment of this line.
    pub fn segment(&self, run: usize) -> LineName {
        LineName(format!("{}-{}", self.0, run))
    }

    /// Returns the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for LineName {
    type Error = InvalidName;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        validate_name(&s)?;
        Ok(LineName(s))
    }
}

impl From<LineName> for String {
    fn from(name: LineName) -> Self {
        name.0
    }
}

impl Borrow<str> for LineName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for LineName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LineName({})", self.0)
    }
}

impl fmt::Display for LineName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A transit line as listed by the data source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Line {
    pub id: LineId,
    pub name: LineName,
}

impl Line {
    pub fn new(id: LineId, name: LineName) -> Self {
        Self { id, name }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_id_rejects_whitespace() {
        assert!(LineId::parse("Green-B").is_ok());
        assert!(LineId::parse("Green B").is_err());
        assert!(LineId::parse("").is_err());
    }

    #[test]
    fn segment_names() {
        let red = LineName::parse("Red Line").unwrap();
        assert_eq!(red.segment(0).as_str(), "Red Line-0");
        assert_eq!(red.segment(12).as_str(), "Red Line-12");
    }

    #[test]
    fn line_names_order_lexicographically() {
        let b = LineName::parse("Green Line B").unwrap();
        let c = LineName::parse("Green Line C").unwrap();
        let red = LineName::parse("Red Line").unwrap();
        assert!(b < c);
        assert!(c < red);
    }

    #[test]
    fn line_serde() {
        let line = Line::new(
            LineId::parse("Mattapan").unwrap(),
            LineName::parse("Mattapan Trolley").unwrap(),
        );
        let json = serde_json::to_string(&line).unwrap();
        assert_eq!(json, r#"{"id":"Mattapan","name":"Mattapan Trolley"}"#);
        let back: Line = serde_json::from_str(&json).unwrap();
        assert_eq!(back, line);
    }
}
