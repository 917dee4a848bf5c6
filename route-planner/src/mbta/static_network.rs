//! In-memory network for offline use and tests.
//!
//! Serves lines and their ordered stop lists from memory, loaded either
//! programmatically or from a JSON file shaped like:
//!
//! ```json
//! { "lines": [ { "id": "Red", "name": "Red Line", "stops": ["Alewife", "Davis"] } ] }
//! ```

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::domain::{Line, LineId, LineName, StopName};

use super::error::FetchError;
use super::{DataFetcher, StopOrder};

/// One line of a static network, stops in route order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticLine {
    pub id: LineId,
    pub name: LineName,
    pub stops: Vec<StopName>,
}

#[derive(Debug, Deserialize)]
struct NetworkFile {
    lines: Vec<StaticLine>,
}

/// A fixed network that answers like the live API.
#[derive(Debug, Clone, Default)]
pub struct StaticNetwork {
    lines: Arc<Vec<StaticLine>>,
}

impl StaticNetwork {
    /// Create a network from a list of lines.
    pub fn new(lines: Vec<StaticLine>) -> Self {
        Self {
            lines: Arc::new(lines),
        }
    }

    /// Parse a network from JSON.
    pub fn from_json(json: &str) -> Result<Self, FetchError> {
        let file: NetworkFile = serde_json::from_str(json).map_err(|e| FetchError::Json {
            message: e.to_string(),
        })?;
        Ok(Self::new(file.lines))
    }

    /// Load a network from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, FetchError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| FetchError::Io {
            message: format!("{}: {}", path.display(), e),
        })?;
        Self::from_json(&json)
    }

    /// Number of lines in the network.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Returns true if the network has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    fn line(&self, id: &LineId) -> Option<&StaticLine> {
        self.lines.iter().find(|l| &l.id == id)
    }
}

impl DataFetcher for StaticNetwork {
    async fn list_lines(&self) -> Result<Vec<Line>, FetchError> {
        let mut lines: Vec<Line> = self
            .lines
            .iter()
            .map(|l| Line::new(l.id.clone(), l.name.clone()))
            .collect();
        lines.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(lines)
    }

    async fn list_stops(&self, line: &LineId, order: StopOrder) -> Result<Vec<StopName>, FetchError> {
        let found = self
            .line(line)
            .ok_or_else(|| FetchError::UnknownLine(line.to_string()))?;

        let mut stops = found.stops.clone();
        if order == StopOrder::ByName {
            stops.sort();
            stops.dedup();
        }
        Ok(stops)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const JSON: &str = r#"{
        "lines": [
            {"id": "Red", "name": "Red Line", "stops": ["Alewife", "Davis", "Porter"]},
            {"id": "Blue", "name": "Blue Line", "stops": ["Wonderland", "Airport"]}
        ]
    }"#;

    fn names(stops: &[StopName]) -> Vec<&str> {
        stops.iter().map(StopName::as_str).collect()
    }

    #[tokio::test]
    async fn lines_sorted_by_name() {
        let network = StaticNetwork::from_json(JSON).unwrap();
        let lines = network.list_lines().await.unwrap();
        assert_eq!(lines[0].name.as_str(), "Blue Line");
        assert_eq!(lines[1].name.as_str(), "Red Line");
    }

    #[tokio::test]
    async fn stop_order() {
        let network = StaticNetwork::from_json(JSON).unwrap();
        let red = LineId::parse("Red").unwrap();

        let ordered = network.list_stops(&red, StopOrder::RouteOrder).await.unwrap();
        assert_eq!(names(&ordered), ["Alewife", "Davis", "Porter"]);

        let blue = LineId::parse("Blue").unwrap();
        let by_name = network.list_stops(&blue, StopOrder::ByName).await.unwrap();
        assert_eq!(names(&by_name), ["Airport", "Wonderland"]);
    }

    #[tokio::test]
    async fn unknown_line_is_an_error() {
        let network = StaticNetwork::from_json(JSON).unwrap();
        let silver = LineId::parse("Silver").unwrap();
        let err = network
            .list_stops(&silver, StopOrder::ByName)
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::UnknownLine(ref id) if id == "Silver"));
    }

    #[test]
    fn invalid_json_rejected() {
        assert!(matches!(
            StaticNetwork::from_json("{\"lines\": [{\"id\": \"\"}]}"),
            Err(FetchError::Json { .. })
        ));
    }

    #[test]
    fn missing_file() {
        assert!(matches!(
            StaticNetwork::load("/nonexistent/network.json"),
            Err(FetchError::Io { .. })
        ));
    }

    #[test]
    fn bundled_fixture_loads() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures/mbta_rapid_transit.json");
        let network = StaticNetwork::load(path).unwrap();
        assert_eq!(network.len(), 8);
    }
}
