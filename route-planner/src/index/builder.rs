//! Builds stop route indexes from a data source.

use futures::future::join_all;
use tracing::{debug, info, warn};

use crate::domain::{Line, Policy, StopName};
use crate::mbta::{DataFetcher, FetchError, StopOrder};

use super::cache::IndexCache;
use super::closure::closure_contribution;
use super::config::IndexConfig;
use super::StopRouteIndex;

/// Error from index construction. Only data source failures abort a build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// Listing lines failed
    #[error("failed to list lines: {0}")]
    Lines(#[source] FetchError),

    /// Listing a line's stops failed
    #[error("failed to list stops for {line}: {source}")]
    Stops {
        line: String,
        #[source]
        source: FetchError,
    },
}

/// Builds a [`StopRouteIndex`] for a policy, going through the disk cache.
pub struct IndexBuilder<'a, F: DataFetcher> {
    fetcher: &'a F,
    config: &'a IndexConfig,
    cache: Option<IndexCache>,
}

impl<'a, F: DataFetcher + Sync> IndexBuilder<'a, F> {
    /// Create a builder. The cache is enabled when `config.cache_dir` is set.
    pub fn new(fetcher: &'a F, config: &'a IndexConfig) -> Self {
        Self {
            fetcher,
            config,
            cache: config.cache_dir.as_ref().map(IndexCache::new),
        }
    }

    /// Build the index for a policy.
    ///
    /// A usable cache entry is returned without touching the data source.
    /// An unreadable one is discarded and the index rebuilt. After a fresh
    /// build the index is written back to the cache; a failed write is
    /// logged and does not fail the build.
    pub async fn build(&self, policy: Policy) -> Result<StopRouteIndex, BuildError> {
        if let Some(index) = self.load_cached(policy) {
            return Ok(index);
        }

        let index = self.build_fresh(policy).await?;

        if let Some(cache) = &self.cache
            && let Err(e) = cache.save(policy, &index)
        {
            warn!(%policy, error = %e, "failed to write index cache");
        }

        Ok(index)
    }

    fn load_cached(&self, policy: Policy) -> Option<StopRouteIndex> {
        let cache = self.cache.as_ref()?;
        match cache.load(policy) {
            Ok(Some(index)) => {
                info!(%policy, stops = index.len(), path = %cache.path(policy).display(), "loaded index from cache");
                Some(index)
            }
            Ok(None) => None,
            Err(e) => {
                warn!(%policy, error = %e, "discarding unreadable index cache");
                if let Err(e) = cache.clear(policy) {
                    warn!(%policy, error = %e, "failed to remove unreadable index cache");
                }
                None
            }
        }
    }

    /// Build the index from the data source, ignoring the cache.
    pub async fn build_fresh(&self, policy: Policy) -> Result<StopRouteIndex, BuildError> {
        let lines = self.fetch_lines().await.map_err(BuildError::Lines)?;
        let order = match policy {
            Policy::Nominal => StopOrder::ByName,
            Policy::Closure => StopOrder::RouteOrder,
        };

        let mut index = StopRouteIndex::new();

        for batch in lines.chunks(self.config.batch_size.max(1)) {
            let fetches = batch.iter().map(|line| async move {
                let result = self.fetch_stops(line, order).await;
                (line, result)
            });

            for (line, result) in join_all(fetches).await {
                let stops = result.map_err(|source| BuildError::Stops {
                    line: line.name.to_string(),
                    source,
                })?;
                debug!(line = %line.name, stops = stops.len(), "fetched stops");
                index.merge(self.contribution(policy, line, &stops));
            }
        }

        info!(
            %policy,
            lines = lines.len(),
            stops = index.len(),
            "built stop route index"
        );

        Ok(index)
    }

    /// List lines, bounded by the configured time limit.
    async fn fetch_lines(&self) -> Result<Vec<Line>, FetchError> {
        let limit = self.config.fetch_timeout();
        tokio::time::timeout(limit, self.fetcher.list_lines())
            .await
            .map_err(|_| FetchError::Timeout {
                what: "lines".to_string(),
                secs: limit.as_secs(),
            })?
    }

    /// Fetch one line's stops, bounded by the configured time limit.
    async fn fetch_stops(&self, line: &Line, order: StopOrder) -> Result<Vec<StopName>, FetchError> {
        let limit = self.config.fetch_timeout();
        tokio::time::timeout(limit, self.fetcher.list_stops(&line.id, order))
            .await
            .map_err(|_| FetchError::Timeout {
                what: format!("stops for {}", line.id),
                secs: limit.as_secs(),
            })?
    }

    /// Index entries a single line contributes under a policy.
    fn contribution(&self, policy: Policy, line: &Line, stops: &[StopName]) -> StopRouteIndex {
        match policy {
            Policy::Nominal => {
                let mut index = StopRouteIndex::new();
                for stop in stops {
                    index.insert(stop.clone(), line.name.clone());
                }
                index
            }
            Policy::Closure => closure_contribution(
                &line.name,
                stops,
                &self.config.closure_rule,
                &self.config.overrides,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LineId, LineName};
    use crate::index::ClosureRule;
    use crate::mbta::{StaticLine, StaticNetwork};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::tempdir;

    /// Wraps a static network and counts fetches.
    struct CountingFetcher {
        inner: StaticNetwork,
        calls: AtomicUsize,
    }

    impl CountingFetcher {
        fn new(inner: StaticNetwork) -> Self {
            Self {
                inner,
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl DataFetcher for CountingFetcher {
        async fn list_lines(&self) -> Result<Vec<Line>, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.list_lines().await
        }

        async fn list_stops(
            &self,
            line: &LineId,
            order: StopOrder,
        ) -> Result<Vec<StopName>, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.list_stops(line, order).await
        }
    }

    /// Lists one line whose stops never arrive.
    struct StalledFetcher;

    impl DataFetcher for StalledFetcher {
        async fn list_lines(&self) -> Result<Vec<Line>, FetchError> {
            Ok(vec![Line::new(
                LineId::parse("Red").unwrap(),
                LineName::parse("Red Line").unwrap(),
            )])
        }

        async fn list_stops(
            &self,
            _line: &LineId,
            _order: StopOrder,
        ) -> Result<Vec<StopName>, FetchError> {
            std::future::pending().await
        }
    }

    fn static_line(id: &str, name: &str, stops: &[&str]) -> StaticLine {
        StaticLine {
            id: LineId::parse(id).unwrap(),
            name: LineName::parse(name).unwrap(),
            stops: stops.iter().map(|s| StopName::parse(s).unwrap()).collect(),
        }
    }

    fn network() -> StaticNetwork {
        StaticNetwork::new(vec![
            static_line("A", "Alpha", &["One", "Xtwo", "Three", "Hub"]),
            static_line("B", "Beta", &["Hub", "Four"]),
        ])
    }

    fn config() -> IndexConfig {
        IndexConfig {
            closure_rule: ClosureRule::new(['X']),
            overrides: vec![],
            ..IndexConfig::default()
        }
        .without_cache()
    }

    fn line_names(index: &StopRouteIndex, stop: &str) -> Vec<String> {
        index
            .lines_at(stop)
            .map(|lines| lines.iter().map(ToString::to_string).collect())
            .unwrap_or_default()
    }

    #[tokio::test]
    async fn nominal_indexes_every_stop() {
        let fetcher = network();
        let config = config();
        let index = IndexBuilder::new(&fetcher, &config)
            .build(Policy::Nominal)
            .await
            .unwrap();

        assert_eq!(index.len(), 5);
        assert_eq!(line_names(&index, "Xtwo"), ["Alpha"]);
        assert_eq!(line_names(&index, "Hub"), ["Alpha", "Beta"]);
    }

    #[tokio::test]
    async fn closure_segments_lines() {
        let fetcher = network();
        let config = config();
        let index = IndexBuilder::new(&fetcher, &config)
            .build(Policy::Closure)
            .await
            .unwrap();

        assert!(!index.contains("Xtwo"));
        assert_eq!(line_names(&index, "One"), ["Alpha-0"]);
        assert_eq!(line_names(&index, "Three"), ["Alpha-1"]);
        assert_eq!(line_names(&index, "Hub"), ["Alpha-1", "Beta-0"]);
    }

    #[tokio::test]
    async fn small_batches_give_same_index() {
        let fetcher = network();
        let config = config();
        let single = IndexConfig {
            batch_size: 1,
            ..config.clone()
        };

        let batched = IndexBuilder::new(&fetcher, &config)
            .build(Policy::Nominal)
            .await
            .unwrap();
        let sequential = IndexBuilder::new(&fetcher, &single)
            .build(Policy::Nominal)
            .await
            .unwrap();
        assert_eq!(batched, sequential);
    }

    #[tokio::test]
    async fn cache_hit_skips_fetcher() {
        let dir = tempdir().unwrap();
        let fetcher = CountingFetcher::new(network());
        let config = config().with_cache_dir(dir.path());
        let builder = IndexBuilder::new(&fetcher, &config);

        let first = builder.build(Policy::Nominal).await.unwrap();
        let calls_after_build = fetcher.calls();
        assert_eq!(calls_after_build, 3);

        let second = builder.build(Policy::Nominal).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(fetcher.calls(), calls_after_build);
    }

    #[tokio::test]
    async fn corrupt_cache_triggers_rebuild() {
        let dir = tempdir().unwrap();
        let cache = IndexCache::new(dir.path());
        std::fs::write(cache.path(Policy::Closure), "{ truncated").unwrap();

        let fetcher = CountingFetcher::new(network());
        let config = config().with_cache_dir(dir.path());
        let index = IndexBuilder::new(&fetcher, &config)
            .build(Policy::Closure)
            .await
            .unwrap();

        assert!(fetcher.calls() > 0);
        assert_eq!(cache.load(Policy::Closure).unwrap(), Some(index));
    }

    #[tokio::test]
    async fn fetch_failure_propagates() {
        // Lists a line the network has no stops for.
        struct MissingLine(StaticNetwork);
        impl DataFetcher for MissingLine {
            async fn list_lines(&self) -> Result<Vec<Line>, FetchError> {
                let mut lines = self.0.list_lines().await?;
                lines.push(Line::new(
                    LineId::parse("Ghost").unwrap(),
                    LineName::parse("Ghost Line").unwrap(),
                ));
                Ok(lines)
            }
            async fn list_stops(
                &self,
                line: &LineId,
                order: StopOrder,
            ) -> Result<Vec<StopName>, FetchError> {
                self.0.list_stops(line, order).await
            }
        }

        let fetcher = MissingLine(StaticNetwork::new(vec![static_line("A", "Alpha", &["One"])]));
        let config = config();
        let err = IndexBuilder::new(&fetcher, &config)
            .build(Policy::Nominal)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            BuildError::Stops { ref line, source: FetchError::UnknownLine(_) } if line == "Ghost Line"
        ));
    }

    #[tokio::test]
    async fn stalled_fetch_times_out() {
        let config = config().with_fetch_timeout(0);
        let err = IndexBuilder::new(&StalledFetcher, &config)
            .build(Policy::Nominal)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            BuildError::Stops { source: FetchError::Timeout { secs: 0, .. }, .. }
        ));
    }

    #[tokio::test]
    async fn stalled_line_listing_times_out() {
        struct StalledLines;

        impl DataFetcher for StalledLines {
            async fn list_lines(&self) -> Result<Vec<Line>, FetchError> {
                std::future::pending().await
            }

            async fn list_stops(
                &self,
                _line: &LineId,
                _order: StopOrder,
            ) -> Result<Vec<StopName>, FetchError> {
                Ok(vec![])
            }
        }

        let config = config().with_fetch_timeout(1);
        let result = tokio::time::timeout(
            std::time::Duration::from_secs(5),
            IndexBuilder::new(&StalledLines, &config).build(Policy::Closure),
        )
        .await
        .expect("build should give up once the fetch limit passes");

        assert!(matches!(
            result,
            Err(BuildError::Lines(FetchError::Timeout { ref what, secs: 1 })) if what == "lines"
        ));
    }

    #[tokio::test]
    async fn corrupt_cache_removed_when_rebuild_fails() {
        let dir = tempdir().unwrap();
        let cache = IndexCache::new(dir.path());
        std::fs::write(cache.path(Policy::Nominal), "{ truncated").unwrap();

        let config = config().with_cache_dir(dir.path()).with_fetch_timeout(0);
        let result = IndexBuilder::new(&StalledFetcher, &config)
            .build(Policy::Nominal)
            .await;

        assert!(result.is_err());
        assert!(!cache.exists(Policy::Nominal));
    }

    #[tokio::test]
    async fn failed_build_writes_no_cache() {
        let dir = tempdir().unwrap();
        let config = config().with_cache_dir(dir.path()).with_fetch_timeout(0);
        let _ = IndexBuilder::new(&StalledFetcher, &config)
            .build(Policy::Nominal)
            .await;
        assert!(!IndexCache::new(dir.path()).exists(Policy::Nominal));
    }
}
