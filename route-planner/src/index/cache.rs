//! Disk cache for built indexes.
//!
//! One JSON file per policy. Each file records the policy it was built
//! under and a format version, so a file can never be loaded for the wrong
//! policy or by an incompatible build.

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tempfile::Builder;

use crate::domain::Policy;

use super::StopRouteIndex;

/// Bump when the on-disk shape changes.
const FORMAT_VERSION: u32 = 1;

/// Errors from the index cache.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// The file exists but cannot be used
    #[error("corrupt cache file {path}: {message}")]
    Corrupt { path: PathBuf, message: String },

    /// Filesystem operation failed
    #[error("cache I/O error on {path}: {message}")]
    Io { path: PathBuf, message: String },
}

#[derive(Debug, Serialize)]
struct CachedIndexRef<'a> {
    version: u32,
    policy: Policy,
    stops: &'a StopRouteIndex,
}

#[derive(Debug, Deserialize)]
struct CachedIndex {
    version: u32,
    policy: Policy,
    stops: StopRouteIndex,
}

/// Serialize an index for `policy`.
pub fn encode(policy: Policy, index: &StopRouteIndex) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&CachedIndexRef {
        version: FORMAT_VERSION,
        policy,
        stops: index,
    })
}

/// Deserialize an index, checking it was written for `policy`.
///
/// Returns a description of the problem on failure.
pub fn decode(policy: Policy, contents: &str) -> Result<StopRouteIndex, String> {
    let cached: CachedIndex = serde_json::from_str(contents).map_err(|e| e.to_string())?;

    if cached.version != FORMAT_VERSION {
        return Err(format!(
            "format version {} (expected {})",
            cached.version, FORMAT_VERSION
        ));
    }
    if cached.policy != policy {
        return Err(format!("built for policy {} (expected {})", cached.policy, policy));
    }
    if !cached.stops.is_well_formed() {
        return Err("stop with no lines".to_string());
    }

    Ok(cached.stops)
}

/// Disk cache for stop route indexes, one file per policy.
#[derive(Debug, Clone)]
pub struct IndexCache {
    dir: PathBuf,
}

impl IndexCache {
    /// Create a cache rooted at `dir`. Nothing is touched until first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the cache file for a policy.
    pub fn path(&self, policy: Policy) -> PathBuf {
        self.dir.join(format!("stop_routes.{}.json", policy.as_str()))
    }

    /// Returns true if a cache file exists for the policy.
    pub fn exists(&self, policy: Policy) -> bool {
        self.path(policy).is_file()
    }

    /// Load the index for a policy.
    ///
    /// Returns `Ok(None)` if there is no cache file and
    /// [`CacheError::Corrupt`] if the file cannot be used.
    pub fn load(&self, policy: Policy) -> Result<Option<StopRouteIndex>, CacheError> {
        let path = self.path(policy);

        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(CacheError::Corrupt {
                    path,
                    message: e.to_string(),
                });
            }
        };

        decode(policy, &contents)
            .map(Some)
            .map_err(|message| CacheError::Corrupt { path, message })
    }

    /// Save the index for a policy.
    ///
    /// Creates the cache directory if needed. Each save writes a uniquely
    /// named temporary file next to the final location and renames it into
    /// place, so readers see either the old file or a complete new one and
    /// concurrent writers never share a partial file.
    pub fn save(&self, policy: Policy, index: &StopRouteIndex) -> Result<(), CacheError> {
        let path = self.path(policy);
        let io_error = |path: &Path, message: String| CacheError::Io {
            path: path.to_path_buf(),
            message,
        };

        if !self.dir.as_os_str().is_empty() && !self.dir.exists() {
            std::fs::create_dir_all(&self.dir).map_err(|e| {
                io_error(self.dir.as_path(), format!("failed to create cache directory: {e}"))
            })?;
        }

        let json = encode(policy, index)
            .map_err(|e| io_error(path.as_path(), format!("failed to serialize cache: {e}")))?;

        let mut tmp = Builder::new()
            .prefix(&format!(".stop_routes.{}.", policy.as_str()))
            .suffix(".tmp")
            .tempfile_in(&self.dir)
            .map_err(|e| {
                io_error(
                    self.dir.as_path(),
                    format!("failed to create temporary cache file: {e}"),
                )
            })?;
        tmp.write_all(json.as_bytes())
            .map_err(|e| io_error(tmp.path(), format!("failed to write cache file: {e}")))?;
        tmp.persist(&path).map_err(|e| {
            io_error(path.as_path(), format!("failed to move cache file into place: {}", e.error))
        })?;

        Ok(())
    }

    /// Delete the cache file for a policy, if present.
    pub fn clear(&self, policy: Policy) -> Result<(), CacheError> {
        let path = self.path(policy);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CacheError::Io {
                path,
                message: e.to_string(),
            }),
        }
    }
}
