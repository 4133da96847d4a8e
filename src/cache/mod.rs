//! Directory-backed cache for raw provider responses.
//!
//! Keyed by `(season, round, session kind)`, one JSON file per session.
//! Cache failures are never fatal: a read error degrades to a miss, a write
//! error is logged and dropped. The aggregator itself has no caching
//! responsibility; this sits entirely on the fetch side.

use crate::models::SessionKind;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Read-through cache over a directory of raw response bodies.
pub struct ResponseCache {
    dir: PathBuf,
    enabled: bool,
}

impl ResponseCache {
    pub fn new(dir: impl Into<PathBuf>, enabled: bool) -> Self {
        Self {
            dir: dir.into(),
            enabled,
        }
    }

    /// The file a given session's response lives in.
    pub fn entry_path(&self, season: u16, round: u8, kind: SessionKind) -> PathBuf {
        self.dir
            .join(format!("{}_r{:02}_{}.json", season, round, kind.code()))
    }

    /// Look up a cached body. `None` on miss, disabled cache, or read error.
    pub fn load(&self, season: u16, round: u8, kind: SessionKind) -> Option<String> {
        if !self.enabled {
            return None;
        }

        let path = self.entry_path(season, round, kind);
        if !path.exists() {
            debug!("Cache miss: {}", path.display());
            return None;
        }

        match fs::read_to_string(&path) {
            Ok(body) => {
                debug!("Cache hit: {}", path.display());
                Some(body)
            }
            Err(e) => {
                warn!("Failed to read cache entry {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Store a freshly fetched body. Errors are logged, never propagated.
    pub fn store(&self, season: u16, round: u8, kind: SessionKind, body: &str) {
        if !self.enabled {
            return;
        }

        if let Err(e) = fs::create_dir_all(&self.dir) {
            warn!("Failed to create cache directory {}: {}", self.dir.display(), e);
            return;
        }

        let path = self.entry_path(season, round, kind);
        match fs::write(&path, body) {
            Ok(()) => debug!("Cached response at {}", path.display()),
            Err(e) => warn!("Failed to write cache entry {}: {}", path.display(), e),
        }
    }

    #[allow(dead_code)] // Accessor used in diagnostics/tests
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}
