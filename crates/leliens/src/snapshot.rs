// Regression Snapshot
//
// *L'Instantané* (The Snapshot) - Top recommendations for named fixture pages,
// recorded once and compared on every later run

use crate::report::Report;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Recommendation URLs recorded per fixture page.
pub const SNAPSHOT_TOP: usize = 3;

/// Snapshot errors
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// A fixture URL is not present in the report.
    #[error("fixture page not found in report: {url}")]
    MissingFixture {
        /// The missing URL.
        url: String,
    },

    /// Fresh output differs from the recorded snapshot.
    #[error("snapshot mismatch for {url}: expected {expected:?}, got {actual:?}")]
    Mismatch {
        /// First page that differs.
        url: String,
        /// Recorded URLs.
        expected: Vec<String>,
        /// Fresh URLs.
        actual: Vec<String>,
    },

    /// Reading or writing the snapshot file failed.
    #[error("snapshot I/O failed for {path}: {source}")]
    Io {
        /// Snapshot path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The snapshot file is not valid JSON.
    #[error("snapshot is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Outcome of [`check_or_record`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotOutcome {
    /// No snapshot existed; one was written.
    Recorded,
    /// The snapshot matched fresh output.
    Matched,
}

/// Fixture URL -> its top recommendation URLs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot {
    pages: BTreeMap<String, Vec<String>>,
}

impl Snapshot {
    /// Capture the top [`SNAPSHOT_TOP`] recommendation URLs of each fixture.
    pub fn capture<S: AsRef<str>>(report: &Report, fixtures: &[S]) -> Result<Self, SnapshotError> {
        let pages = fixtures
            .iter()
            .map(|url| {
                let url = url.as_ref();
                let page = report.page(url).ok_or_else(|| SnapshotError::MissingFixture {
                    url: url.to_string(),
                })?;
                let top = page
                    .recommendations
                    .iter()
                    .take(SNAPSHOT_TOP)
                    .map(|r| r.url.clone())
                    .collect();
                Ok((url.to_string(), top))
            })
            .collect::<Result<_, SnapshotError>>()?;
        Ok(Self { pages })
    }

    /// Recorded URLs for `url`.
    pub fn get(&self, url: &str) -> Option<&[String]> {
        self.pages.get(url).map(Vec::as_slice)
    }

    /// Compare against a recorded snapshot.
    pub fn verify(&self, recorded: &Snapshot) -> Result<(), SnapshotError> {
        let urls = recorded.pages.keys().chain(self.pages.keys());
        for url in urls {
            let expected = recorded.pages.get(url).cloned().unwrap_or_default();
            let actual = self.pages.get(url).cloned().unwrap_or_default();
            if expected != actual {
                return Err(SnapshotError::Mismatch {
                    url: url.clone(),
                    expected,
                    actual,
                });
            }
        }
        Ok(())
    }
}

/// Compare `fresh` with the snapshot at `path`, writing it when absent.
pub fn check_or_record(path: &Path, fresh: &Snapshot) -> Result<SnapshotOutcome, SnapshotError> {
    let io_err = |source| SnapshotError::Io {
        path: path.to_path_buf(),
        source,
    };

    if !path.exists() {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let json = serde_json::to_string_pretty(fresh)?;
        std::fs::write(path, json + "\n").map_err(io_err)?;
        info!("Recorded snapshot at {}", path.display());
        return Ok(SnapshotOutcome::Recorded);
    }

    let recorded: Snapshot = serde_json::from_str(&std::fs::read_to_string(path).map_err(io_err)?)?;
    fresh.verify(&recorded)?;
    Ok(SnapshotOutcome::Matched)
}
