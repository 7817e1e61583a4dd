//! Fetch orchestration: run the worker, extract the artifact path from its
//! output, confine it to the cache root, and build the public reference.

mod confine;

use crate::config::UrlcacheConfig;
use crate::validate::ValidatedUrl;
use crate::worker::{self, transcript, WorkerError};
use anyhow::{Context, Result};
use confine::ConfineError;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// RFC 3986 unreserved characters stay literal; everything else is encoded.
const FILENAME_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// A cached file the worker produced, confined to the cache root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedArtifact {
    /// Canonical on-disk location, inside the cache root.
    pub absolute_path: PathBuf,
    /// Percent-encoded base name, safe to embed as a URL path segment under
    /// `/cache/`. Directory structure is deliberately discarded.
    pub public_path: String,
}

/// Successful pipeline result: the artifact plus the worker's diagnostics.
#[derive(Debug)]
pub struct Fetched {
    pub artifact: CachedArtifact,
    pub transcript: String,
}

/// Caching failure taxonomy. None of these is fatal to the server; each
/// request's failure is isolated and reported to that request only.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("failed to start worker: {0}")]
    WorkerSpawn(#[source] std::io::Error),
    #[error("worker did not finish within {}s", .limit.as_secs())]
    WorkerTimeout { limit: Duration },
    #[error("worker output contained no artifact path")]
    NoPathFound { transcript: String },
    #[error("artifact path escapes the cache root: {candidate}")]
    PathEscapesRoot {
        candidate: String,
        transcript: String,
    },
    #[error("artifact path is not an existing regular file: {candidate}")]
    FileNotFound {
        candidate: String,
        transcript: String,
    },
}

impl FetchError {
    /// Worker diagnostics captured before the failure, when any.
    pub fn transcript(&self) -> Option<&str> {
        match self {
            FetchError::NoPathFound { transcript }
            | FetchError::PathEscapesRoot { transcript, .. }
            | FetchError::FileNotFound { transcript, .. } => Some(transcript),
            FetchError::WorkerSpawn(_) | FetchError::WorkerTimeout { .. } => None,
        }
    }
}

/// Runs the fetch-validate-cache-serve pipeline for one request at a time.
/// Holds only read-only configuration; concurrent calls are independent.
#[derive(Debug, Clone)]
pub struct Orchestrator {
    worker_path: PathBuf,
    timeout: Duration,
    /// Root as configured; the form the worker prints paths under.
    cache_root: PathBuf,
    /// Symlink-resolved root for post-canonicalization confinement.
    canonical_root: PathBuf,
}

impl Orchestrator {
    /// Builds an orchestrator. Fails if the cache root does not exist, since
    /// confinement needs its canonical form.
    pub fn new(cache_root: PathBuf, worker_path: PathBuf, timeout: Duration) -> Result<Self> {
        let canonical_root = std::fs::canonicalize(&cache_root)
            .with_context(|| format!("cache root {} is not usable", cache_root.display()))?;
        Ok(Self {
            worker_path,
            timeout,
            cache_root,
            canonical_root,
        })
    }

    pub fn from_config(cfg: &UrlcacheConfig) -> Result<Self> {
        Self::new(
            cfg.cache_root.clone(),
            cfg.worker_path.clone(),
            Duration::from_secs(cfg.worker_timeout_secs),
        )
    }

    pub fn cache_root(&self) -> &Path {
        &self.cache_root
    }

    /// Fetches `url` via the external worker and returns a reference to the
    /// cached artifact.
    ///
    /// The worker's exit status is logged but never gates success: the parsed
    /// path passing confinement and pointing at an existing regular file is
    /// the one success criterion.
    pub async fn fetch_and_cache(&self, url: &ValidatedUrl) -> Result<Fetched, FetchError> {
        let outcome = worker::run(&self.worker_path, url.as_str(), self.timeout)
            .await
            .map_err(|err| match err {
                WorkerError::Spawn(io) => FetchError::WorkerSpawn(io),
                WorkerError::TimedOut { limit } => FetchError::WorkerTimeout { limit },
            })?;

        tracing::debug!(status = ?outcome.status, url = %url.as_str(), "worker exited");
        let transcript = outcome.transcript;

        let candidate = match transcript::artifact_candidate(&transcript) {
            Some(c) => c,
            None => return Err(FetchError::NoPathFound { transcript }),
        };

        let resolved = match confine::confine(
            &self.cache_root,
            &self.canonical_root,
            Path::new(&candidate),
        ) {
            Ok(p) => p,
            Err(ConfineError::EscapesRoot) => {
                tracing::warn!(candidate = %candidate, "worker path escaped the cache root");
                return Err(FetchError::PathEscapesRoot {
                    candidate,
                    transcript,
                });
            }
            Err(ConfineError::NotFound) => {
                return Err(FetchError::FileNotFound {
                    candidate,
                    transcript,
                });
            }
        };

        let public_path = match public_name(&resolved) {
            Some(name) => name,
            None => {
                return Err(FetchError::FileNotFound {
                    candidate,
                    transcript,
                });
            }
        };

        tracing::info!(path = %resolved.display(), public = %public_path, "cached artifact ready");
        Ok(Fetched {
            artifact: CachedArtifact {
                absolute_path: resolved,
                public_path,
            },
            transcript,
        })
    }
}

/// Percent-encoded base name of `path`, directory components discarded.
fn public_name(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_string_lossy();
    Some(utf8_percent_encode(&name, FILENAME_ENCODE_SET).to_string())
}
