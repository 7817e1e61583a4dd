//! Cache-root confinement of worker-reported paths.
//!
//! Two gates, both mandatory: a component-wise prefix check on the path as
//! the worker printed it, then canonicalization (symlinks resolved) and a
//! re-check against the canonical root. The string the worker prints is
//! never trusted on its own.

use std::path::{Path, PathBuf};

#[derive(Debug, PartialEq, Eq)]
pub enum ConfineError {
    /// Candidate lies outside the cache root, before or after resolving symlinks.
    EscapesRoot,
    /// Candidate does not resolve to an existing regular file.
    NotFound,
}

/// Checks `candidate` against the cache root and returns its canonical path.
///
/// `root` is the configured cache root (the form the worker prints paths
/// under); `canonical_root` is its symlink-resolved form. A candidate passes
/// only if it is strictly inside the root under both views and resolves to a
/// regular file.
pub fn confine(
    root: &Path,
    canonical_root: &Path,
    candidate: &Path,
) -> Result<PathBuf, ConfineError> {
    // Component-wise, so a sibling like `/var/www/html/cache-evil` fails.
    if candidate.is_relative() || !candidate.starts_with(root) || candidate == root {
        return Err(ConfineError::EscapesRoot);
    }

    let resolved = std::fs::canonicalize(candidate).map_err(|_| ConfineError::NotFound)?;

    // Re-check after symlink resolution; a link inside the root pointing
    // elsewhere must not leak the target.
    if !resolved.starts_with(canonical_root) || resolved == canonical_root {
        return Err(ConfineError::EscapesRoot);
    }

    let meta = std::fs::metadata(&resolved).map_err(|_| ConfineError::NotFound)?;
    if !meta.is_file() {
        return Err(ConfineError::NotFound);
    }

    Ok(resolved)
}
