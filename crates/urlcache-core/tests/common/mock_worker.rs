//! Mock download workers for integration tests: small shell scripts standing
//! in for the external fetch process.

use std::fs;
use std::path::{Path, PathBuf};

/// Writes an executable `/bin/sh` script into `dir` and returns its path.
/// The body runs with the requested URL in `$1`.
pub fn script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("write mock worker");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755))
            .expect("chmod mock worker");
    }
    path
}
