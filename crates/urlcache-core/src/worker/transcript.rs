//! Artifact path extraction from worker output.
//!
//! Preferred contract: the worker emits a marker line
//! `artifact-path: /abs/path/to/file` (the last such line wins). Legacy
//! workers that just print the path as their final output line are still
//! supported: the last non-empty line is the fallback candidate.

/// Marker prefix for the structured worker contract.
pub const ARTIFACT_MARKER: &str = "artifact-path:";

/// Extracts the candidate artifact path from a combined worker transcript.
///
/// Lines are split on `\n`, `\r\n`, or `\r`; trailing blank lines are
/// ignored. Returns `None` when the transcript has no non-empty line.
pub fn artifact_candidate(transcript: &str) -> Option<String> {
    let mut last_marker: Option<&str> = None;
    let mut last_nonempty: Option<&str> = None;

    for line in transcript.split(['\n', '\r']) {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(rest) = line.strip_prefix(ARTIFACT_MARKER) {
            let rest = rest.trim();
            if !rest.is_empty() {
                last_marker = Some(rest);
            }
        }
        last_nonempty = Some(line);
    }

    last_marker.or(last_nonempty).map(str::to_string)
}
