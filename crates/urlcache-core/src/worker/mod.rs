//! External download worker invocation.
//!
//! The worker is a black box: it receives the validated URL as its single
//! argument, writes whatever diagnostics it likes to stdout/stderr, and
//! reports the stored artifact path in its output (see [`transcript`]).
//! Success is decided later from the parsed path, never from the exit code.

pub mod transcript;

use std::path::Path;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc;

/// Combined output of one worker run.
#[derive(Debug)]
pub struct WorkerOutcome {
    /// stdout and stderr lines, interleaved in arrival order.
    pub transcript: String,
    pub status: ExitStatus,
}

/// Failure modes of the invocation itself (not of the produced path).
#[derive(Debug, thiserror::Error)]
pub enum WorkerError {
    #[error("failed to start worker: {0}")]
    Spawn(#[source] std::io::Error),
    #[error("worker did not finish within {}s", .limit.as_secs())]
    TimedOut { limit: Duration },
}

fn pump_lines<R>(stream: R, tx: mpsc::Sender<String>)
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut lines = BufReader::new(stream).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if tx.send(line).await.is_err() {
                break;
            }
        }
    });
}

/// Runs the worker with `url` as its only argument and collects its combined
/// output until it exits or `limit` elapses.
///
/// The URL is passed as one argv element; no shell is involved, so shell
/// metacharacters in the URL are opaque bytes to the worker. `kill_on_drop`
/// covers every abandonment path: timeout, client disconnect, panic.
pub async fn run(worker: &Path, url: &str, limit: Duration) -> Result<WorkerOutcome, WorkerError> {
    let mut child = Command::new(worker)
        .arg(url)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(WorkerError::Spawn)?;

    let (tx, mut rx) = mpsc::channel::<String>(64);
    if let Some(stdout) = child.stdout.take() {
        pump_lines(stdout, tx.clone());
    }
    if let Some(stderr) = child.stderr.take() {
        pump_lines(stderr, tx.clone());
    }
    drop(tx);

    let collect = async move {
        let mut transcript = String::new();
        while let Some(line) = rx.recv().await {
            transcript.push_str(&line);
            transcript.push('\n');
        }
        let status = child.wait().await.map_err(WorkerError::Spawn)?;
        Ok(WorkerOutcome { transcript, status })
    };

    // On expiry the collect future is dropped, which drops the child and
    // kills it via kill_on_drop.
    match tokio::time::timeout(limit, collect).await {
        Ok(outcome) => outcome,
        Err(_) => Err(WorkerError::TimedOut { limit }),
    }
}
