use crate::event::RawLine;
use crate::ingest::{
    DEFAULT_MAX_REOPEN_BACKOFF, DEFAULT_POLL_INTERVAL, IngestCounters, MAX_READ_CHUNK_BYTES,
};
use std::collections::VecDeque;
use std::fs::Metadata;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::fs;
use tokio::io::{AsyncReadExt, AsyncSeekExt, SeekFrom};
use tokio::sync::mpsc;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum TailError {
    #[error("log file {path} is unavailable: {source}")]
    Unavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug)]
pub enum TailNext {
    Line(RawLine),
    /// No complete line available yet.
    Pending,
    Unavailable(TailError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TailerParams {
    pub poll_interval: Duration,
    pub max_reopen_backoff: Duration,
}

impl Default for TailerParams {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_reopen_backoff: DEFAULT_MAX_REOPEN_BACKOFF,
        }
    }
}

impl TailerParams {
    fn reopen_backoff(&self, failures: u32) -> Duration {
        let factor = 1u32 << failures.saturating_sub(1).min(16);
        self.poll_interval
            .saturating_mul(factor)
            .min(self.max_reopen_backoff.max(self.poll_interval))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FileId {
    dev: u64,
    ino: u64,
}

#[cfg(unix)]
fn file_id(meta: &Metadata) -> Option<FileId> {
    use std::os::unix::fs::MetadataExt;
    Some(FileId {
        dev: meta.dev(),
        ino: meta.ino(),
    })
}

#[cfg(not(unix))]
fn file_id(_meta: &Metadata) -> Option<FileId> {
    None
}

/// Follows a growing log file from the end, yielding each complete line once.
///
/// A trailing partial line is held back until its newline arrives. Truncation
/// or replacement of the file restarts reading at offset 0.
#[derive(Debug)]
pub struct Tailer {
    path: PathBuf,
    source: Arc<str>,
    params: TailerParams,
    offset: u64,
    file_id: Option<FileId>,
    partial: Vec<u8>,
    ready: VecDeque<String>,
}

impl Tailer {
    /// Position at the current end of `path`. A missing file is read from its
    /// beginning once it appears.
    pub async fn open_at_end(path: impl Into<PathBuf>, params: TailerParams) -> Self {
        let path = path.into();
        let source: Arc<str> = Arc::from(path.to_string_lossy().as_ref());

        let (offset, file_id) = match fs::metadata(&path).await {
            Ok(meta) => {
                info!(path = %path.display(), offset = meta.len(), "tailing from end of file");
                (meta.len(), file_id(&meta))
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "log file not present; will read it from the start once it appears"
                );
                (0, None)
            }
        };

        Self {
            path,
            source,
            params,
            offset,
            file_id,
            partial: Vec::new(),
            ready: VecDeque::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Byte offset of the next unread byte.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub async fn next(&mut self) -> TailNext {
        if let Some(text) = self.ready.pop_front() {
            return TailNext::Line(RawLine::new(self.source.clone(), text));
        }

        if let Err(err) = self.fill().await {
            return TailNext::Unavailable(err);
        }

        match self.ready.pop_front() {
            Some(text) => TailNext::Line(RawLine::new(self.source.clone(), text)),
            None => TailNext::Pending,
        }
    }

    /// Forward lines until cancelled or the receiver goes away.
    ///
    /// On cancellation, lines already in the file are still forwarded before
    /// returning.
    pub async fn run(
        mut self,
        lines: mpsc::Sender<RawLine>,
        ct: CancellationToken,
        counters: Arc<IngestCounters>,
    ) {
        let mut failures = 0u32;

        while !ct.is_cancelled() {
            let delay = match self.next().await {
                TailNext::Line(line) => {
                    if failures > 0 {
                        info!(path = %self.path.display(), "log file available again");
                        failures = 0;
                    }
                    counters.record_line();
                    if lines.send(line).await.is_err() {
                        debug!("line queue closed; stopping tailer");
                        return;
                    }
                    continue;
                }
                TailNext::Pending => {
                    failures = 0;
                    self.params.poll_interval
                }
                TailNext::Unavailable(err) => {
                    failures = failures.saturating_add(1);
                    let backoff = self.params.reopen_backoff(failures);
                    if failures == 1 {
                        warn!(error = %err, backoff_ms = backoff.as_millis() as u64, "log file unavailable; retrying");
                    } else {
                        debug!(error = %err, attempt = failures, backoff_ms = backoff.as_millis() as u64, "log file still unavailable");
                    }
                    backoff
                }
            };

            tokio::select! {
                _ = ct.cancelled() => break,
                _ = sleep(delay) => {}
            }
        }

        self.drain(&lines, &counters).await;
        info!(path = %self.path.display(), offset = self.offset, "tailer stopped");
    }

    async fn drain(&mut self, lines: &mpsc::Sender<RawLine>, counters: &IngestCounters) {
        while let TailNext::Line(line) = self.next().await {
            counters.record_line();
            if lines.send(line).await.is_err() {
                return;
            }
        }
    }

    async fn fill(&mut self) -> Result<(), TailError> {
        let meta = fs::metadata(&self.path)
            .await
            .map_err(|source| TailError::Unavailable {
                path: self.path.clone(),
                source,
            })?;

        let current_id = file_id(&meta);
        if self.file_id.is_some() && current_id.is_some() && current_id != self.file_id {
            info!(path = %self.path.display(), "log file replaced; reading new file from the start");
            self.reset();
        }
        self.file_id = current_id;

        let len = meta.len();
        if len < self.offset {
            warn!(
                path = %self.path.display(),
                previous_offset = self.offset,
                current_size = len,
                "log file truncated; restarting from the beginning"
            );
            self.reset();
            return Ok(());
        }
        if len == self.offset {
            return Ok(());
        }

        let to_read = (len - self.offset).min(MAX_READ_CHUNK_BYTES as u64) as usize;
        let bytes = self.read_from_offset(to_read).await?;
        self.offset += bytes.len() as u64;
        self.split_lines(&bytes);
        Ok(())
    }

    async fn read_from_offset(&self, max_bytes: usize) -> Result<Vec<u8>, TailError> {
        let read_err = |source: std::io::Error| TailError::Read {
            path: self.path.clone(),
            source,
        };

        let mut file = fs::File::open(&self.path).await.map_err(read_err)?;
        file.seek(SeekFrom::Start(self.offset))
            .await
            .map_err(read_err)?;

        let mut buffer = Vec::with_capacity(max_bytes);
        file.take(max_bytes as u64)
            .read_to_end(&mut buffer)
            .await
            .map_err(read_err)?;
        Ok(buffer)
    }

    fn split_lines(&mut self, bytes: &[u8]) {
        self.partial.extend_from_slice(bytes);

        let Some(last_newline) = self.partial.iter().rposition(|b| *b == b'\n') else {
            return;
        };

        let rest = self.partial.split_off(last_newline + 1);
        let complete = std::mem::replace(&mut self.partial, rest);

        for raw in complete[..last_newline].split(|b| *b == b'\n') {
            let text = String::from_utf8_lossy(raw);
            let text = text.trim_end_matches('\r');
            if !text.trim().is_empty() {
                self.ready.push_back(text.to_string());
            }
        }
    }

    fn reset(&mut self) {
        self.offset = 0;
        self.partial.clear();
    }
}
