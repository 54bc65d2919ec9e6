use crate::store::{EventStore, Point, RangeQuery, StoreError, StoredEvent};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs::{self, File, OpenOptions};
use std::io::SeekFrom;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncSeekExt, AsyncWriteExt, BufReader};
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Append-only store that keeps one JSON-encoded [`Point`] per line.
///
/// Writes are serialized through a single handle. A failed append is truncated
/// back to the length it started from, then the handle is dropped and reopened
/// by the next write. Reopening terminates a torn trailing line so the next
/// point always starts on a line of its own.
#[derive(Debug)]
pub struct FileEventStore {
    path: PathBuf,
    writer: Mutex<Option<File>>,
}

impl FileEventStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            writer: Mutex::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn open_for_append(&self) -> Result<File, StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::io(parent, e))?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| StoreError::io(&self.path, e))?;

        if self.ends_mid_line().await? {
            warn!(path = %self.path.display(), "store file ends mid-line; terminating torn line");
            file.write_all(b"\n")
                .await
                .map_err(|e| StoreError::io(&self.path, e))?;
        }

        Ok(file)
    }

    async fn ends_mid_line(&self) -> Result<bool, StoreError> {
        let io = |e: std::io::Error| StoreError::io(&self.path, e);

        let mut file = File::open(&self.path).await.map_err(io)?;
        let len = file.metadata().await.map_err(io)?.len();
        if len == 0 {
            return Ok(false);
        }

        let mut last = [0u8; 1];
        file.seek(SeekFrom::Start(len - 1)).await.map_err(io)?;
        file.read_exact(&mut last).await.map_err(io)?;
        Ok(last[0] != b'\n')
    }
}

#[async_trait]
impl EventStore for FileEventStore {
    async fn write_points(&self, points: &[Point]) -> Result<(), StoreError> {
        if points.is_empty() {
            return Ok(());
        }

        let mut encoded = String::new();
        for point in points {
            let line = serde_json::to_string(point).map_err(|source| StoreError::Encode { source })?;
            encoded.push_str(&line);
            encoded.push('\n');
        }

        let mut writer = self.writer.lock().await;
        let mut file = match writer.take() {
            Some(file) => file,
            None => self.open_for_append().await?,
        };

        let start = file
            .metadata()
            .await
            .map_err(|e| StoreError::io(&self.path, e))?
            .len();

        let result = async {
            file.write_all(encoded.as_bytes()).await?;
            file.flush().await
        }
        .await;

        if let Err(e) = result {
            if let Err(truncate) = file.set_len(start).await {
                warn!(
                    path = %self.path.display(),
                    error = %truncate,
                    "failed to roll back partial append"
                );
            }
            return Err(StoreError::io(&self.path, e));
        }
        *writer = Some(file);

        debug!(path = %self.path.display(), points = points.len(), "points appended");
        Ok(())
    }

    async fn read_range(&self, query: &RangeQuery) -> Result<Vec<StoredEvent>, StoreError> {
        let file = match File::open(&self.path).await {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::io(&self.path, e)),
        };

        let mut lines = BufReader::new(file).lines();
        let mut events = Vec::new();
        let mut skipped = 0usize;

        while let Some(line) = lines
            .next_line()
            .await
            .map_err(|e| StoreError::io(&self.path, e))?
        {
            if line.trim().is_empty() {
                continue;
            }

            let point: Point = match serde_json::from_str(&line) {
                Ok(point) => point,
                Err(_) => {
                    skipped += 1;
                    continue;
                }
            };

            if query.matches(&point) {
                events.extend(point.to_stored_event());
            }
        }

        if skipped > 0 {
            warn!(
                path = %self.path.display(),
                skipped,
                "skipped undecodable lines in store file"
            );
        }

        Ok(events)
    }

    async fn flush(&self) -> Result<(), StoreError> {
        let mut writer = self.writer.lock().await;
        if let Some(file) = writer.as_mut() {
            file.flush()
                .await
                .map_err(|e| StoreError::io(&self.path, e))?;
            file.sync_data()
                .await
                .map_err(|e| StoreError::io(&self.path, e))?;
        }
        Ok(())
    }
}
