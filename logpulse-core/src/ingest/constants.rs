use std::time::Duration;

/// Upper bound on bytes read from the tailed file in one poll.
pub const MAX_READ_CHUNK_BYTES: usize = 8 * 1024 * 1024;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);
pub const DEFAULT_MAX_REOPEN_BACKOFF: Duration = Duration::from_secs(5);
