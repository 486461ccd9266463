//! Общие константы раскладки хранилища (index, data files, session keys).

// -------- Files --------
/// Index file name inside a storage directory.
pub const INDEX_FILE: &str = "index.data";
/// Extension of per-tag data files: `<tag>.data`.
pub const DATA_EXT: &str = "data";

// -------- Snapshot payload --------
/// Required key in a data file holding the request summary record.
pub const SUMMARY_KEY: &str = "summary";

// -------- Session --------
/// Session key holding the last resolved partition (date).
pub const SESSION_PARTITION_KEY: &str = "selectedPartition";

// -------- Partitions --------
/// Format of dated partition directories (`2024-01-31`).
pub const PARTITION_DATE_FORMAT: &str = "%Y-%m-%d";

// -------- Retry --------
pub const DEFAULT_RETRY_BACKOFF_MS: u64 = 1000;
/// Retry bound for the inline toolbar fetch (snapshot may still be in flight).
pub const DEFAULT_TOOLBAR_RETRIES: u32 = 5;

// -------- Panels --------
pub const DEFAULT_PANELS: &[&str] = &["config", "request", "log", "profiling", "db", "mail"];
pub const DEFAULT_PANEL: &str = "log";
