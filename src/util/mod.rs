//! util — общие утилиты (время, даты партиций, touch).
//!
//! Содержит:
//! - now_nanos(): текущее Unix-время (уникальные имена во временных каталогах).
//! - today_partition(): имя партиции за сегодня (`YYYY-MM-DD`, локальное время).
//! - touch_file(): обновить atime/mtime существующего файла.

use std::fs::{FileTimes, OpenOptions};
use std::io;
use std::path::Path;
use std::time::SystemTime;

use chrono::Local;

use crate::consts::PARTITION_DATE_FORMAT;

#[inline]
pub fn now_nanos() -> u128 {
    use std::time::UNIX_EPOCH;
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos()
}

/// Partition name for the current local date.
pub fn today_partition() -> String {
    Local::now().format(PARTITION_DATE_FORMAT).to_string()
}

/// Bump access/modification time of an existing file. Never creates it:
/// a missing data file must surface as an integrity failure, not as an empty file.
pub fn touch_file(path: &Path) -> io::Result<()> {
    let f = OpenOptions::new().write(true).open(path)?;
    let now = SystemTime::now();
    f.set_times(FileTimes::new().set_accessed(now).set_modified(now))
}
