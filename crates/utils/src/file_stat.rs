use lesspress_core::FileStat;
use std::fs;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

/// Probe a file's size and modification time, `None` when it does not exist
/// or its metadata cannot be read
pub fn probe_file(path: &Path) -> Option<FileStat> {
    let metadata = fs::metadata(path).ok()?;
    if !metadata.is_file() {
        return None;
    }
    let modified = metadata.modified().ok().map(epoch_seconds).unwrap_or(0);
    Some(FileStat {
        size: metadata.len(),
        modified,
    })
}

/// Whole seconds since the Unix epoch, negative for times before it
pub fn epoch_seconds(time: SystemTime) -> i64 {
    match time.duration_since(UNIX_EPOCH) {
        Ok(elapsed) => elapsed.as_secs() as i64,
        Err(before) => -(before.duration().as_secs() as i64),
    }
}
