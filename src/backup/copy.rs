//! Byte-for-byte file copy used to snapshot the config
//!
//! The source is read in full before the destination is opened, and the
//! destination is always a fresh regular file (never a link), so a backup
//! stays independent of later edits to the original.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use crate::error::{BackupStep, DockProxyError, DockProxyResult};

/// Copy `src` to `dest`, creating or truncating `dest`
///
/// Returns the number of bytes written.
pub fn copy_file(src: &Path, dest: &Path) -> DockProxyResult<u64> {
    let bytes =
        fs::read(src).map_err(|e| DockProxyError::backup(BackupStep::ReadSource, src, e))?;

    let mut file = open_for_write(dest)
        .map_err(|e| DockProxyError::backup(BackupStep::WriteBackup, dest, e))?;

    file.write_all(&bytes)
        .and_then(|_| file.sync_all())
        .map_err(|e| DockProxyError::backup(BackupStep::WriteBackup, dest, e))?;

    Ok(bytes.len() as u64)
}

#[cfg(unix)]
fn open_for_write(path: &Path) -> io::Result<File> {
    use std::os::unix::fs::OpenOptionsExt;

    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o644)
        .open(path)
}

#[cfg(not(unix))]
fn open_for_write(path: &Path) -> io::Result<File> {
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
}
