//! File I/O utilities with atomic writes
//!
//! Provides safe file operations that won't corrupt data on failure.

use std::ffi::OsString;
use std::fs::{self, File, Permissions};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::error::DockProxyError;

/// Serialize a value as JSON indented with four spaces, ending in a newline
pub fn to_pretty_json<T: Serialize>(data: &T) -> Result<Vec<u8>, DockProxyError> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    data.serialize(&mut ser)
        .map_err(|e| DockProxyError::Json(format!("Failed to serialize data: {}", e)))?;
    buf.push(b'\n');
    Ok(buf)
}

/// Temp file used while replacing `path` (`config.json` -> `config.json.tmp`)
fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| OsString::from("file"));
    name.push(".tmp");
    path.with_file_name(name)
}

/// Write bytes to a file atomically (write to temp, then rename)
///
/// This ensures that the file is either completely written or not modified at all,
/// preventing corruption on crashes or power failures.
///
/// An existing target keeps its permissions, and a symlinked target stays a
/// symlink: the real file behind it is the one replaced.
pub fn write_bytes_atomic<P: AsRef<Path>>(path: P, bytes: &[u8]) -> Result<(), DockProxyError> {
    let (target, permissions) = resolve_target(path.as_ref())?;

    // Ensure parent directory exists
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            DockProxyError::Io(format!(
                "Failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    // Temp file in same directory so the rename stays on one filesystem
    let temp_path = temp_path_for(&target);

    let result = write_temp(&temp_path, bytes, permissions).and_then(|_| {
        fs::rename(&temp_path, &target)
            .map_err(|e| DockProxyError::Io(format!("Failed to rename temp file: {}", e)))
    });

    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    result
}

/// The file actually written for `path`, and the permissions to carry over
fn resolve_target(path: &Path) -> Result<(PathBuf, Option<Permissions>), DockProxyError> {
    match fs::metadata(path) {
        Ok(metadata) => {
            let real = fs::canonicalize(path).map_err(|e| {
                DockProxyError::Io(format!("Failed to resolve {}: {}", path.display(), e))
            })?;
            Ok((real, Some(metadata.permissions())))
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok((path.to_path_buf(), None)),
        Err(e) => Err(DockProxyError::Io(format!(
            "Failed to stat {}: {}",
            path.display(),
            e
        ))),
    }
}

fn write_temp(
    temp_path: &Path,
    bytes: &[u8],
    permissions: Option<Permissions>,
) -> Result<(), DockProxyError> {
    let file = File::create(temp_path)
        .map_err(|e| DockProxyError::Io(format!("Failed to create temp file: {}", e)))?;

    let mut writer = BufWriter::new(file);
    writer
        .write_all(bytes)
        .map_err(|e| DockProxyError::Io(format!("Failed to write data: {}", e)))?;

    writer
        .flush()
        .map_err(|e| DockProxyError::Io(format!("Failed to flush data: {}", e)))?;

    if let Some(permissions) = permissions {
        fs::set_permissions(temp_path, permissions)
            .map_err(|e| DockProxyError::Io(format!("Failed to set permissions: {}", e)))?;
    }

    writer
        .get_ref()
        .sync_all()
        .map_err(|e| DockProxyError::Io(format!("Failed to sync data: {}", e)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_pretty_json_uses_four_spaces() {
        let bytes = to_pretty_json(&json!({"a": {"b": 1}})).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text, "{\n    \"a\": {\n        \"b\": 1\n    }\n}\n");
    }

    #[test]
    fn test_write_and_read() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");

        write_bytes_atomic(&path, &to_pretty_json(&json!({"auths": {}})).unwrap()).unwrap();

        let loaded: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(loaded, json!({"auths": {}}));
    }

    #[test]
    fn test_atomic_write_no_temp_file_left() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");

        write_bytes_atomic(&path, b"{}").unwrap();

        assert!(path.exists());
        assert!(!temp_dir.path().join("config.json.tmp").exists());
    }

    #[test]
    fn test_write_replaces_existing_content() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");

        fs::write(&path, "a much longer original body").unwrap();
        write_bytes_atomic(&path, b"{}").unwrap();

        assert_eq!(fs::read(&path).unwrap(), b"{}");
    }

    #[test]
    fn test_write_creates_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join(".docker").join("config.json");

        write_bytes_atomic(&path, b"{}").unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_failed_rename_leaves_no_temp_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        fs::create_dir(&path).unwrap();
        fs::write(path.join("occupied"), "x").unwrap();

        assert!(write_bytes_atomic(&path, b"{}").is_err());
        assert!(!temp_dir.path().join("config.json.tmp").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_existing_permissions_are_kept() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        fs::write(&path, r#"{"auths": {"ghcr.io": {"auth": "secret"}}}"#).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o600)).unwrap();

        write_bytes_atomic(&path, b"{}").unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o600);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_target_stays_a_link() {
        let temp_dir = TempDir::new().unwrap();
        let dotfiles = temp_dir.path().join("dotfiles");
        fs::create_dir(&dotfiles).unwrap();
        let real = dotfiles.join("docker-config.json");
        fs::write(&real, "{}").unwrap();

        let docker = temp_dir.path().join(".docker");
        fs::create_dir(&docker).unwrap();
        let link = docker.join("config.json");
        std::os::unix::fs::symlink(&real, &link).unwrap();

        write_bytes_atomic(&link, br#"{"proxies": {}}"#).unwrap();

        assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
        assert_eq!(fs::read_to_string(&real).unwrap(), r#"{"proxies": {}}"#);
        assert!(!dotfiles.join("docker-config.json.tmp").exists());
    }
}
