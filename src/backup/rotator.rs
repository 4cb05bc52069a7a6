//! Backup rotation for dockproxy
//!
//! Snapshots a file into a backup directory under a timestamped name, then
//! prunes the oldest snapshots of that file beyond the retention count.
//!
//! Backups are named `<file name>.<timestamp>`, where the timestamp is UTC,
//! zero-padded and most-significant-unit-first. Names left by earlier
//! releases carry local time instead, so backups are ordered by the parsed
//! instant and the file name only breaks ties.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::settings::{BackupPolicy, MissingSourcePolicy};
use crate::error::{BackupStep, DockProxyError, DockProxyResult};

use super::copy::copy_file;

/// strftime format of the timestamp embedded in backup names
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S%.3f";

/// Format used by earlier releases that wrote `config.json.2024-01-02 15:04:05`
const LEGACY_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Render the filename-safe timestamp for `now`
pub fn backup_timestamp(now: DateTime<Utc>) -> String {
    now.format(TIMESTAMP_FORMAT).to_string()
}

/// Parse the timestamp part of a backup name, ignoring any collision suffix
pub fn parse_backup_timestamp(stamp: &str) -> Option<DateTime<Utc>> {
    // "2024-01-02_15-04-05.000" is 23 bytes, the legacy form is 19
    if let Some(parsed) = stamp
        .get(..23)
        .and_then(|s| NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT).ok())
    {
        return Some(DateTime::from_naive_utc_and_offset(parsed, Utc));
    }

    let legacy = stamp
        .get(..19)
        .and_then(|s| NaiveDateTime::parse_from_str(s, LEGACY_TIMESTAMP_FORMAT).ok())?;

    // Legacy names are local wall-clock time; one skipped by a DST jump is read as UTC
    let instant = Local
        .from_local_datetime(&legacy)
        .earliest()
        .map(|local| local.with_timezone(&Utc))
        .unwrap_or_else(|| DateTime::from_naive_utc_and_offset(legacy, Utc));
    Some(instant)
}

/// One backup file of a [`BackupSet`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackupEntry {
    /// Backup filename
    pub filename: String,
    /// Full path to backup
    pub path: PathBuf,
    /// Everything after `<base name>.`
    pub stamp: String,
    /// Size in bytes
    pub size_bytes: u64,
}

impl BackupEntry {
    /// When the backup was taken, if the name carries a recognizable timestamp
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        parse_backup_timestamp(&self.stamp)
    }
}

/// All backups of one file in a backup directory, oldest first
#[derive(Debug, Clone)]
pub struct BackupSet {
    base_name: String,
    entries: Vec<BackupEntry>,
}

impl BackupSet {
    /// Collect the backups of `base_name` found in `dir`
    ///
    /// Subdirectories and files not named `<base_name>.*` are ignored. A
    /// missing directory yields an empty set.
    pub fn scan(dir: &Path, base_name: &str) -> DockProxyResult<Self> {
        let mut entries = Vec::new();

        if !dir.exists() {
            return Ok(Self {
                base_name: base_name.to_string(),
                entries,
            });
        }

        let prefix = format!("{}.", base_name);
        let read_dir =
            fs::read_dir(dir).map_err(|e| DockProxyError::backup(BackupStep::ListDir, dir, e))?;

        for entry in read_dir {
            let entry = entry.map_err(|e| DockProxyError::backup(BackupStep::ListDir, dir, e))?;
            let file_type = entry
                .file_type()
                .map_err(|e| DockProxyError::backup(BackupStep::ListDir, entry.path(), e))?;
            if file_type.is_dir() {
                continue;
            }

            let filename = match entry.file_name().into_string() {
                Ok(name) => name,
                Err(_) => continue,
            };
            let Some(stamp) = filename.strip_prefix(&prefix) else {
                continue;
            };
            let stamp = stamp.to_string();

            let size_bytes = entry.metadata().map(|m| m.len()).unwrap_or(0);
            entries.push(BackupEntry {
                path: entry.path(),
                filename,
                stamp,
                size_bytes,
            });
        }

        // Unparseable stamps sort as oldest
        entries.sort_by(|a, b| {
            a.created_at()
                .cmp(&b.created_at())
                .then_with(|| a.filename.cmp(&b.filename))
        });

        Ok(Self {
            base_name: base_name.to_string(),
            entries,
        })
    }

    /// Name of the file these backups belong to
    pub fn base_name(&self) -> &str {
        &self.base_name
    }

    /// Backups, oldest first
    pub fn entries(&self) -> &[BackupEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Most recent backup
    pub fn latest(&self) -> Option<&BackupEntry> {
        self.entries.last()
    }

    /// Look up a backup by filename, or `latest`
    pub fn find(&self, name: &str) -> Option<&BackupEntry> {
        if name == "latest" {
            return self.latest();
        }
        self.entries.iter().find(|e| e.filename == name)
    }

    /// Backups that fall outside a window of `max_backups`, oldest first
    ///
    /// With a non-zero window, `fresh` always stays inside it, whatever its
    /// position in the ordering.
    pub fn excess(&self, max_backups: usize, fresh: &Path) -> Vec<&BackupEntry> {
        if max_backups == 0 {
            return self.entries.iter().collect();
        }

        let others: Vec<&BackupEntry> =
            self.entries.iter().filter(|e| e.path != fresh).collect();
        let count = others.len().saturating_sub(max_backups - 1);
        others.into_iter().take(count).collect()
    }
}

/// What a rotation did
#[derive(Debug, Clone, Default)]
pub struct RotationOutcome {
    /// The new backup, or `None` when a missing source was skipped
    pub backup: Option<PathBuf>,
    /// Backups deleted to honour the retention count
    pub pruned: Vec<PathBuf>,
    /// Backups of this file left in the directory
    pub retained: usize,
}

/// Copies a file into a backup directory and enforces a retention count
#[derive(Debug, Clone)]
pub struct BackupRotator {
    backup_dir: PathBuf,
    max_backups: usize,
    missing_source: MissingSourcePolicy,
}

impl BackupRotator {
    /// Create a rotator keeping at most `max_backups` per file in `backup_dir`
    pub fn new(backup_dir: impl Into<PathBuf>, max_backups: usize) -> Self {
        Self {
            backup_dir: backup_dir.into(),
            max_backups,
            missing_source: MissingSourcePolicy::default(),
        }
    }

    /// Create a rotator from the configured backup policy
    pub fn from_policy(backup_dir: impl Into<PathBuf>, policy: &BackupPolicy) -> Self {
        Self::new(backup_dir, policy.max_backups).missing_source(policy.missing_source)
    }

    /// Set the behaviour for a source file that does not exist
    pub fn missing_source(mut self, policy: MissingSourcePolicy) -> Self {
        self.missing_source = policy;
        self
    }

    /// Get backup directory path
    pub fn backup_dir(&self) -> &Path {
        &self.backup_dir
    }

    /// Back up `source` now and prune old backups
    pub fn rotate(&self, source: &Path) -> DockProxyResult<RotationOutcome> {
        self.rotate_at(source, Utc::now())
    }

    /// Back up `source` as of `now` and prune old backups
    ///
    /// Steps run in order and stop at the first failure: create directory,
    /// copy, list, prune. Nothing already done is rolled back.
    pub fn rotate_at(&self, source: &Path, now: DateTime<Utc>) -> DockProxyResult<RotationOutcome> {
        if self.missing_source == MissingSourcePolicy::Skip && !source.exists() {
            info!(source = %source.display(), "source missing, skipping backup");
            return Ok(RotationOutcome::default());
        }

        let base_name = source
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                DockProxyError::backup(BackupStep::ReadSource, source, "not a nameable file")
            })?;

        create_backup_dir(&self.backup_dir)
            .map_err(|e| DockProxyError::backup(BackupStep::CreateDir, &self.backup_dir, e))?;

        let backup_path = self.unique_backup_path(base_name, &backup_timestamp(now));
        let bytes = copy_file(source, &backup_path)?;
        info!(backup = %backup_path.display(), bytes, "backup created");

        let set = BackupSet::scan(&self.backup_dir, base_name)?;
        let pruned = prune(&set.excess(self.max_backups, &backup_path))?;
        let retained = set.len() - pruned.len();
        debug!(retained, pruned = pruned.len(), max = self.max_backups, "retention enforced");

        Ok(RotationOutcome {
            backup: Some(backup_path),
            pruned,
            retained,
        })
    }

    /// Backup path for `stamp`, suffixed `-001`, `-002`, ... if already taken
    fn unique_backup_path(&self, base_name: &str, stamp: &str) -> PathBuf {
        let candidate = self.backup_dir.join(format!("{}.{}", base_name, stamp));
        if !candidate.exists() {
            return candidate;
        }

        let mut counter: u32 = 1;
        loop {
            let candidate = self
                .backup_dir
                .join(format!("{}.{}-{:03}", base_name, stamp, counter));
            if !candidate.exists() {
                debug!(path = %candidate.display(), "timestamp collision, using suffix");
                return candidate;
            }
            counter += 1;
        }
    }
}

/// Back up `source` into `backup_dir`, keeping at most `max_backups` copies
pub fn backup_and_rotate(
    source: &Path,
    backup_dir: &Path,
    max_backups: usize,
) -> DockProxyResult<RotationOutcome> {
    BackupRotator::new(backup_dir, max_backups).rotate(source)
}

fn create_backup_dir(dir: &Path) -> std::io::Result<()> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o755);
    }

    builder.create(dir)
}

/// Delete each doomed backup, carrying on past failures
///
/// Returns the deleted paths, or the first failure once every deletion has
/// been attempted.
fn prune(doomed: &[&BackupEntry]) -> DockProxyResult<Vec<PathBuf>> {
    let mut deleted = Vec::new();
    let mut first_error = None;

    for entry in doomed {
        match fs::remove_file(&entry.path) {
            Ok(()) => {
                debug!(path = %entry.path.display(), "deleted old backup");
                deleted.push(entry.path.clone());
            }
            Err(e) => {
                warn!(path = %entry.path.display(), error = %e, "failed to delete old backup");
                if first_error.is_none() {
                    first_error = Some(DockProxyError::backup(BackupStep::Prune, &entry.path, e));
                }
            }
        }
    }

    match first_error {
        Some(err) => Err(err),
        None => Ok(deleted),
    }
}
