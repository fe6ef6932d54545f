//! Size-bounded rotating log file
//!
//! Provides a [`Write`] sink that rotates based on:
//! - File size limits
//! - Backup count and age retention
//!
//! Rotated files are renamed `<stem>-<timestamp>.<ext>` and optionally
//! archived into `.zip` files.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use tracing::warn;
use zip::write::SimpleFileOptions;

use crate::domain::models::LogSettings;

const MEGABYTE: u64 = 1024 * 1024;
const DEFAULT_MAX_SIZE_MB: u64 = 100;
const BACKUP_TIME_FORMAT: &str = "%Y-%m-%dT%H-%M-%S%.3f";
const COMPRESSED_SUFFIX: &str = ".zip";

/// Rotation and retention limits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationPolicy {
    /// Maximum file size in bytes before rotation
    pub max_size: u64,
    /// Rotated files kept; 0 keeps all
    pub max_backups: usize,
    /// Days a rotated file is kept; 0 keeps forever
    pub max_age_days: u32,
    /// Archive rotated files into zip files
    pub compress: bool,
}

impl RotationPolicy {
    /// Derive limits from log settings. A zero size means 100 MB.
    pub const fn from_settings(settings: &LogSettings) -> Self {
        let max_size_mb = if settings.max_size == 0 {
            DEFAULT_MAX_SIZE_MB
        } else {
            settings.max_size
        };

        Self {
            max_size: max_size_mb.saturating_mul(MEGABYTE),
            max_backups: settings.max_backups,
            max_age_days: settings.max_age,
            compress: settings.compress,
        }
    }
}

/// Log file writer that rolls over once it reaches the size limit
#[derive(Debug)]
pub struct RotatingFileWriter {
    path: PathBuf,
    policy: RotationPolicy,
    file: File,
    size: u64,
}

impl RotatingFileWriter {
    /// Open (or create) the log file, creating its directory when missing.
    ///
    /// # Errors
    /// Returns an error if the directory or file cannot be created.
    pub fn open(path: impl Into<PathBuf>, policy: RotationPolicy) -> io::Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let file = open_append(&path)?;
        let size = file.metadata()?.len();

        Ok(Self {
            path,
            policy,
            file,
            size,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Rename the current file to a timestamped backup, start a fresh file
    /// and apply retention to the backups.
    ///
    /// # Errors
    /// Returns an error if the rename or the new file fails.
    pub fn rotate(&mut self) -> io::Result<()> {
        self.file.flush()?;

        let backup = backup_path(&self.path, Utc::now());
        fs::rename(&self.path, &backup)?;

        self.file = open_append(&self.path)?;
        self.size = 0;

        if let Err(e) = self.cleanup() {
            warn!(path = %self.path.display(), error = %e, "failed to clean up rotated log files");
        }

        Ok(())
    }

    /// Apply the backup-count, age and compression rules to rotated files.
    ///
    /// Returns the number of files removed.
    ///
    /// # Errors
    /// Returns an error if the log directory cannot be read or a file
    /// cannot be removed or compressed.
    pub fn cleanup(&self) -> io::Result<usize> {
        let mut backups = self.backups()?;
        // Newest first
        backups.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

        let mut removed = 0;
        let mut kept = Vec::new();
        let cutoff = (self.policy.max_age_days > 0)
            .then(|| Utc::now() - Duration::days(i64::from(self.policy.max_age_days)));

        for (index, backup) in backups.into_iter().enumerate() {
            let over_count = self.policy.max_backups > 0 && index >= self.policy.max_backups;
            let expired = cutoff.is_some_and(|cutoff| backup.timestamp < cutoff);

            if over_count || expired {
                fs::remove_file(&backup.path)?;
                removed += 1;
            } else {
                kept.push(backup);
            }
        }

        if self.policy.compress {
            for backup in kept.iter().filter(|b| !b.compressed) {
                compress_file(&backup.path)?;
            }
        }

        Ok(removed)
    }

    fn backups(&self) -> io::Result<Vec<Backup>> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let (stem, ext) = split_name(&self.path);
        let prefix = format!("{stem}-");

        let mut backups = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };

            let (name_body, compressed) = match name.strip_suffix(COMPRESSED_SUFFIX) {
                Some(body) => (body, true),
                None => (name.as_str(), false),
            };

            let Some(timestamp) = name_body
                .strip_prefix(&prefix)
                .and_then(|rest| rest.strip_suffix(&ext))
                .and_then(parse_backup_time)
            else {
                continue;
            };

            backups.push(Backup {
                path: entry.path(),
                timestamp,
                compressed,
            });
        }

        Ok(backups)
    }
}

impl Write for RotatingFileWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let len = buf.len() as u64;
        if len > self.policy.max_size {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!(
                    "write of {len} bytes exceeds maximum log file size of {} bytes",
                    self.policy.max_size
                ),
            ));
        }

        if self.size + len > self.policy.max_size {
            self.rotate()?;
        }

        let written = self.file.write(buf)?;
        self.size += written as u64;
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

#[derive(Debug)]
struct Backup {
    path: PathBuf,
    timestamp: DateTime<Utc>,
    compressed: bool,
}

fn open_append(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

/// Split `dir/boot.log` into (`boot`, `.log`)
fn split_name(path: &Path) -> (String, String) {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    (stem, ext)
}

/// `dir/boot.log` rotated at `time` becomes `dir/boot-2024-01-02T03-04-05.678.log`
fn backup_path(path: &Path, time: DateTime<Utc>) -> PathBuf {
    let (stem, ext) = split_name(path);
    let name = format!("{stem}-{}{ext}", time.format(BACKUP_TIME_FORMAT));
    path.with_file_name(name)
}

fn parse_backup_time(raw: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(raw, BACKUP_TIME_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

/// Archive `path` into `path.zip` and remove the original
fn compress_file(path: &Path) -> io::Result<()> {
    let entry_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut archive_name = path.as_os_str().to_owned();
    archive_name.push(COMPRESSED_SUFFIX);

    let mut zip = zip::ZipWriter::new(File::create(&archive_name)?);
    let options =
        SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
    zip.start_file(entry_name, options).map_err(io::Error::other)?;
    io::copy(&mut File::open(path)?, &mut zip)?;
    zip.finish().map_err(io::Error::other)?;

    fs::remove_file(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn policy(max_size: u64, max_backups: usize, max_age_days: u32, compress: bool) -> RotationPolicy {
        RotationPolicy {
            max_size,
            max_backups,
            max_age_days,
            compress,
        }
    }

    fn file_names(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_policy_from_settings() {
        let settings = LogSettings::default();
        let policy = RotationPolicy::from_settings(&settings);

        assert_eq!(policy.max_size, 10 * 1024 * 1024);
        assert_eq!(policy.max_backups, 3);
        assert_eq!(policy.max_age_days, 30);
        assert!(policy.compress);
    }

    #[test]
    fn test_policy_zero_size_uses_library_default() {
        let settings = LogSettings {
            max_size: 0,
            ..LogSettings::default()
        };
        assert_eq!(RotationPolicy::from_settings(&settings).max_size, 100 * 1024 * 1024);
    }

    #[test]
    fn test_backup_path_format() {
        let time = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let backup = backup_path(Path::new("/var/log/boot.log"), time);

        assert_eq!(backup, PathBuf::from("/var/log/boot-2024-01-02T03-04-05.000.log"));
        assert_eq!(
            parse_backup_time("2024-01-02T03-04-05.000"),
            Some(time)
        );
    }

    #[test]
    fn test_open_creates_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let log_path = temp_dir.path().join("logs").join("nested").join("boot.log");

        let writer = RotatingFileWriter::open(&log_path, policy(1024, 3, 0, false)).unwrap();

        assert!(log_path.exists());
        assert_eq!(writer.path(), log_path.as_path());
    }

    #[test]
    fn test_no_rotation_under_size() {
        let temp_dir = TempDir::new().unwrap();
        let log_path = temp_dir.path().join("boot.log");

        let mut writer = RotatingFileWriter::open(&log_path, policy(1024, 3, 0, false)).unwrap();
        writer.write_all(b"small content\n").unwrap();
        writer.flush().unwrap();

        assert_eq!(file_names(temp_dir.path()), vec!["boot.log".to_string()]);
        assert_eq!(fs::read_to_string(&log_path).unwrap(), "small content\n");
    }

    #[test]
    fn test_rotates_when_write_exceeds_size() {
        let temp_dir = TempDir::new().unwrap();
        let log_path = temp_dir.path().join("boot.log");

        let mut writer = RotatingFileWriter::open(&log_path, policy(16, 3, 0, false)).unwrap();
        writer.write_all(b"0123456789\n").unwrap();
        writer.write_all(b"abcdefghij\n").unwrap();
        writer.flush().unwrap();

        let names = file_names(temp_dir.path());
        assert_eq!(names.len(), 2);
        assert!(names.contains(&"boot.log".to_string()));
        assert!(names.iter().any(|n| n.starts_with("boot-") && n.ends_with(".log")));
        assert_eq!(fs::read_to_string(&log_path).unwrap(), "abcdefghij\n");
    }

    #[test]
    fn test_existing_file_size_counts_toward_limit() {
        let temp_dir = TempDir::new().unwrap();
        let log_path = temp_dir.path().join("boot.log");
        fs::write(&log_path, vec![b'x'; 12]).unwrap();

        let mut writer = RotatingFileWriter::open(&log_path, policy(16, 3, 0, false)).unwrap();
        writer.write_all(b"12345678\n").unwrap();

        assert_eq!(file_names(temp_dir.path()).len(), 2);
    }

    #[test]
    fn test_oversized_write_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let log_path = temp_dir.path().join("boot.log");

        let mut writer = RotatingFileWriter::open(&log_path, policy(4, 3, 0, false)).unwrap();
        let err = writer.write(b"too long for the limit").unwrap_err();

        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }

    #[test]
    fn test_cleanup_keeps_newest_backups() {
        let temp_dir = TempDir::new().unwrap();
        let log_path = temp_dir.path().join("boot.log");
        let now = Utc::now();
        for hours in 1..=5 {
            let backup = backup_path(&log_path, now - Duration::hours(hours));
            fs::write(backup, b"old").unwrap();
        }

        let writer = RotatingFileWriter::open(&log_path, policy(1024, 2, 0, false)).unwrap();
        let removed = writer.cleanup().unwrap();

        assert_eq!(removed, 3);
        let names = file_names(temp_dir.path());
        assert_eq!(names.len(), 3);
        assert!(names.contains(&"boot.log".to_string()));
        let newest = backup_path(&log_path, now - Duration::hours(1));
        assert!(newest.exists());
    }

    #[test]
    fn test_cleanup_removes_expired_backups() {
        let temp_dir = TempDir::new().unwrap();
        let log_path = temp_dir.path().join("boot.log");
        let now = Utc::now();
        let old = backup_path(&log_path, now - Duration::days(40));
        let recent = backup_path(&log_path, now - Duration::days(2));
        fs::write(&old, b"old").unwrap();
        fs::write(&recent, b"recent").unwrap();

        let writer = RotatingFileWriter::open(&log_path, policy(1024, 0, 30, false)).unwrap();
        assert_eq!(writer.cleanup().unwrap(), 1);

        assert!(!old.exists());
        assert!(recent.exists());
    }

    #[test]
    fn test_cleanup_ignores_unrelated_files() {
        let temp_dir = TempDir::new().unwrap();
        let log_path = temp_dir.path().join("boot.log");
        fs::write(temp_dir.path().join("data.txt"), b"text").unwrap();
        fs::write(temp_dir.path().join("boot-notes.log"), b"notes").unwrap();
        fs::write(temp_dir.path().join("other-2020-01-01T00-00-00.000.log"), b"x").unwrap();

        let writer = RotatingFileWriter::open(&log_path, policy(1024, 1, 1, false)).unwrap();
        assert_eq!(writer.cleanup().unwrap(), 0);
        assert_eq!(file_names(temp_dir.path()).len(), 4);
    }

    #[test]
    fn test_compress_rotated_files() {
        let temp_dir = TempDir::new().unwrap();
        let log_path = temp_dir.path().join("boot.log");

        let mut writer = RotatingFileWriter::open(&log_path, policy(16, 3, 0, true)).unwrap();
        writer.write_all(b"0123456789\n").unwrap();
        writer.write_all(b"abcdefghij\n").unwrap();

        let names = file_names(temp_dir.path());
        assert_eq!(names.len(), 2);
        let archive = names
            .iter()
            .find(|n| n.ends_with(".log.zip"))
            .expect("rotated file should be compressed");

        let mut zip = zip::ZipArchive::new(File::open(temp_dir.path().join(archive)).unwrap()).unwrap();
        let mut contents = String::new();
        io::Read::read_to_string(&mut zip.by_index(0).unwrap(), &mut contents).unwrap();
        assert_eq!(contents, "0123456789\n");
    }

    #[test]
    fn test_compressed_backups_count_toward_limit() {
        let temp_dir = TempDir::new().unwrap();
        let log_path = temp_dir.path().join("boot.log");
        let now = Utc::now();
        for hours in 1..=3 {
            let mut name = backup_path(&log_path, now - Duration::hours(hours)).into_os_string();
            name.push(".zip");
            fs::write(name, b"archived").unwrap();
        }

        let writer = RotatingFileWriter::open(&log_path, policy(1024, 1, 0, true)).unwrap();
        assert_eq!(writer.cleanup().unwrap(), 2);
    }
}
