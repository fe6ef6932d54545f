//! Profile file discovery
//!
//! Finds `<prefix>.yaml` and `<prefix>-<env>.yaml` files in a single
//! directory. Subdirectories are never traversed.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

/// File suffix shared by every profile
pub const PROFILE_SUFFIX: &str = ".yaml";

/// Classification of a discovered profile file
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ProfileKind {
    /// `<prefix>.yaml`
    Default,
    /// `<prefix>-<name>.yaml`
    Environment(String),
}

impl fmt::Display for ProfileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => f.write_str("default"),
            Self::Environment(name) => f.write_str(name),
        }
    }
}

/// A profile file found on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredFile {
    pub path: PathBuf,
    pub kind: ProfileKind,
}

/// Classify a file name against the profile prefix.
///
/// Returns `None` for names that share the prefix but are not profiles,
/// e.g. `applicationdev.yaml` or `application-.yaml`.
pub fn classify(file_name: &str, prefix: &str) -> Option<ProfileKind> {
    let middle = file_name
        .strip_prefix(prefix)?
        .strip_suffix(PROFILE_SUFFIX)?;

    if middle.is_empty() {
        return Some(ProfileKind::Default);
    }

    let env = middle.trim().strip_prefix('-')?;
    if env.is_empty() {
        return None;
    }

    Some(ProfileKind::Environment(env.to_string()))
}

/// List the profile files in `dir`, sorted by file name.
///
/// An unreadable directory yields no files: the caller falls back to
/// built-in defaults.
pub fn discover(dir: &Path, prefix: &str) -> Vec<DiscoveredFile> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            debug!(dir = %dir.display(), error = %e, "config directory not readable");
            return Vec::new();
        }
    };

    let mut files: Vec<DiscoveredFile> = entries
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_ok_and(|t| !t.is_dir()))
        .filter_map(|entry| {
            let name = entry.file_name();
            let kind = classify(name.to_str()?, prefix)?;
            Some(DiscoveredFile {
                path: entry.path(),
                kind,
            })
        })
        .collect();

    files.sort_by(|a, b| a.path.file_name().cmp(&b.path.file_name()));

    debug!(
        dir = %dir.display(),
        prefix,
        count = files.len(),
        "discovered profile files"
    );

    files
}
