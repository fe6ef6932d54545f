use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::domain::models::BootDocument;
use crate::domain::{ConfigError, ConfigResult};

/// File written by [`write_default_config`]
pub const DEFAULT_CONFIG_FILE: &str = "application.yaml";

/// Write `dir/application.yaml` populated with the built-in boot defaults.
///
/// An existing file is never overwritten: the call logs a warning and
/// returns [`ConfigError::AlreadyExists`] without touching it.
///
/// # Errors
/// Fails when the file exists, cannot be created, or cannot be written.
pub fn write_default_config(dir: &Path) -> ConfigResult<PathBuf> {
    let path = dir.join(DEFAULT_CONFIG_FILE);
    let contents = serde_yaml::to_string(&BootDocument::default())?;

    let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            warn!(path = %path.display(), "config file already exists, leaving it untouched");
            return Err(ConfigError::AlreadyExists(path));
        }
        Err(source) => return Err(ConfigError::Io { path, source }),
    };

    file.write_all(contents.as_bytes())
        .map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;

    info!(path = %path.display(), "wrote default configuration");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::config::profile::ProfileTree;
    use tempfile::TempDir;

    #[test]
    fn test_writes_seeded_defaults() {
        let temp_dir = TempDir::new().unwrap();

        let path = write_default_config(temp_dir.path()).unwrap();
        assert_eq!(path, temp_dir.path().join("application.yaml"));

        let tree = ProfileTree::load(&path).unwrap();
        assert_eq!(tree.get::<String>("boot.active").as_deref(), Some("dev"));
        assert_eq!(tree.get::<String>("boot.log.saveType").as_deref(), Some("text"));
        assert_eq!(tree.get::<u64>("boot.log.maxSize"), Some(10));
        assert_eq!(tree.get::<bool>("boot.log.compress"), Some(true));
    }

    #[test]
    fn test_existing_file_is_not_overwritten() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("application.yaml");
        std::fs::write(&path, "boot:\n  active: prod\n").unwrap();

        let err = write_default_config(temp_dir.path()).unwrap_err();

        assert!(matches!(err, ConfigError::AlreadyExists(ref p) if p == &path));
        assert!(!err.is_fatal());
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "boot:\n  active: prod\n"
        );
    }

    #[test]
    fn test_missing_directory_is_io_error() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing");

        assert!(matches!(
            write_default_config(&missing),
            Err(ConfigError::Io { .. })
        ));
    }
}
