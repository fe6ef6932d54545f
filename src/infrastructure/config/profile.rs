//! Parsed profile trees
//!
//! A [`ProfileTree`] is the key/value content of one YAML profile, backed by
//! a [`Figment`] so values can be addressed by dotted path
//! (`boot.log.level`) and layered onto bind targets.
//!
//! Keys are case-insensitive: every mapping key is lowercased when the
//! profile is parsed, and dotted paths are lowercased on lookup. Keys whose
//! value is null (`log:` with nothing under it, or `level:` left empty) are
//! dropped, so they count as absent.

use std::fs;
use std::path::{Path, PathBuf};

use figment::providers::Serialized;
use figment::value::{Dict, Value};
use figment::{Figment, Profile, Provider};
use serde::de::DeserializeOwned;

use crate::domain::models::BootConfig;
use crate::domain::{ConfigError, ConfigResult};

/// Key/value tree of a single profile
#[derive(Debug, Clone)]
pub struct ProfileTree {
    source: Option<PathBuf>,
    figment: Figment,
}

impl ProfileTree {
    /// A tree with no keys, used when no default profile exists on disk
    pub fn empty() -> Self {
        Self {
            source: None,
            figment: Figment::new(),
        }
    }

    /// Read and parse a profile file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or is not a YAML mapping.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let mut tree = Self::parse(&contents, path)?;
        tree.source = Some(path.to_path_buf());
        Ok(tree)
    }

    /// Parse YAML text that did not come from a file.
    ///
    /// # Errors
    /// Returns an error if the text is not a YAML mapping.
    pub fn from_yaml(contents: &str) -> ConfigResult<Self> {
        Self::parse(contents, Path::new("<inline>"))
    }

    fn parse(contents: &str, origin: &Path) -> ConfigResult<Self> {
        let document: serde_yaml::Value =
            serde_yaml::from_str(contents).map_err(|source| ConfigError::Parse {
                path: origin.to_path_buf(),
                source,
            })?;

        // Empty and comment-only files parse to null
        if document.is_null() {
            return Ok(Self::empty());
        }

        let figment = Figment::from(Serialized::defaults(normalize(document)));
        figment
            .data()
            .map_err(|source| ConfigError::InvalidProfile {
                path: origin.to_path_buf(),
                source: Box::new(source),
            })?;

        Ok(Self {
            source: None,
            figment,
        })
    }

    /// File this tree was loaded from, if any
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Whether a value exists at the dotted `path`
    pub fn contains(&self, path: &str) -> bool {
        self.figment.contains(&path.to_lowercase())
    }

    /// Raw value at the dotted `path`
    pub fn find_value(&self, path: &str) -> Option<Value> {
        self.figment.find_value(&path.to_lowercase()).ok()
    }

    /// Typed value at the dotted `path`; `None` when absent or mistyped
    pub fn get<T: DeserializeOwned>(&self, path: &str) -> Option<T> {
        self.figment.extract_inner(&path.to_lowercase()).ok()
    }

    /// Fill keys that are absent from this tree with values from `provider`.
    /// Keys already present are never overwritten.
    #[must_use]
    pub fn join(self, provider: impl Provider) -> Self {
        Self {
            source: self.source,
            figment: self.figment.join(provider),
        }
    }

    /// Top-level keys and values of the tree
    pub(crate) fn values(&self) -> figment::Result<Dict> {
        let mut data = self.figment.data()?;
        Ok(data.remove(&Profile::Default).unwrap_or_default())
    }
}

/// Lowercase mapping keys and drop null-valued entries, at every depth
fn normalize(value: serde_yaml::Value) -> serde_yaml::Value {
    use serde_yaml::Value as Yaml;

    match value {
        Yaml::Mapping(mapping) => Yaml::Mapping(
            mapping
                .into_iter()
                .filter(|(_, value)| !value.is_null())
                .map(|(key, value)| {
                    let key = match key {
                        Yaml::String(key) => Yaml::String(key.to_lowercase()),
                        other => other,
                    };
                    (key, normalize(value))
                })
                .collect(),
        ),
        Yaml::Sequence(items) => Yaml::Sequence(items.into_iter().map(normalize).collect()),
        other => other,
    }
}

/// Apply the built-in bootstrap fallbacks to the default profile.
///
/// Seeds `boot.active`, and every `boot.log.*` key, only where the profile
/// does not already define them. The seeded keys are lowercase, matching
/// the normalized tree.
#[must_use]
pub fn seed_defaults(tree: ProfileTree) -> ProfileTree {
    tree.join(Serialized::default("boot", BootConfig::default()))
}
