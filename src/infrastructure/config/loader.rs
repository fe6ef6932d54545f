use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::bind::{Bindable, ConfigRegistry};
use super::discovery::{discover, ProfileKind};
use super::profile::{seed_defaults, ProfileTree};
use crate::domain::models::BootDocument;
use crate::domain::ConfigResult;

/// Default profile file name prefix
pub const DEFAULT_PREFIX: &str = "application";

/// Parsed profiles keyed by classification
#[derive(Debug, Clone, Default)]
pub struct ProfileMap {
    profiles: BTreeMap<ProfileKind, ProfileTree>,
}

impl ProfileMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a profile, replacing any earlier one with the same key
    pub fn insert(&mut self, kind: ProfileKind, tree: ProfileTree) {
        self.profiles.insert(kind, tree);
    }

    pub fn default_profile(&self) -> Option<&ProfileTree> {
        self.profiles.get(&ProfileKind::Default)
    }

    pub fn environment(&self, name: &str) -> Option<&ProfileTree> {
        self.profiles
            .get(&ProfileKind::Environment(name.to_string()))
    }

    /// Names of the environment profiles, sorted
    pub fn environments(&self) -> Vec<&str> {
        self.profiles
            .keys()
            .filter_map(|kind| match kind {
                ProfileKind::Environment(name) => Some(name.as_str()),
                ProfileKind::Default => None,
            })
            .collect()
    }

    /// The default profile with bootstrap fallbacks applied.
    /// An empty tree stands in when no default profile was found.
    pub fn seeded_default(&self) -> ProfileTree {
        seed_defaults(
            self.default_profile()
                .cloned()
                .unwrap_or_else(ProfileTree::empty),
        )
    }
}

/// Outcome of a load-and-bind pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
    /// Default profile file, `None` when only built-in defaults were used
    pub default_profile: Option<PathBuf>,
    /// Override profile applied for the active environment
    pub environment_profile: Option<PathBuf>,
    /// Environment name used to select the override profile
    pub active: String,
    /// Every environment profile discovered
    pub environments: Vec<String>,
}

/// Discovers, parses and binds profiles from one directory
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    dir: PathBuf,
    prefix: String,
}

impl ConfigLoader {
    pub fn new(dir: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            prefix: prefix.into(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Parse every discovered profile.
    ///
    /// # Errors
    /// Any unreadable or malformed profile file fails the whole load.
    pub fn load_profiles(&self) -> ConfigResult<ProfileMap> {
        let mut profiles = ProfileMap::new();

        for file in discover(&self.dir, &self.prefix) {
            let tree = ProfileTree::load(&file.path)?;
            if let ProfileKind::Environment(ref env) = file.kind {
                debug!(env = %env, path = %file.path.display(), "found environment profile");
            }
            profiles.insert(file.kind, tree);
        }

        Ok(profiles)
    }

    /// Load all profiles and bind them into `boot` and then into every
    /// registered target.
    ///
    /// The boot document is bound first because its `boot.active` value
    /// (unless `active_override` is given) selects the environment profile.
    ///
    /// # Errors
    /// Returns the first parse or bind failure.
    pub fn load_and_bind(
        &self,
        active_override: Option<&str>,
        boot: &mut BootDocument,
        registry: &mut ConfigRegistry,
    ) -> ConfigResult<LoadReport> {
        let profiles = self.load_profiles()?;
        bind_profiles(&profiles, active_override, boot, registry)
    }
}

/// Bind a set of loaded profiles.
///
/// Without an override, `boot.active` ends up as the merged value, so an
/// environment profile may set it. With one, it is the override.
///
/// # Errors
/// Returns the first [`crate::domain::ConfigError::Bind`] raised.
pub fn bind_profiles(
    profiles: &ProfileMap,
    active_override: Option<&str>,
    boot: &mut BootDocument,
    registry: &mut ConfigRegistry,
) -> ConfigResult<LoadReport> {
    let default = profiles.seeded_default();
    boot.bind(&default)?;

    let active = active_override.map_or_else(|| boot.boot.active.clone(), str::to_string);
    let environment = profiles.environment(&active);

    if let Some(environment) = environment {
        boot.bind(environment)?;
    }
    if active_override.is_some() {
        boot.boot.active.clone_from(&active);
    }

    registry.bind_all(&default, environment)?;

    info!(
        active = %active,
        environment_profile = environment.is_some(),
        targets = registry.len(),
        "configuration bound"
    );

    Ok(LoadReport {
        default_profile: profiles
            .default_profile()
            .and_then(ProfileTree::source)
            .map(Path::to_path_buf),
        environment_profile: environment
            .and_then(ProfileTree::source)
            .map(Path::to_path_buf),
        active,
        environments: profiles
            .environments()
            .into_iter()
            .map(str::to_string)
            .collect(),
    })
}
