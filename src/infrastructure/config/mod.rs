//! Configuration management infrastructure
//!
//! Profile-based configuration using figment:
//! - Discovery of `<prefix>.yaml` / `<prefix>-<env>.yaml` files
//! - YAML profile trees with dotted-path lookup
//! - Built-in bootstrap defaults seeded under the default profile
//! - Default-then-environment binding into registered targets

pub mod bind;
pub mod discovery;
pub mod loader;
pub mod profile;
pub mod writer;

pub use crate::domain::ConfigError;
pub use bind::{Bindable, ConfigRegistry, Registration};
pub use discovery::{discover, DiscoveredFile, ProfileKind};
pub use loader::{bind_profiles, ConfigLoader, LoadReport, ProfileMap, DEFAULT_PREFIX};
pub use profile::{seed_defaults, ProfileTree};
pub use writer::{write_default_config, DEFAULT_CONFIG_FILE};
