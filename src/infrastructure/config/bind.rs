//! Binding profile trees into configuration targets
//!
//! Targets implement [`Bindable`]. Any type that is both `Serialize` and
//! `DeserializeOwned` gets an implementation for free: its current value is
//! layered under the profile, so fields the profile does not mention keep
//! the value they had before the call.
//!
//! Profile keys are lowercase. Before layering they are matched against the
//! target's serialized field names ignoring case, so a field renamed to
//! `maxSize` still picks up a `maxsize` key.

use std::any::{type_name, Any};

use figment::providers::Serialized;
use figment::value::{Dict, Value};
use figment::Figment;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::profile::ProfileTree;
use crate::domain::{ConfigError, ConfigResult};

/// A configuration target that can populate itself from a profile
pub trait Bindable {
    /// Overwrite the fields `profile` defines, leaving the others untouched.
    ///
    /// # Errors
    /// Returns [`ConfigError::Bind`] when a profile value does not fit the
    /// target's shape.
    fn bind(&mut self, profile: &ProfileTree) -> ConfigResult<()>;
}

impl<T> Bindable for T
where
    T: Serialize + DeserializeOwned,
{
    fn bind(&mut self, profile: &ProfileTree) -> ConfigResult<()> {
        let bind_error = |source: figment::Error| ConfigError::Bind {
            target: type_name::<Self>(),
            source: Box::new(source),
        };

        let current = Value::serialize(&*self).map_err(bind_error)?;
        let values = profile.values().map_err(bind_error)?;
        let values = match current.as_dict() {
            Some(fields) => align_keys(values, fields),
            None => values,
        };

        let bound: Self = Figment::from(Serialized::defaults(&*self))
            .merge(Serialized::defaults(values))
            .extract()
            .map_err(bind_error)?;

        *self = bound;
        Ok(())
    }
}

/// Rename each key in `values` to the field in `fields` it matches
/// ignoring case, recursing into nested tables. Unmatched keys are kept.
fn align_keys(values: Dict, fields: &Dict) -> Dict {
    values
        .into_iter()
        .map(|(key, value)| {
            let matched = fields
                .get_key_value(&key)
                .or_else(|| fields.iter().find(|(name, _)| name.to_lowercase() == key));
            let Some((name, field)) = matched else {
                return (key, value);
            };
            let value = match (value, field.as_dict()) {
                (Value::Dict(tag, dict), Some(nested)) => Value::Dict(tag, align_keys(dict, nested)),
                (value, _) => value,
            };
            (name.clone(), value)
        })
        .collect()
}

/// Object-safe view of a registered target
trait Target: Send + Sync {
    fn bind_profile(&mut self, profile: &ProfileTree) -> ConfigResult<()>;
    fn as_any(&self) -> &dyn Any;
}

impl<T> Target for T
where
    T: Bindable + Any + Send + Sync,
{
    fn bind_profile(&mut self, profile: &ProfileTree) -> ConfigResult<()> {
        Bindable::bind(self, profile)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// One registered configuration target
pub struct Registration {
    type_name: &'static str,
    target: Box<dyn Target>,
}

impl Registration {
    pub fn new<T>(target: T) -> Self
    where
        T: Bindable + Any + Send + Sync,
    {
        Self {
            type_name: type_name::<T>(),
            target: Box::new(target),
        }
    }

    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.target.as_any().downcast_ref::<T>()
    }

    fn bind(&mut self, profile: &ProfileTree) -> ConfigResult<()> {
        self.target.bind_profile(profile)
    }
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}

/// Ordered list of caller-supplied configuration targets.
///
/// Registering the same type twice binds it twice.
#[derive(Debug, Default)]
pub struct ConfigRegistry {
    entries: Vec<Registration>,
}

impl ConfigRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, registration: Registration) {
        self.entries.push(registration);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First registered target of type `T`
    pub fn get<T: Any>(&self) -> Option<&T> {
        self.entries.iter().find_map(Registration::downcast_ref::<T>)
    }

    /// Registered targets in registration order
    pub fn iter(&self) -> impl Iterator<Item = &Registration> {
        self.entries.iter()
    }

    /// Bind `default` and then, when present, `environment` into every
    /// target in registration order. Stops at the first failure.
    ///
    /// # Errors
    /// Returns the first [`ConfigError::Bind`] raised by a target.
    pub fn bind_all(
        &mut self,
        default: &ProfileTree,
        environment: Option<&ProfileTree>,
    ) -> ConfigResult<()> {
        for entry in &mut self.entries {
            tracing::debug!(target_type = entry.type_name, "binding configuration target");
            entry.bind(default)?;
            if let Some(environment) = environment {
                entry.bind(environment)?;
            }
        }
        Ok(())
    }
}

impl Extend<Registration> for ConfigRegistry {
    fn extend<I: IntoIterator<Item = Registration>>(&mut self, iter: I) {
        self.entries.extend(iter);
    }
}
