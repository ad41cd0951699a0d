//! Identity types for avatar instances
//!
//! Instance ids are caller-supplied strings (the embedding application
//! typically derives them from a view or channel id). They are validated
//! once at the registry boundary and treated as opaque afterwards.

use std::fmt;

use crate::{OmoteError, OmoteResult};

/// Avatar instance identity - unique within one registry
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct InstanceId(String);

impl InstanceId {
    /// Validate and construct an instance id.
    ///
    /// Rejects empty and whitespace-only ids; surrounding whitespace is
    /// trimmed so `" a "` and `"a"` name the same instance.
    pub fn parse(raw: &str) -> OmoteResult<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(OmoteError::InvalidInstanceId(raw.to_string()));
        }
        Ok(InstanceId(trimmed.to_string()))
    }

    /// The id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Instance({})", self.0)
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for InstanceId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
