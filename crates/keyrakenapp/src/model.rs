//! # Domain Model: Collections, Items and Records
//!
//! Keyraken does not own any storage. Everything here describes *references* to objects
//! living inside the secret service, plus the record shape used for output.
//!
//! ## References
//!
//! - [`CollectionRef`]: a collection as the backend knows it. Users address collections by
//!   label (`keyraken read login ...`); the object path is what the backend needs.
//! - [`ItemRef`]: an item's object path, e.g. `/org/freedesktop/secrets/collection/login/7`.
//!   This is also the value matched by `--path`.
//!
//! ## Attributes
//!
//! Attribute maps are flat `String -> String` maps. They are kept in a [`BTreeMap`] so
//! JSON output is stable across runs regardless of backend ordering.
//!
//! Every item carries the schema attribute [`SCHEMA_ATTRIBUTE`]. Items created by
//! keyraken get [`GENERIC_SCHEMA`] unless the caller supplies their own value. Updates
//! and attribute deletes never touch it.
//!
//! ## Records
//!
//! [`ItemRecord`] is what `read` and `list` hand back: label, attributes and
//! (optionally) the decoded secret. `list` also fills in `path`.

use crate::error::{KeyrakenError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Reserved attribute identifying the item schema.
pub const SCHEMA_ATTRIBUTE: &str = "xdg:schema";

/// Schema value for generic secret records.
pub const GENERIC_SCHEMA: &str = "org.freedesktop.Secret.Generic";

pub type Attributes = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CollectionRef {
    pub label: String,
    pub path: String,
}

impl CollectionRef {
    pub fn new(label: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            path: path.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ItemRef {
    pub path: String,
}

impl ItemRef {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

impl fmt::Display for ItemRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

/// Lock state of a collection as last observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LockState {
    Unknown,
    Locked,
    Unlocked,
}

impl LockState {
    pub fn from_locked(locked: bool) -> Self {
        if locked {
            LockState::Locked
        } else {
            LockState::Unlocked
        }
    }
}

impl fmt::Display for LockState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LockState::Unknown => write!(f, "unknown"),
            LockState::Locked => write!(f, "locked"),
            LockState::Unlocked => write!(f, "unlocked"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemRecord {
    pub label: String,
    pub attributes: Attributes,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

/// Decode a stored secret for output. Secrets are handled as UTF-8 text.
pub fn decode_secret(item: &ItemRef, bytes: Vec<u8>) -> Result<String> {
    String::from_utf8(bytes).map_err(|_| {
        KeyrakenError::InvalidInput(format!("Secret of item {} is not valid UTF-8", item))
    })
}

/// Add the generic schema marker unless the caller already set a schema.
pub fn with_schema(mut attributes: Attributes) -> Attributes {
    attributes
        .entry(SCHEMA_ATTRIBUTE.to_string())
        .or_insert_with(|| GENERIC_SCHEMA.to_string());
    attributes
}
