//! Update selected items.
//!
//! Attributes are merged by default: keys in the new map overwrite, everything else
//! stays. With `replace` the new map becomes the whole attribute set. In both modes the
//! schema attribute keeps its current value; a schema key in the new map is ignored.
//!
//! A new secret replaces the stored one outright.

use crate::attributes::{select, Filter};
use crate::commands::{done_message, CmdMessage, CmdResult, CollectionContext};
use crate::error::{KeyrakenError, Result};
use crate::model::{Attributes, SCHEMA_ATTRIBUTE};
use crate::secret::{SecretInput, SecretString};
use crate::store::SecretBackend;
use tracing::{debug, warn};

/// What to change on each selected item.
#[derive(Clone, Default)]
pub struct ItemChanges {
    pub new_attributes: Option<Attributes>,
    pub new_secret: Option<SecretString>,
    pub replace: bool,
}

impl ItemChanges {
    /// Empty maps and empty secrets count as "not supplied".
    pub fn is_noop(&self) -> bool {
        let no_attrs = self.new_attributes.as_ref().map_or(true, |a| a.is_empty());
        let no_secret = self.new_secret.as_ref().map_or(true, |s| s.is_empty());
        no_attrs && no_secret
    }
}

/// Reject an update that cannot change anything, before any backend call or prompt.
pub fn ensure_changes_requested(
    new_attributes: Option<&Attributes>,
    new_secret: &SecretInput,
) -> Result<()> {
    let no_attrs = new_attributes.map_or(true, |a| a.is_empty());
    if no_attrs && matches!(new_secret, SecretInput::Absent) {
        return Err(KeyrakenError::NoOpUpdate);
    }
    Ok(())
}

/// Compute the attribute map after an update.
pub fn apply_attributes(current: &Attributes, delta: &Attributes, replace: bool) -> Attributes {
    let mut next = if replace {
        Attributes::new()
    } else {
        current.clone()
    };

    for (key, value) in delta {
        if key == SCHEMA_ATTRIBUTE {
            continue;
        }
        next.insert(key.clone(), value.clone());
    }

    match current.get(SCHEMA_ATTRIBUTE) {
        Some(schema) => {
            next.insert(SCHEMA_ATTRIBUTE.to_string(), schema.clone());
        }
        None => {
            next.remove(SCHEMA_ATTRIBUTE);
        }
    }
    next
}

pub fn run<B: SecretBackend>(
    backend: &B,
    ctx: &CollectionContext,
    filter: &Filter,
    multiple: bool,
    changes: &ItemChanges,
) -> Result<CmdResult> {
    if changes.is_noop() {
        return Err(KeyrakenError::NoOpUpdate);
    }
    ctx.ensure_unlocked()?;

    let delta = changes
        .new_attributes
        .as_ref()
        .filter(|a| !a.is_empty());
    let secret = changes.new_secret.as_ref().filter(|s| !s.is_empty());

    let mut result = CmdResult::default();
    if delta.is_some_and(|d| d.contains_key(SCHEMA_ATTRIBUTE)) {
        warn!("ignoring {} in new attributes", SCHEMA_ATTRIBUTE);
        result.add_message(CmdMessage::warning(format!(
            "{} cannot be changed and was ignored",
            SCHEMA_ATTRIBUTE
        )));
    }

    for matched in select(backend, &ctx.collection, filter, multiple)? {
        if let Some(secret) = secret {
            backend.set_secret(&matched.item, secret.as_bytes())?;
        }
        if let Some(delta) = delta {
            let next = apply_attributes(&matched.attributes, delta, changes.replace);
            if next != matched.attributes {
                backend.set_attributes(&matched.item, &next)?;
            }
        }
        debug!(item = %matched.item, replace = changes.replace, "item updated");
        result.affected_items.push(matched.item);
    }

    if result.affected_items.is_empty() {
        result.add_message(CmdMessage::info("No items matched, nothing updated"));
    } else {
        result.add_message(CmdMessage::success(done_message(
            result.affected_items.len(),
            "updated",
        )));
    }
    Ok(result)
}
