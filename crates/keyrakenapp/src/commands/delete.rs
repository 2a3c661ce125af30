use crate::attributes::{select, Filter};
use crate::commands::{done_message, CmdMessage, CmdResult, CollectionContext};
use crate::error::Result;
use crate::model::{Attributes, SCHEMA_ATTRIBUTE};
use crate::store::SecretBackend;
use tracing::{debug, warn};

/// Remove the keys of `names` from `current`. Values in `names` are ignored and the
/// schema attribute always survives.
pub fn strip_attributes(current: &Attributes, names: &Attributes) -> Attributes {
    current
        .iter()
        .filter(|(key, _)| key.as_str() == SCHEMA_ATTRIBUTE || !names.contains_key(*key))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// Delete the selected items, or with `delete_attributes` only the named attributes of
/// each selected item.
pub fn run<B: SecretBackend>(
    backend: &B,
    ctx: &CollectionContext,
    filter: &Filter,
    multiple: bool,
    delete_attributes: Option<&Attributes>,
) -> Result<CmdResult> {
    ctx.ensure_unlocked()?;

    let mut result = CmdResult::default();
    if delete_attributes.is_some_and(|names| names.contains_key(SCHEMA_ATTRIBUTE)) {
        warn!("{} cannot be deleted, skipping it", SCHEMA_ATTRIBUTE);
    }

    for matched in select(backend, &ctx.collection, filter, multiple)? {
        match delete_attributes {
            Some(names) => {
                let next = strip_attributes(&matched.attributes, names);
                if next != matched.attributes {
                    backend.set_attributes(&matched.item, &next)?;
                }
                debug!(item = %matched.item, "attributes deleted");
            }
            None => {
                backend.delete_item(&matched.item)?;
                debug!(item = %matched.item, "item deleted");
            }
        }
        result.affected_items.push(matched.item);
    }

    if result.affected_items.is_empty() {
        result.add_message(CmdMessage::info("No items matched, nothing deleted"));
        return Ok(result);
    }

    let verb = match delete_attributes {
        Some(_) => "attributes deleted",
        None => "deleted",
    };
    let count = result.affected_items.len();
    let message = match (count, delete_attributes) {
        (1, Some(_)) => "Item attributes deleted successfully".to_string(),
        _ => done_message(count, verb),
    };
    result.add_message(CmdMessage::success(message));
    Ok(result)
}
