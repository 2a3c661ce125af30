use crate::commands::{CmdMessage, CmdResult, CollectionContext};
use crate::error::Result;
use crate::model::{with_schema, Attributes};
use crate::store::SecretBackend;
use tracing::debug;

/// Create one item. Duplicates are allowed; nothing is replaced.
pub fn run<B: SecretBackend>(
    backend: &B,
    ctx: &CollectionContext,
    label: &str,
    attributes: Attributes,
    secret: &str,
) -> Result<CmdResult> {
    ctx.ensure_unlocked()?;

    let attributes = with_schema(attributes);
    let item = backend.create_item(&ctx.collection, label, &attributes, secret.as_bytes())?;
    debug!(collection = ctx.name(), item = %item, "item created");

    let mut result = CmdResult::default();
    result.affected_items.push(item);
    result.add_message(CmdMessage::success("Item created successfully"));
    Ok(result)
}
