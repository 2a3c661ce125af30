use crate::attributes::{select, Filter, MatchedItem};
use crate::commands::{CmdResult, CollectionContext};
use crate::error::Result;
use crate::model::{decode_secret, ItemRecord};
use crate::store::SecretBackend;

/// Read the items selected by `filter`, secrets included.
///
/// Without `multiple` exactly one item must match.
pub fn run<B: SecretBackend>(
    backend: &B,
    ctx: &CollectionContext,
    filter: &Filter,
    multiple: bool,
) -> Result<CmdResult> {
    ctx.ensure_unlocked()?;

    let records = select(backend, &ctx.collection, filter, multiple)?
        .into_iter()
        .map(|matched| record_with_secret(backend, matched))
        .collect::<Result<Vec<_>>>()?;

    Ok(CmdResult::default().with_listed_items(records))
}

pub(crate) fn record_with_secret<B: SecretBackend>(
    backend: &B,
    matched: MatchedItem,
) -> Result<ItemRecord> {
    let secret = decode_secret(&matched.item, backend.get_secret(&matched.item)?)?;
    Ok(ItemRecord {
        label: matched.label,
        attributes: matched.attributes,
        secret: Some(secret),
        path: None,
    })
}
