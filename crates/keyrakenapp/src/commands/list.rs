use crate::attributes::{select, Filter};
use crate::commands::{CmdResult, CollectionContext};
use crate::error::Result;
use crate::model::ItemRecord;
use crate::store::SecretBackend;

use super::read::record_with_secret;

/// Every item of the collection, in backend order.
///
/// Secrets are only fetched (and decrypted by the service) when `with_secrets` is set.
pub fn run<B: SecretBackend>(
    backend: &B,
    ctx: &CollectionContext,
    with_secrets: bool,
) -> Result<CmdResult> {
    ctx.ensure_unlocked()?;

    let mut records = Vec::new();
    for matched in select(backend, &ctx.collection, &Filter::all(), true)? {
        let path = matched.item.path.clone();
        let record = if with_secrets {
            record_with_secret(backend, matched)?
        } else {
            ItemRecord {
                label: matched.label,
                attributes: matched.attributes,
                secret: None,
                path: None,
            }
        };
        records.push(ItemRecord {
            path: Some(path),
            ..record
        });
    }

    Ok(CmdResult::default().with_listed_items(records))
}
