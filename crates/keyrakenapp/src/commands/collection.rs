//! Collection lifecycle: open, `new`, unlock and relock.
//!
//! Lock state is tracked per invocation in a [`CollectionContext`] that the API hands to
//! every item command. Nothing is remembered between runs.
//!
//! Whether a freshly created collection ends up locked is up to the service (and its
//! password prompt), so `new` queries the state afterwards instead of assuming it.

use crate::commands::{CmdMessage, CmdResult};
use crate::error::{KeyrakenError, Result};
use crate::model::{CollectionRef, LockState};
use crate::store::SecretBackend;
use tracing::{debug, info};

/// The collection a command operates on, with its last observed lock state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionContext {
    pub collection: CollectionRef,
    pub state: LockState,
}

impl CollectionContext {
    pub fn name(&self) -> &str {
        &self.collection.label
    }

    /// Item operations call this instead of unlocking implicitly.
    pub fn ensure_unlocked(&self) -> Result<()> {
        match self.state {
            LockState::Locked => Err(KeyrakenError::CollectionLocked(self.name().to_string())),
            LockState::Unlocked | LockState::Unknown => Ok(()),
        }
    }
}

/// Find a collection by exact label.
pub fn find<B: SecretBackend>(backend: &B, name: &str) -> Result<CollectionRef> {
    backend
        .list_collections()?
        .into_iter()
        .find(|c| c.label == name)
        .ok_or_else(|| KeyrakenError::NotFound(format!("Collection '{}' not found", name)))
}

/// Resolve `name` and observe its lock state. With `unlock`, a locked collection is
/// unlocked on the way.
pub fn open<B: SecretBackend>(backend: &B, name: &str, unlock: bool) -> Result<CollectionContext> {
    let collection = find(backend, name)?;
    let state = LockState::from_locked(backend.is_locked(&collection)?);
    debug!(collection = name, %state, "opened collection");

    let ctx = CollectionContext { collection, state };
    if unlock && ctx.state == LockState::Locked {
        return unlock_collection(backend, ctx);
    }
    Ok(ctx)
}

/// Ask the service to unlock. The service owns the prompt; if it comes back still
/// locked the user did not complete it.
pub fn unlock_collection<B: SecretBackend>(
    backend: &B,
    ctx: CollectionContext,
) -> Result<CollectionContext> {
    if ctx.state == LockState::Unlocked {
        return Ok(ctx);
    }

    info!(
        collection = ctx.name(),
        "collection is locked, unlocking via service prompt"
    );
    backend.unlock(&ctx.collection)?;

    if backend.is_locked(&ctx.collection)? {
        return Err(KeyrakenError::UnlockCancelled(ctx.name().to_string()));
    }
    Ok(CollectionContext {
        state: LockState::Unlocked,
        ..ctx
    })
}

pub fn relock_collection<B: SecretBackend>(
    backend: &B,
    ctx: CollectionContext,
) -> Result<CollectionContext> {
    if backend.is_locked(&ctx.collection)? {
        return Ok(CollectionContext {
            state: LockState::Locked,
            ..ctx
        });
    }

    backend.lock(&ctx.collection)?;
    info!(collection = ctx.name(), "collection relocked");
    Ok(CollectionContext {
        state: LockState::Locked,
        ..ctx
    })
}

/// Create a collection. With `password`, the service is asked to protect it.
pub fn new<B: SecretBackend>(backend: &B, name: &str, password: bool) -> Result<CmdResult> {
    if name.trim().is_empty() {
        return Err(KeyrakenError::InvalidInput(
            "Collection name cannot be empty".to_string(),
        ));
    }
    if backend.list_collections()?.iter().any(|c| c.label == name) {
        return Err(KeyrakenError::InvalidInput(format!(
            "Keyring collection '{}' already exists",
            name
        )));
    }

    let collection = backend.create_collection(name, password)?;
    let state = LockState::from_locked(backend.is_locked(&collection)?);
    info!(collection = name, %state, "collection created");

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Keyring collection '{}' created successfully",
        name
    )));
    result.add_message(CmdMessage::info(format!("Collection is {}", state)));
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::mem_backend::MemBackend;

    #[test]
    fn open_unknown_collection_is_not_found() {
        let backend = MemBackend::with_collection("login");
        assert!(matches!(
            open(&backend, "work", false),
            Err(KeyrakenError::NotFound(_))
        ));
    }

    #[test]
    fn open_reports_lock_state_without_unlocking() {
        let backend = MemBackend::new();
        backend.add_collection("vault", true);

        let ctx = open(&backend, "vault", false).unwrap();
        assert_eq!(ctx.state, LockState::Locked);
        assert!(matches!(
            ctx.ensure_unlocked(),
            Err(KeyrakenError::CollectionLocked(name)) if name == "vault"
        ));
    }

    #[test]
    fn open_with_unlock_transitions_to_unlocked() {
        let backend = MemBackend::new();
        let col = backend.add_collection("vault", true);

        let ctx = open(&backend, "vault", true).unwrap();
        assert_eq!(ctx.state, LockState::Unlocked);
        assert!(!backend.is_locked(&col).unwrap());
        assert!(ctx.ensure_unlocked().is_ok());
    }

    #[test]
    fn dismissed_unlock_is_unlock_cancelled() {
        let backend = MemBackend::new();
        backend.add_collection("vault", true);
        backend.set_dismiss_unlock_prompt(true);

        assert!(matches!(
            open(&backend, "vault", true),
            Err(KeyrakenError::UnlockCancelled(_))
        ));
    }

    #[test]
    fn relock_locks_an_unlocked_collection() {
        let backend = MemBackend::with_collection("login");
        let ctx = open(&backend, "login", false).unwrap();
        let ctx = relock_collection(&backend, ctx).unwrap();
        assert_eq!(ctx.state, LockState::Locked);
        assert!(backend.is_locked(&ctx.collection).unwrap());
    }

    #[test]
    fn new_reports_observed_state() {
        let backend = MemBackend::new();
        let result = new(&backend, "work", true).unwrap();
        assert!(result.messages[0].content.contains("'work' created"));
        assert_eq!(result.messages[1].content, "Collection is locked");

        let result = new(&backend, "scratch", false).unwrap();
        assert_eq!(result.messages[1].content, "Collection is unlocked");
    }

    #[test]
    fn new_refuses_duplicate_or_empty_name() {
        let backend = MemBackend::with_collection("login");
        assert!(matches!(
            new(&backend, "login", false),
            Err(KeyrakenError::InvalidInput(_))
        ));
        assert!(matches!(
            new(&backend, " ", false),
            Err(KeyrakenError::InvalidInput(_))
        ));
    }
}
