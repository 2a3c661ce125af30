//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer. It serves as the single
//! entry point for all keyraken operations, regardless of the UI being used.
//!
//! ## Role and Responsibilities
//!
//! The API facade:
//! - **Dispatches** to the appropriate command function
//! - **Resolves secrets** through the injected [`SecretProvider`]
//! - **Returns structured types** (`Result<CmdResult>`)
//!
//! ## What the API Does NOT Do
//!
//! The API explicitly avoids:
//! - **Business logic**: That belongs in `commands/*.rs`
//! - **I/O operations**: No stdout, stderr, or JSON formatting
//! - **Argument parsing**: JSON maps arrive already validated
//!
//! ## Collection Context
//!
//! Every item operation takes the [`CollectionContext`] returned by [`KeyrakenApi::open`].
//! A typical invocation is:
//!
//! ```text
//! open(name, unlock) -> ctx
//! read_items(&ctx, ...) / update_items(&ctx, ...) / ...
//! finish(&ctx, relock, outcome)
//! ```
//!
//! `finish` relocks when asked to, whatever the outcome. A relock failure is logged and
//! the outcome (including a use-case error) is returned unchanged.
//!
//! ## Generic Over SecretBackend
//!
//! `KeyrakenApi<B: SecretBackend>` is generic over the backend:
//! - Production: `KeyrakenApi<DbusBackend>`
//! - Testing: `KeyrakenApi<MemBackend>`
//!
//! ## Testing Strategy
//!
//! API tests should verify:
//! - Secrets are resolved (or not) as the tri-state demands
//! - Relock happens on success and on failure
//!
//! API tests should **not** verify:
//! - Command logic (tested in command modules)
//! - Filter semantics (tested in `attributes`)

use crate::attributes::Filter;
use crate::commands::{self, CmdResult, CollectionContext};
use crate::error::{KeyrakenError, Result};
use crate::model::Attributes;
use crate::secret::{SecretInput, SecretProvider};
use crate::store::SecretBackend;
use tracing::warn;

/// The main API facade for keyraken operations.
pub struct KeyrakenApi<B: SecretBackend> {
    backend: B,
    provider: Box<dyn SecretProvider>,
}

impl<B: SecretBackend> KeyrakenApi<B> {
    pub fn new(backend: B, provider: Box<dyn SecretProvider>) -> Self {
        Self { backend, provider }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Resolve a collection by name, unlocking it on the way when `unlock` is set.
    pub fn open(&self, name: &str, unlock: bool) -> Result<CollectionContext> {
        commands::collection::open(&self.backend, name, unlock)
    }

    pub fn new_collection(&self, name: &str, password: bool) -> Result<CmdResult> {
        commands::collection::new(&self.backend, name, password)
    }

    /// Create an item. Items always carry a secret, so an absent one is prompted for.
    pub fn create_item(
        &self,
        ctx: &CollectionContext,
        label: &str,
        attributes: Attributes,
        secret: SecretInput,
    ) -> Result<CmdResult> {
        ctx.ensure_unlocked()?;
        let secret = match secret {
            SecretInput::Absent => SecretInput::Prompt,
            other => other,
        };
        let secret = secret
            .resolve(self.provider.as_ref())?
            .ok_or(KeyrakenError::NoSecretProvided)?;
        commands::create::run(&self.backend, ctx, label, attributes, &secret)
    }

    pub fn read_items(
        &self,
        ctx: &CollectionContext,
        filter: &Filter,
        multiple: bool,
    ) -> Result<CmdResult> {
        commands::read::run(&self.backend, ctx, filter, multiple)
    }

    pub fn update_items(
        &self,
        ctx: &CollectionContext,
        filter: &Filter,
        multiple: bool,
        new_attributes: Option<Attributes>,
        new_secret: SecretInput,
        replace: bool,
    ) -> Result<CmdResult> {
        commands::update::ensure_changes_requested(new_attributes.as_ref(), &new_secret)?;
        ctx.ensure_unlocked()?;

        let changes = commands::update::ItemChanges {
            new_attributes,
            new_secret: new_secret.resolve(self.provider.as_ref())?,
            replace,
        };
        commands::update::run(&self.backend, ctx, filter, multiple, &changes)
    }

    pub fn delete_items(
        &self,
        ctx: &CollectionContext,
        filter: &Filter,
        multiple: bool,
        delete_attributes: Option<&Attributes>,
    ) -> Result<CmdResult> {
        commands::delete::run(&self.backend, ctx, filter, multiple, delete_attributes)
    }

    pub fn list_items(&self, ctx: &CollectionContext, with_secrets: bool) -> Result<CmdResult> {
        commands::list::run(&self.backend, ctx, with_secrets)
    }

    pub fn relock(&self, ctx: &CollectionContext) -> Result<CollectionContext> {
        commands::collection::relock_collection(&self.backend, ctx.clone())
    }

    /// Close out an invocation: relock if asked, then hand back `outcome` as is.
    pub fn finish<T>(&self, ctx: &CollectionContext, relock: bool, outcome: Result<T>) -> Result<T> {
        if relock {
            if let Err(e) = self.relock(ctx) {
                warn!(collection = ctx.name(), "failed to relock collection: {}", e);
            }
        }
        outcome
    }
}
