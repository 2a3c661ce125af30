//! # Command Layer
//!
//! This module contains the **core business logic** of keyraken. Each use-case lives in
//! its own submodule as plain Rust functions over a [`SecretBackend`](crate::store::SecretBackend).
//!
//! ## Role and Responsibilities
//!
//! - Select target items through the filter engine
//! - Apply merge/replace and partial-delete semantics
//! - Enforce the lock state carried by [`CollectionContext`]
//! - Return structured [`CmdResult`] values
//!
//! ## What Commands Do NOT Do
//!
//! - **Any I/O**: no stdout, stderr or JSON formatting
//! - **Prompting**: secrets arrive already resolved (see [`crate::secret`])
//! - **Argument parsing**: that's the CLI layer's job
//! - **Exit codes**: return `Result`, let the caller decide
//! - **Recovery**: errors are returned unchanged, nothing is retried
//!
//! ## Testing Strategy
//!
//! **This is where the lion's share of testing lives.** Command tests run against
//! `MemBackend` and check both the returned `CmdResult` and the backend state.
//!
//! ## Command Modules
//!
//! - [`collection`]: open, create (`new`), unlock and relock collections
//! - [`create`]: create an item
//! - [`read`]: read items with their secrets
//! - [`update`]: merge or replace attributes, replace secrets
//! - [`delete`]: delete items or some of their attributes
//! - [`list`]: enumerate a collection

use crate::model::{ItemRecord, ItemRef};
use serde::Serialize;

pub mod collection;
pub mod create;
pub mod delete;
pub mod list;
pub mod read;
pub mod update;

pub use collection::CollectionContext;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
}

#[derive(Debug, Clone, Serialize)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    /// Items that were created, modified or deleted.
    pub affected_items: Vec<ItemRef>,
    /// Records to display (`read`, `list`).
    pub listed_items: Vec<ItemRecord>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_listed_items(mut self, items: Vec<ItemRecord>) -> Self {
        self.listed_items = items;
        self
    }
}

/// Pluralized confirmation, e.g. "Item updated successfully" / "3 items updated successfully".
pub(crate) fn done_message(count: usize, verb: &str) -> String {
    if count == 1 {
        format!("Item {} successfully", verb)
    } else {
        format!("{} items {} successfully", count, verb)
    }
}
