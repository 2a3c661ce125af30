//! # keyrakenapp
//!
//! Library side of keyraken: a command line client for a secret-service backend
//! (e.g. GNOME Keyring via D-Bus). It stores, finds, updates and deletes secret items
//! inside named collections, selecting items by attribute, label and path constraints.
//!
//! ## Layers
//!
//! ```text
//! CLI (keyraken crate) -> api -> commands -> attributes (filter engine) -> store (backend)
//! ```
//!
//! - [`api`]: facade used by every UI, see [`api::KeyrakenApi`]
//! - [`commands`]: one module per use-case, pure logic over a backend
//! - [`attributes`]: JSON attribute maps and the AND/OR filter engine
//! - [`store`]: the [`store::SecretBackend`] trait with D-Bus and in-memory implementations
//! - [`secret`]: secret input and the prompt capability
//! - [`config`]: user configuration
//! - [`model`] and [`error`]: shared types
//!
//! Nothing in this crate writes to stdout or stderr; all diagnostics go through `tracing`.

pub mod api;
pub mod attributes;
pub mod commands;
pub mod config;
pub mod error;
pub mod model;
pub mod secret;
pub mod store;

#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;
