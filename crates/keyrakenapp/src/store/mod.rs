//! # Backend Layer
//!
//! Keyraken stores nothing itself. Collections, items, attributes and secrets live in
//! the session's secret service, and this module defines how keyraken talks to it.
//!
//! The [`SecretBackend`] trait is the whole contract: a thin, logic-free mapping of the
//! service's operations (list/create collections, lock/unlock, create/search/delete
//! items, get/set secrets and attributes). Filtering, merge semantics and cardinality
//! checks all live above it, in `attributes` and `commands`.
//!
//! ## Search semantics
//!
//! `search_items` is exact-match and AND-only, because that is all the real service
//! offers. An empty query means "every item in the collection", in enumeration order.
//!
//! ## Locking
//!
//! A locked collection can still be searched and its items' labels and attributes read.
//! Secrets and writes need the collection unlocked; backends report those attempts as
//! `CollectionLocked`.
//!
//! ## Implementations
//!
//! - [`dbus_backend::DbusBackend`]: the freedesktop Secret Service over the session bus
//!   (GNOME Keyring, KWallet, KeePassXC...). Behind the default `dbus` feature.
//! - [`mem_backend::MemBackend`]: in-memory service for testing logic without a bus.

pub mod backend;
#[cfg(feature = "dbus")]
pub mod dbus_backend;
pub mod mem_backend;

pub use backend::SecretBackend;
