use super::backend::SecretBackend;
use crate::error::{KeyrakenError, Result};
use crate::model::{Attributes, CollectionRef, ItemRef};
use std::cell::RefCell;

const COLLECTION_PREFIX: &str = "/org/freedesktop/secrets/collection";

#[derive(Clone)]
struct MemItem {
    item: ItemRef,
    label: String,
    attributes: Attributes,
    secret: Vec<u8>,
}

struct MemCollection {
    reference: CollectionRef,
    locked: bool,
    items: Vec<MemItem>,
    next_id: u64,
}

/// In-memory secret service for testing.
///
/// Uses `RefCell` for interior mutability since keyraken is single-threaded.
/// Items keep insertion order, which plays the role of the service's enumeration order.
/// Like the real service, a locked collection still answers searches and attribute
/// reads, but refuses secret access and writes.
#[derive(Default)]
pub struct MemBackend {
    collections: RefCell<Vec<MemCollection>>,
    simulate_write_error: RefCell<bool>,
    dismiss_unlock_prompt: RefCell<bool>,
    search_log: RefCell<Vec<Attributes>>,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend with one unlocked collection already present.
    pub fn with_collection(name: &str) -> Self {
        let backend = Self::new();
        backend.add_collection(name, false);
        backend
    }

    /// Test helper to add a collection in a given lock state.
    pub fn add_collection(&self, name: &str, locked: bool) -> CollectionRef {
        let reference = CollectionRef::new(name, format!("{}/{}", COLLECTION_PREFIX, name));
        self.collections.borrow_mut().push(MemCollection {
            reference: reference.clone(),
            locked,
            items: Vec::new(),
            next_id: 1,
        });
        reference
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        *self.simulate_write_error.borrow_mut() = simulate;
    }

    /// Make the next unlock requests behave as if the user dismissed the prompt.
    pub fn set_dismiss_unlock_prompt(&self, dismiss: bool) {
        *self.dismiss_unlock_prompt.borrow_mut() = dismiss;
    }

    /// Queries received by `search_items`, oldest first.
    pub fn search_log(&self) -> Vec<Attributes> {
        self.search_log.borrow().clone()
    }

    fn check_write(&self) -> Result<()> {
        if *self.simulate_write_error.borrow() {
            return Err(KeyrakenError::Backend("Simulated write error".to_string()));
        }
        Ok(())
    }

    fn with_collection_mut<T>(
        &self,
        collection: &CollectionRef,
        f: impl FnOnce(&mut MemCollection) -> Result<T>,
    ) -> Result<T> {
        let mut collections = self.collections.borrow_mut();
        let found = collections
            .iter_mut()
            .find(|c| c.reference.path == collection.path)
            .ok_or_else(|| {
                KeyrakenError::NotFound(format!("Collection '{}'", collection.label))
            })?;
        f(found)
    }

    /// Run `f` on an item. `needs_unlocked` guards secret access and writes.
    fn with_item_mut<T>(
        &self,
        item: &ItemRef,
        needs_unlocked: bool,
        f: impl FnOnce(&mut MemItem) -> T,
    ) -> Result<T> {
        let mut collections = self.collections.borrow_mut();
        for collection in collections.iter_mut() {
            let locked = collection.locked;
            let label = collection.reference.label.clone();
            if let Some(found) = collection.items.iter_mut().find(|i| i.item == *item) {
                if needs_unlocked && locked {
                    return Err(KeyrakenError::CollectionLocked(label));
                }
                return Ok(f(found));
            }
        }
        Err(KeyrakenError::NotFound(format!("Item {}", item)))
    }
}

impl SecretBackend for MemBackend {
    fn list_collections(&self) -> Result<Vec<CollectionRef>> {
        Ok(self
            .collections
            .borrow()
            .iter()
            .map(|c| c.reference.clone())
            .collect())
    }

    fn create_collection(&self, name: &str, want_password: bool) -> Result<CollectionRef> {
        self.check_write()?;
        Ok(self.add_collection(name, want_password))
    }

    fn is_locked(&self, collection: &CollectionRef) -> Result<bool> {
        self.with_collection_mut(collection, |c| Ok(c.locked))
    }

    fn unlock(&self, collection: &CollectionRef) -> Result<()> {
        if *self.dismiss_unlock_prompt.borrow() {
            return Err(KeyrakenError::UnlockCancelled(collection.label.clone()));
        }
        self.with_collection_mut(collection, |c| {
            c.locked = false;
            Ok(())
        })
    }

    fn lock(&self, collection: &CollectionRef) -> Result<()> {
        self.with_collection_mut(collection, |c| {
            c.locked = true;
            Ok(())
        })
    }

    fn create_item(
        &self,
        collection: &CollectionRef,
        label: &str,
        attributes: &Attributes,
        secret: &[u8],
    ) -> Result<ItemRef> {
        self.check_write()?;
        self.with_collection_mut(collection, |c| {
            if c.locked {
                return Err(KeyrakenError::CollectionLocked(c.reference.label.clone()));
            }
            let item = ItemRef::new(format!("{}/{}", c.reference.path, c.next_id));
            c.next_id += 1;
            c.items.push(MemItem {
                item: item.clone(),
                label: label.to_string(),
                attributes: attributes.clone(),
                secret: secret.to_vec(),
            });
            Ok(item)
        })
    }

    fn search_items(&self, collection: &CollectionRef, query: &Attributes) -> Result<Vec<ItemRef>> {
        self.search_log.borrow_mut().push(query.clone());
        self.with_collection_mut(collection, |c| {
            Ok(c.items
                .iter()
                .filter(|i| query.iter().all(|(k, v)| i.attributes.get(k) == Some(v)))
                .map(|i| i.item.clone())
                .collect())
        })
    }

    fn get_label(&self, item: &ItemRef) -> Result<String> {
        self.with_item_mut(item, false, |i| i.label.clone())
    }

    fn get_secret(&self, item: &ItemRef) -> Result<Vec<u8>> {
        self.with_item_mut(item, true, |i| i.secret.clone())
    }

    fn set_secret(&self, item: &ItemRef, secret: &[u8]) -> Result<()> {
        self.check_write()?;
        self.with_item_mut(item, true, |i| i.secret = secret.to_vec())
    }

    fn get_attributes(&self, item: &ItemRef) -> Result<Attributes> {
        self.with_item_mut(item, false, |i| i.attributes.clone())
    }

    fn set_attributes(&self, item: &ItemRef, attributes: &Attributes) -> Result<()> {
        self.check_write()?;
        self.with_item_mut(item, true, |i| i.attributes = attributes.clone())
    }

    fn delete_item(&self, item: &ItemRef) -> Result<()> {
        self.check_write()?;
        let mut collections = self.collections.borrow_mut();
        for collection in collections.iter_mut() {
            if let Some(pos) = collection.items.iter().position(|i| i.item == *item) {
                if collection.locked {
                    return Err(KeyrakenError::CollectionLocked(
                        collection.reference.label.clone(),
                    ));
                }
                collection.items.remove(pos);
                return Ok(());
            }
        }
        Err(KeyrakenError::NotFound(format!("Item {}", item)))
    }
}
