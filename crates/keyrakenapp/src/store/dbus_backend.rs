use super::backend::SecretBackend;
use crate::error::{KeyrakenError, Result};
use crate::model::{Attributes, CollectionRef, ItemRef};
use secret_service::blocking::{Collection, Item, SecretService};
use secret_service::{EncryptionType, Error as ServiceError};
use std::collections::HashMap;
use tracing::debug;

const SECRET_CONTENT_TYPE: &str = "text/plain";

/// Secret Service backend over the D-Bus session bus.
///
/// References are resolved on every call: collections by matching their object path,
/// items directly from theirs.
pub struct DbusBackend {
    service: SecretService<'static>,
}

impl DbusBackend {
    /// Open a session with the service. Secrets are transferred DH-encrypted.
    pub fn connect() -> Result<Self> {
        let service = SecretService::connect(EncryptionType::Dh).map_err(|e| map_err(e, ""))?;
        debug!("connected to secret service");
        Ok(Self { service })
    }

    fn with_collection<T>(
        &self,
        reference: &CollectionRef,
        f: impl FnOnce(&Collection<'_>) -> std::result::Result<T, ServiceError>,
    ) -> Result<T> {
        let collections = self
            .service
            .get_all_collections()
            .map_err(|e| map_err(e, &reference.label))?;
        let collection = collections
            .iter()
            .find(|c| c.collection_path.as_str() == reference.path)
            .ok_or_else(|| {
                KeyrakenError::NotFound(format!("Collection '{}' not found", reference.label))
            })?;
        f(collection).map_err(|e| map_err(e, &reference.label))
    }

    fn with_item<T>(
        &self,
        reference: &ItemRef,
        f: impl FnOnce(&Item<'_>) -> std::result::Result<T, ServiceError>,
    ) -> Result<T> {
        let path = reference.path.clone().try_into().map_err(|_| {
            KeyrakenError::InvalidInput(format!("Invalid item path '{}'", reference))
        })?;
        let item = self
            .service
            .get_item_by_path(path)
            .map_err(|e| self.item_error(e, reference))?;
        f(&item).map_err(|e| self.item_error(e, reference))
    }

    /// Item failures are reported against the collection holding the item.
    fn item_error(&self, err: ServiceError, reference: &ItemRef) -> KeyrakenError {
        let label = self
            .collection_label_of(reference)
            .unwrap_or_else(|| reference.path.clone());
        map_err(err, &label)
    }

    fn collection_label_of(&self, reference: &ItemRef) -> Option<String> {
        let parent = parent_path(&reference.path)?;
        let collections = self.service.get_all_collections().ok()?;
        let collection = collections
            .iter()
            .find(|c| c.collection_path.as_str() == parent)?;
        collection.get_label().ok()
    }
}

/// Object path of the collection owning `item_path`.
fn parent_path(item_path: &str) -> Option<&str> {
    item_path
        .rsplit_once('/')
        .map(|(parent, _)| parent)
        .filter(|parent| !parent.is_empty())
}

/// Map a service error onto the keyraken taxonomy. `label` names the collection involved.
fn map_err(err: ServiceError, label: &str) -> KeyrakenError {
    match err {
        ServiceError::Prompt => KeyrakenError::UnlockCancelled(label.to_string()),
        ServiceError::Locked => KeyrakenError::CollectionLocked(label.to_string()),
        ServiceError::NoResult => KeyrakenError::NotFound(format!("No result from service ({})", label)),
        other => KeyrakenError::Backend(other.to_string()),
    }
}

fn borrow_attributes(attributes: &Attributes) -> HashMap<&str, &str> {
    attributes
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect()
}

fn collection_ref(collection: &Collection<'_>) -> Result<CollectionRef> {
    let label = collection.get_label().map_err(|e| map_err(e, ""))?;
    Ok(CollectionRef::new(
        label,
        collection.collection_path.as_str(),
    ))
}

impl SecretBackend for DbusBackend {
    fn list_collections(&self) -> Result<Vec<CollectionRef>> {
        self.service
            .get_all_collections()
            .map_err(|e| map_err(e, ""))?
            .iter()
            .map(collection_ref)
            .collect()
    }

    fn create_collection(&self, name: &str, want_password: bool) -> Result<CollectionRef> {
        let collection = self
            .service
            .create_collection(name, "")
            .map_err(|e| map_err(e, name))?;
        if want_password {
            debug!(collection = name, "requesting password lock");
            collection.lock().map_err(|e| map_err(e, name))?;
        }
        collection_ref(&collection)
    }

    fn is_locked(&self, collection: &CollectionRef) -> Result<bool> {
        self.with_collection(collection, |c| c.is_locked())
    }

    fn unlock(&self, collection: &CollectionRef) -> Result<()> {
        self.with_collection(collection, |c| c.unlock())
    }

    fn lock(&self, collection: &CollectionRef) -> Result<()> {
        self.with_collection(collection, |c| c.lock())
    }

    fn create_item(
        &self,
        collection: &CollectionRef,
        label: &str,
        attributes: &Attributes,
        secret: &[u8],
    ) -> Result<ItemRef> {
        self.with_collection(collection, |c| {
            let item = c.create_item(
                label,
                borrow_attributes(attributes),
                secret,
                false,
                SECRET_CONTENT_TYPE,
            )?;
            Ok(ItemRef::new(item.item_path.as_str()))
        })
    }

    fn search_items(&self, collection: &CollectionRef, query: &Attributes) -> Result<Vec<ItemRef>> {
        self.with_collection(collection, |c| {
            let items = if query.is_empty() {
                c.get_all_items()?
            } else {
                c.search_items(borrow_attributes(query))?
            };
            Ok(items
                .iter()
                .map(|item| ItemRef::new(item.item_path.as_str()))
                .collect())
        })
    }

    fn get_label(&self, item: &ItemRef) -> Result<String> {
        self.with_item(item, |i| i.get_label())
    }

    fn get_secret(&self, item: &ItemRef) -> Result<Vec<u8>> {
        self.with_item(item, |i| i.get_secret())
    }

    fn set_secret(&self, item: &ItemRef, secret: &[u8]) -> Result<()> {
        self.with_item(item, |i| i.set_secret(secret, SECRET_CONTENT_TYPE))
    }

    fn get_attributes(&self, item: &ItemRef) -> Result<Attributes> {
        let attributes = self.with_item(item, |i| i.get_attributes())?;
        Ok(attributes.into_iter().collect())
    }

    fn set_attributes(&self, item: &ItemRef, attributes: &Attributes) -> Result<()> {
        self.with_item(item, |i| i.set_attributes(borrow_attributes(attributes)))
    }

    fn delete_item(&self, item: &ItemRef) -> Result<()> {
        self.with_item(item, |i| i.delete())
    }
}
