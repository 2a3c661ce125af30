use crate::error::Result;
use crate::model::{Attributes, CollectionRef, ItemRef};

/// Abstract interface to the secret service.
///
/// This trait covers the "how" of talking to the service (D-Bus vs memory), while the
/// command layer owns the "what" (filtering, merge and delete semantics). Implementations
/// hold no business logic and never retry.
pub trait SecretBackend {
    // --- Collections ---

    /// All collections known to the service, in service order.
    fn list_collections(&self) -> Result<Vec<CollectionRef>>;

    /// Create a collection labelled `name`.
    /// With `want_password` the service is asked to prompt for and apply a password lock.
    fn create_collection(&self, name: &str, want_password: bool) -> Result<CollectionRef>;

    fn is_locked(&self, collection: &CollectionRef) -> Result<bool>;

    /// Ask the service to unlock. The service may show its own prompt.
    /// Returns `UnlockCancelled` when that prompt is dismissed.
    fn unlock(&self, collection: &CollectionRef) -> Result<()>;

    fn lock(&self, collection: &CollectionRef) -> Result<()>;

    // --- Items ---

    fn create_item(
        &self,
        collection: &CollectionRef,
        label: &str,
        attributes: &Attributes,
        secret: &[u8],
    ) -> Result<ItemRef>;

    /// Exact-match AND search over attributes, in enumeration order.
    /// An empty query returns every item of the collection.
    fn search_items(&self, collection: &CollectionRef, query: &Attributes) -> Result<Vec<ItemRef>>;

    fn get_label(&self, item: &ItemRef) -> Result<String>;

    fn get_secret(&self, item: &ItemRef) -> Result<Vec<u8>>;

    fn set_secret(&self, item: &ItemRef, secret: &[u8]) -> Result<()>;

    fn get_attributes(&self, item: &ItemRef) -> Result<Attributes>;

    fn set_attributes(&self, item: &ItemRef, attributes: &Attributes) -> Result<()>;

    fn delete_item(&self, item: &ItemRef) -> Result<()>;
}
