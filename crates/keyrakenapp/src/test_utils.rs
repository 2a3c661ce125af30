use crate::api::KeyrakenApi;
use crate::commands::CollectionContext;
use crate::model::{Attributes, ItemRef};
use crate::secret::{FixedSecret, SecretInput};
use crate::store::mem_backend::MemBackend;
use zeroize::Zeroizing;

/// Collection every [`TestEnv`] starts with.
pub const TEST_COLLECTION: &str = "login";

/// An API over an in-memory backend holding one unlocked collection.
pub struct TestEnv {
    pub api: KeyrakenApi<MemBackend>,
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl TestEnv {
    /// Prompts answer with `"prompted"`.
    pub fn new() -> Self {
        Self::with_provider(FixedSecret::new("prompted"))
    }

    pub fn with_provider(provider: FixedSecret) -> Self {
        let backend = MemBackend::with_collection(TEST_COLLECTION);
        Self {
            api: KeyrakenApi::new(backend, Box::new(provider)),
        }
    }

    pub fn backend(&self) -> &MemBackend {
        self.api.backend()
    }

    pub fn ctx(&self) -> CollectionContext {
        self.api
            .open(TEST_COLLECTION, false)
            .expect("test collection should open")
    }

    /// Create an item directly, returning its reference.
    pub fn seed(&self, label: &str, pairs: &[(&str, &str)], secret: &str) -> ItemRef {
        let result = self
            .api
            .create_item(
                &self.ctx(),
                label,
                attrs(pairs),
                SecretInput::Given(Zeroizing::new(secret.to_string())),
            )
            .expect("seeding should succeed");
        result.affected_items[0].clone()
    }
}

pub fn attrs(pairs: &[(&str, &str)]) -> Attributes {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
