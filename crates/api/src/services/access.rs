// Path: crates/api/src/services/access.rs

//! Read-only access to shared services.

use crate::services::BlockchainService;
use std::fmt;
use std::sync::Arc;

/// A read-only, type-safe service locator.
#[derive(Clone, Default)]
pub struct ServiceDirectory {
    /// Services ordered by `id()`, which fixes the order receive hooks are offered in.
    ordered: Arc<Vec<Arc<dyn BlockchainService>>>,
}

impl fmt::Debug for ServiceDirectory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceDirectory")
            .field("service_count", &self.ordered.len())
            .finish()
    }
}

impl ServiceDirectory {
    /// Creates a new directory from a list of services.
    /// Services are sorted by `id()` so iteration order is deterministic.
    pub fn new(mut services: Vec<Arc<dyn BlockchainService>>) -> Self {
        services.sort_by_key(|s| s.id().to_string());
        Self {
            ordered: Arc::new(services),
        }
    }

    /// Gets a service by its concrete type.
    pub fn get<T: BlockchainService + 'static>(&self) -> Option<&T> {
        self.ordered
            .iter()
            .find_map(|svc| svc.as_any().downcast_ref::<T>())
    }

    /// Gets a service by its dispatch id.
    pub fn find(&self, id: &str) -> Option<&Arc<dyn BlockchainService>> {
        self.ordered.iter().find(|svc| svc.id() == id)
    }

    /// Returns an iterator over all stored service trait objects in a deterministic order.
    pub fn services(&self) -> impl Iterator<Item = &Arc<dyn BlockchainService>> {
        self.ordered.iter()
    }
}
