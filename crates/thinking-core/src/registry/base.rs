//! Generic id-keyed registry.

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::Arc;

use crate::error::RegistryError;

/// Items that can be stored in a [`BaseRegistry`].
pub trait Registerable: Send + Sync {
    /// Unique identifier of the item.
    fn registry_id(&self) -> &str;
}

/// Thread-safe registry of shared items keyed by their id.
///
/// Registration never overwrites: a second item with an existing id is
/// rejected.
pub struct BaseRegistry<T: ?Sized + Registerable> {
    items: DashMap<String, Arc<T>>,
}

impl<T: ?Sized + Registerable> BaseRegistry<T> {
    pub fn new() -> Self {
        Self {
            items: DashMap::new(),
        }
    }

    /// Register an item, rejecting duplicate ids.
    pub fn register(&self, item: Arc<T>) -> Result<(), RegistryError> {
        let id = item.registry_id().to_string();
        match self.items.entry(id) {
            Entry::Occupied(entry) => {
                Err(RegistryError::AlreadyRegistered(entry.key().clone()))
            }
            Entry::Vacant(entry) => {
                entry.insert(item);
                Ok(())
            }
        }
    }

    /// Remove an item by id.
    pub fn unregister(&self, id: &str) -> Result<Arc<T>, RegistryError> {
        self.items
            .remove(id)
            .map(|(_, item)| item)
            .ok_or_else(|| RegistryError::NotFound(id.to_string()))
    }

    pub fn get(&self, id: &str) -> Option<Arc<T>> {
        self.items.get(id).map(|item| item.clone())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.items.contains_key(id)
    }

    /// All registered ids, sorted.
    pub fn list_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.items.iter().map(|e| e.key().clone()).collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate over all items in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = Arc<T>> + '_ {
        self.items.iter().map(|entry| entry.value().clone())
    }
}

impl<T: ?Sized + Registerable> Default for BaseRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Item {
        id: String,
    }

    impl Item {
        fn shared(id: &str) -> Arc<Self> {
            Arc::new(Self { id: id.to_string() })
        }
    }

    impl Registerable for Item {
        fn registry_id(&self) -> &str {
            &self.id
        }
    }

    #[test]
    fn test_register_and_get() {
        let registry: BaseRegistry<Item> = BaseRegistry::new();
        assert!(registry.is_empty());

        registry.register(Item::shared("a")).unwrap();
        assert_eq!(registry.len(), 1);
        assert!(registry.contains("a"));
        assert_eq!(registry.get("a").unwrap().registry_id(), "a");
        assert!(registry.get("b").is_none());
    }

    #[test]
    fn test_register_duplicate_keeps_first() {
        let registry: BaseRegistry<Item> = BaseRegistry::default();
        let first = Item::shared("a");
        registry.register(first.clone()).unwrap();

        let err = registry.register(Item::shared("a")).unwrap_err();
        assert!(matches!(err, RegistryError::AlreadyRegistered(ref id) if id == "a"));
        assert!(Arc::ptr_eq(&registry.get("a").unwrap(), &first));
    }

    #[test]
    fn test_unregister() {
        let registry: BaseRegistry<Item> = BaseRegistry::new();
        registry.register(Item::shared("a")).unwrap();

        let removed = registry.unregister("a").unwrap();
        assert_eq!(removed.registry_id(), "a");
        assert!(registry.is_empty());
        assert!(matches!(
            registry.unregister("a"),
            Err(RegistryError::NotFound(_))
        ));
    }

    #[test]
    fn test_list_ids_sorted() {
        let registry: BaseRegistry<Item> = BaseRegistry::new();
        registry.register(Item::shared("zeta")).unwrap();
        registry.register(Item::shared("alpha")).unwrap();
        registry.register(Item::shared("mid")).unwrap();

        assert_eq!(registry.list_ids(), vec!["alpha", "mid", "zeta"]);
        assert_eq!(registry.iter().count(), 3);
    }
}
