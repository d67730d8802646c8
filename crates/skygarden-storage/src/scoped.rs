//! Per-client key namespacing over a shared [`Storage`].

use std::sync::Arc;

use crate::{Storage, StorageError, validate_key};

/// Prefixes every key with `<scope>.` before handing it to the inner
/// store.
///
/// A browser keeps local storage per profile; the server gets the same
/// isolation by giving each client id its own scope over one shared
/// backend. Scopes may not contain `.`, so two scopes can never produce
/// the same physical key.
#[derive(Debug)]
pub struct ScopedStorage<S> {
    inner: Arc<S>,
    scope: String,
}

impl<S> Clone for ScopedStorage<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            scope: self.scope.clone(),
        }
    }
}

impl<S: Storage> ScopedStorage<S> {
    /// # Errors
    /// Returns [`StorageError::InvalidKey`] if `scope` is not a valid key
    /// or contains a `.`.
    pub fn new(inner: Arc<S>, scope: impl Into<String>) -> Result<Self, StorageError> {
        let scope = scope.into();
        validate_key(&scope)?;
        if scope.contains('.') {
            return Err(StorageError::InvalidKey(scope));
        }
        Ok(Self { inner, scope })
    }

    /// Like [`new`](Self::new), but also rejects a scope too long to hold
    /// `key` once the two are joined.
    ///
    /// # Errors
    /// Returns [`StorageError::InvalidKey`] for the scope or for the
    /// composed `<scope>.<key>`.
    pub fn for_key(
        inner: Arc<S>,
        scope: impl Into<String>,
        key: &str,
    ) -> Result<Self, StorageError> {
        let storage = Self::new(inner, scope)?;
        storage.scoped(key)?;
        Ok(storage)
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }

    fn scoped(&self, key: &str) -> Result<String, StorageError> {
        validate_key(key)?;
        let full = format!("{}.{key}", self.scope);
        validate_key(&full)?;
        Ok(full)
    }
}

impl<S: Storage> Storage for ScopedStorage<S> {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let key = self.scoped(key)?;
        self.inner.get(&key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let key = self.scoped(key)?;
        self.inner.set(&key, value).await
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let key = self.scoped(key)?;
        self.inner.remove(&key).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MAX_KEY_LEN, MemoryStorage};

    #[tokio::test]
    async fn test_scopes_are_isolated() {
        let shared = Arc::new(MemoryStorage::new());
        let alice = ScopedStorage::new(Arc::clone(&shared), "alice").unwrap();
        let bob = ScopedStorage::new(Arc::clone(&shared), "bob").unwrap();

        alice.set("identity", "a").await.unwrap();

        assert_eq!(alice.get("identity").await.unwrap().as_deref(), Some("a"));
        assert_eq!(bob.get("identity").await.unwrap(), None);
        assert_eq!(
            shared.get("alice.identity").await.unwrap().as_deref(),
            Some("a")
        );
    }

    #[tokio::test]
    async fn test_remove_only_touches_own_scope() {
        let shared = Arc::new(MemoryStorage::new());
        let alice = ScopedStorage::new(Arc::clone(&shared), "alice").unwrap();
        let bob = ScopedStorage::new(Arc::clone(&shared), "bob").unwrap();
        alice.set("identity", "a").await.unwrap();
        bob.set("identity", "b").await.unwrap();

        bob.remove("identity").await.unwrap();

        assert_eq!(alice.get("identity").await.unwrap().as_deref(), Some("a"));
    }

    #[test]
    fn test_new_rejects_dotted_scope() {
        let shared = Arc::new(MemoryStorage::new());
        let result = ScopedStorage::new(shared, "a.b");
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));
    }

    #[test]
    fn test_for_key_rejects_scope_that_overflows_composed_key() {
        let shared = Arc::new(MemoryStorage::new());
        let scope = "c".repeat(MAX_KEY_LEN);

        assert!(ScopedStorage::new(Arc::clone(&shared), scope.as_str()).is_ok());
        let result = ScopedStorage::for_key(shared, scope, "identity");

        assert!(matches!(result, Err(StorageError::InvalidKey(k)) if k.ends_with(".identity")));
    }

    #[tokio::test]
    async fn test_for_key_accepts_longest_fitting_scope() {
        let shared = Arc::new(MemoryStorage::new());
        let scope = "c".repeat(MAX_KEY_LEN - ".identity".len());

        let storage = ScopedStorage::for_key(shared, scope, "identity").unwrap();

        storage.set("identity", "a").await.unwrap();
        assert_eq!(storage.get("identity").await.unwrap().as_deref(), Some("a"));
    }
}
