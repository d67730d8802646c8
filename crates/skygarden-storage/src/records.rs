//! Table-oriented record backend and its typed accessor.
//!
//! A record is a JSON object with a string `id` field. Backends are
//! addressed by table name only; the typed [`Table`] wrapper converts
//! records to and from a concrete serde type and attaches a
//! user-facing message to every failure.

use std::collections::HashMap;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tokio::sync::RwLock;

use crate::{RecordError, TableError};

/// CRUD by table name against a relational-style store.
pub trait RecordBackend: Send + Sync + 'static {
    /// Every record in `table`, in insertion order. An unknown table is
    /// empty.
    fn list(
        &self,
        table: &str,
    ) -> impl Future<Output = Result<Vec<Value>, RecordError>> + Send;

    fn get(
        &self,
        table: &str,
        id: &str,
    ) -> impl Future<Output = Result<Value, RecordError>> + Send;

    /// Inserts `record`, assigning an `id` if it has none, and returns the
    /// stored record. Ids are unique per table: an explicit id that is
    /// already taken is a [`RecordError::Conflict`].
    fn insert(
        &self,
        table: &str,
        record: Value,
    ) -> impl Future<Output = Result<Value, RecordError>> + Send;

    /// Merges the fields of `patch` into the record and returns the
    /// result. The `id` field can't be changed.
    fn update(
        &self,
        table: &str,
        id: &str,
        patch: Value,
    ) -> impl Future<Output = Result<Value, RecordError>> + Send;

    fn delete(
        &self,
        table: &str,
        id: &str,
    ) -> impl Future<Output = Result<(), RecordError>> + Send;
}

// ---------------------------------------------------------------------------
// MemoryRecordBackend
// ---------------------------------------------------------------------------

/// A [`RecordBackend`] kept entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryRecordBackend {
    tables: RwLock<HashMap<String, Vec<Map<String, Value>>>>,
    next_id: AtomicU64,
}

impl MemoryRecordBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

fn record_id(record: &Map<String, Value>) -> Option<&str> {
    record.get("id").and_then(Value::as_str)
}

fn into_object(table: &str, value: Value) -> Result<Map<String, Value>, RecordError> {
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(RecordError::NotAnObject {
            table: table.to_string(),
        }),
    }
}

fn not_found(table: &str, id: &str) -> RecordError {
    RecordError::NotFound {
        table: table.to_string(),
        id: id.to_string(),
    }
}

impl RecordBackend for MemoryRecordBackend {
    async fn list(&self, table: &str) -> Result<Vec<Value>, RecordError> {
        let tables = self.tables.read().await;
        Ok(tables
            .get(table)
            .map(|rows| rows.iter().cloned().map(Value::Object).collect())
            .unwrap_or_default())
    }

    async fn get(&self, table: &str, id: &str) -> Result<Value, RecordError> {
        let tables = self.tables.read().await;
        tables
            .get(table)
            .and_then(|rows| rows.iter().find(|r| record_id(r) == Some(id)))
            .cloned()
            .map(Value::Object)
            .ok_or_else(|| not_found(table, id))
    }

    async fn insert(&self, table: &str, record: Value) -> Result<Value, RecordError> {
        let mut record = into_object(table, record)?;
        let mut tables = self.tables.write().await;
        let rows = tables.entry(table.to_string()).or_default();
        let taken = |id: &str| rows.iter().any(|r| record_id(r) == Some(id));

        match record_id(&record).map(str::to_string) {
            Some(id) if taken(&id) => {
                return Err(RecordError::Conflict {
                    table: table.to_string(),
                    id,
                });
            }
            Some(_) => {}
            None => {
                // Skip generated ids that an explicit insert already claimed.
                let id = loop {
                    let n = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
                    let id = format!("{table}-{n}");
                    if !taken(&id) {
                        break id;
                    }
                };
                record.insert("id".into(), Value::String(id));
            }
        }

        rows.push(record.clone());
        tracing::debug!(table, "record inserted");
        Ok(Value::Object(record))
    }

    async fn update(&self, table: &str, id: &str, patch: Value) -> Result<Value, RecordError> {
        let patch = into_object(table, patch)?;
        let mut tables = self.tables.write().await;
        let row = tables
            .get_mut(table)
            .and_then(|rows| rows.iter_mut().find(|r| record_id(r) == Some(id)))
            .ok_or_else(|| not_found(table, id))?;
        for (field, value) in patch {
            if field != "id" {
                row.insert(field, value);
            }
        }
        Ok(Value::Object(row.clone()))
    }

    async fn delete(&self, table: &str, id: &str) -> Result<(), RecordError> {
        let mut tables = self.tables.write().await;
        let rows = tables.get_mut(table).ok_or_else(|| not_found(table, id))?;
        let before = rows.len();
        rows.retain(|r| record_id(r) != Some(id));
        if rows.len() == before {
            return Err(not_found(table, id));
        }
        tracing::debug!(table, id, "record deleted");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Table
// ---------------------------------------------------------------------------

/// Typed accessor for one table of a [`RecordBackend`].
pub struct Table<B, T> {
    backend: Arc<B>,
    name: String,
    _record: PhantomData<fn() -> T>,
}

impl<B, T> Clone for Table<B, T> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            name: self.name.clone(),
            _record: PhantomData,
        }
    }
}

impl<B, T> Table<B, T>
where
    B: RecordBackend,
    T: Serialize + DeserializeOwned,
{
    pub fn new(backend: Arc<B>, name: impl Into<String>) -> Self {
        Self {
            backend,
            name: name.into(),
            _record: PhantomData,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn fail(&self, action: &str, source: RecordError) -> TableError {
        TableError {
            message: format!("Error {action} {}", self.name),
            source,
        }
    }

    fn decode(&self, value: Value) -> Result<T, RecordError> {
        serde_json::from_value(value).map_err(|source| RecordError::Shape {
            table: self.name.clone(),
            source,
        })
    }

    fn encode(&self, value: &impl Serialize) -> Result<Value, RecordError> {
        serde_json::to_value(value).map_err(|source| RecordError::Shape {
            table: self.name.clone(),
            source,
        })
    }

    pub async fn get_all(&self) -> Result<Vec<T>, TableError> {
        const ACTION: &str = "fetching data from";
        let rows = self
            .backend
            .list(&self.name)
            .await
            .map_err(|e| self.fail(ACTION, e))?;
        rows.into_iter()
            .map(|row| self.decode(row).map_err(|e| self.fail(ACTION, e)))
            .collect()
    }

    pub async fn get_by_id(&self, id: &str) -> Result<T, TableError> {
        const ACTION: &str = "fetching item from";
        let row = self
            .backend
            .get(&self.name, id)
            .await
            .map_err(|e| self.fail(ACTION, e))?;
        self.decode(row).map_err(|e| self.fail(ACTION, e))
    }

    /// Inserts a full or partial record and returns what was stored.
    pub async fn insert(&self, item: &impl Serialize) -> Result<T, TableError> {
        const ACTION: &str = "inserting into";
        let value = self.encode(item).map_err(|e| self.fail(ACTION, e))?;
        let row = self
            .backend
            .insert(&self.name, value)
            .await
            .map_err(|e| self.fail(ACTION, e))?;
        self.decode(row).map_err(|e| self.fail(ACTION, e))
    }

    pub async fn update(&self, id: &str, patch: &impl Serialize) -> Result<T, TableError> {
        const ACTION: &str = "updating in";
        let value = self.encode(patch).map_err(|e| self.fail(ACTION, e))?;
        let row = self
            .backend
            .update(&self.name, id, value)
            .await
            .map_err(|e| self.fail(ACTION, e))?;
        self.decode(row).map_err(|e| self.fail(ACTION, e))
    }

    pub async fn remove(&self, id: &str) -> Result<(), TableError> {
        self.backend
            .delete(&self.name, id)
            .await
            .map_err(|e| self.fail("deleting from", e))
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    use super::*;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Product {
        id: String,
        name: String,
        stock: u32,
    }

    fn products(backend: &Arc<MemoryRecordBackend>) -> Table<MemoryRecordBackend, Product> {
        Table::new(Arc::clone(backend), "products")
    }

    #[tokio::test]
    async fn test_list_unknown_table_is_empty() {
        let backend = MemoryRecordBackend::new();
        assert!(backend.list("nothing").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_insert_assigns_id_when_missing() {
        let backend = MemoryRecordBackend::new();

        let stored = backend
            .insert("products", json!({"name": "Smart Watch", "stock": 3}))
            .await
            .unwrap();

        assert_eq!(stored["id"], "products-1");
        assert_eq!(backend.list("products").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_insert_duplicate_id_returns_conflict() {
        let backend = MemoryRecordBackend::new();
        backend
            .insert("products", json!({"id": "p1", "name": "Earbuds"}))
            .await
            .unwrap();

        let result = backend
            .insert("products", json!({"id": "p1", "name": "Other"}))
            .await;

        assert!(matches!(result, Err(RecordError::Conflict { ref id, .. }) if id == "p1"));
        let rows = backend.list("products").await.unwrap();
        assert_eq!(rows, vec![json!({"id": "p1", "name": "Earbuds"})]);
    }

    #[tokio::test]
    async fn test_insert_generated_id_skips_explicit_ids() {
        let backend = MemoryRecordBackend::new();
        backend
            .insert("t", json!({"id": "t-1", "name": "explicit"}))
            .await
            .unwrap();

        let generated = backend.insert("t", json!({"name": "generated"})).await.unwrap();

        assert_eq!(generated["id"], "t-2");
        assert_eq!(backend.get("t", "t-1").await.unwrap()["name"], "explicit");
        assert_eq!(backend.get("t", "t-2").await.unwrap()["name"], "generated");
    }

    #[tokio::test]
    async fn test_same_id_in_different_tables_is_allowed() {
        let backend = MemoryRecordBackend::new();
        backend.insert("products", json!({"id": "x"})).await.unwrap();
        assert!(backend.insert("orders", json!({"id": "x"})).await.is_ok());
    }

    #[tokio::test]
    async fn test_insert_non_object_is_rejected() {
        let backend = MemoryRecordBackend::new();
        let result = backend.insert("products", json!([1, 2])).await;
        assert!(matches!(result, Err(RecordError::NotAnObject { .. })));
    }

    #[tokio::test]
    async fn test_update_merges_fields_and_keeps_id() {
        let backend = MemoryRecordBackend::new();
        backend
            .insert("products", json!({"id": "p1", "name": "Earbuds", "stock": 1}))
            .await
            .unwrap();

        let updated = backend
            .update("products", "p1", json!({"stock": 9, "id": "hijack"}))
            .await
            .unwrap();

        assert_eq!(updated, json!({"id": "p1", "name": "Earbuds", "stock": 9}));
    }

    #[tokio::test]
    async fn test_delete_missing_record_returns_not_found() {
        let backend = MemoryRecordBackend::new();
        let result = backend.delete("products", "p404").await;
        assert!(matches!(result, Err(RecordError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_table_typed_crud_flow() {
        let backend = Arc::new(MemoryRecordBackend::new());
        let table = products(&backend);

        let watch = table
            .insert(&json!({"id": "w1", "name": "Smart Watch", "stock": 28}))
            .await
            .unwrap();
        assert_eq!(watch.name, "Smart Watch");

        let fetched = table.get_by_id("w1").await.unwrap();
        assert_eq!(fetched, watch);

        let restocked = table.update("w1", &json!({"stock": 40})).await.unwrap();
        assert_eq!(restocked.stock, 40);

        table.remove("w1").await.unwrap();
        assert!(table.get_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_table_error_carries_user_message() {
        let backend = Arc::new(MemoryRecordBackend::new());
        let table = products(&backend);

        let err = table.get_by_id("missing").await.unwrap_err();

        assert_eq!(err.message, "Error fetching item from products");
        assert!(matches!(err.source, RecordError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_table_shape_mismatch_is_reported() {
        let backend = Arc::new(MemoryRecordBackend::new());
        backend
            .insert("products", json!({"id": "x", "name": "Odd"}))
            .await
            .unwrap();

        let err = products(&backend).get_all().await.unwrap_err();

        assert_eq!(err.message, "Error fetching data from products");
        assert!(matches!(err.source, RecordError::Shape { .. }));
    }
}
