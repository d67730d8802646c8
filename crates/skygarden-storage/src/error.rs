//! Error types for the storage layer.

/// Errors from a [`Storage`](crate::Storage) backend.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The key contains characters the backends can't store safely.
    #[error("invalid storage key {0:?}")]
    InvalidKey(String),

    /// Reading, writing, or deleting the underlying file failed.
    #[error("storage I/O failed for key {key:?}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },
}

/// Errors from a [`RecordBackend`](crate::RecordBackend).
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    /// No record with this id exists in the table.
    #[error("no record {id:?} in table {table}")]
    NotFound { table: String, id: String },

    /// A record with this id is already stored in the table.
    #[error("record {id:?} already exists in table {table}")]
    Conflict { table: String, id: String },

    /// Records must be JSON objects so they can carry an `id` field.
    #[error("records in table {table} must be JSON objects")]
    NotAnObject { table: String },

    /// A record couldn't be converted to or from its typed shape.
    #[error("record shape mismatch in table {table}: {source}")]
    Shape {
        table: String,
        #[source]
        source: serde_json::Error,
    },
}

/// A [`RecordError`] with the user-facing message a typed
/// [`Table`](crate::Table) accessor reports.
///
/// The message names the action and the table, e.g.
/// `"Error fetching data from products"`.
#[derive(Debug, thiserror::Error)]
#[error("{message}: {source}")]
pub struct TableError {
    pub message: String,
    #[source]
    pub source: RecordError,
}
