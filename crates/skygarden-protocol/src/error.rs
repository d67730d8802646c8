//! Error types for the protocol layer.
//!
//! Each SkyGarden crate defines its own error enum. A `ProtocolError`
//! always means a value could not be turned into text, could not be read
//! back, or was well-formed but meaningless (an unknown role name).

/// Errors that can occur in the protocol layer.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed.
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed: malformed JSON, missing fields, or a
    /// role string outside `admin | seller | buyer`.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// A role name that is not one of the three known roles.
    #[error("unknown role: {0:?}")]
    UnknownRole(String),

    /// The message parsed but breaks a protocol rule, e.g. anything
    /// other than `hello` as the first message of a connection.
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}
