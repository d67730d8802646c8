//! Codec trait and the JSON implementation.
//!
//! Both consumers of encoded values are text-based: the durable store keeps
//! the serialized [`Identity`](crate::Identity) as a string, and the
//! WebSocket surface exchanges text frames. The codec therefore works on
//! `String`/`&str` rather than raw bytes.

use serde::{Serialize, de::DeserializeOwned};

use crate::ProtocolError;

/// Encodes values to text and decodes them back.
///
/// `Send + Sync + 'static` so one codec can be shared by every
/// connection task on the server.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into text.
    ///
    /// # Errors
    /// Returns `ProtocolError::Encode` if the value can't be represented.
    fn encode<T: Serialize>(&self, value: &T) -> Result<String, ProtocolError>;

    /// Deserializes text back into a value.
    ///
    /// # Errors
    /// Returns `ProtocolError::Decode` if the text is malformed or doesn't
    /// match the expected shape.
    fn decode<T: DeserializeOwned>(&self, data: &str) -> Result<T, ProtocolError>;
}

/// A [`Codec`] backed by `serde_json`.
///
/// ```rust
/// use skygarden_protocol::{Codec, Identity, JsonCodec, Role, UserId};
///
/// let codec = JsonCodec;
/// let identity = Identity::new(UserId::from("mock-1"), "jane@shop.io", Role::Seller);
///
/// let text = codec.encode(&identity).unwrap();
/// assert!(text.contains(r#""role":"seller""#));
///
/// let back: Identity = codec.decode(&text).unwrap();
/// assert_eq!(back, identity);
/// ```
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<String, ProtocolError> {
        serde_json::to_string(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(&self, data: &str) -> Result<T, ProtocolError> {
        serde_json::from_str(data).map_err(ProtocolError::Decode)
    }
}
