//! The entity serializer capability.
//!
//! Every content-type codec (multipart, JSON, raw bytes) implements [`EntitySerializer`]
//! for the entity type it produces, so transport code can convert bodies without knowing
//! which codec is behind a MIME type.

use encoding_rs::Encoding;

use crate::error::EntityError;
use crate::message::HttpMessage;

/// Character set used to decode and encode textual content.
pub type Charset = &'static Encoding;

/// Well-known MIME types handled by the bundled serializers.
pub mod mime {
    /// `multipart/form-data`.
    pub const MULTIPART_FORM_DATA: &str = "multipart/form-data";
    /// Any multipart subtype, as reported in decode errors.
    pub const MULTIPART_ANY: &str = "multipart/*";
    /// `application/json`.
    pub const APPLICATION_JSON: &str = "application/json";
    /// `application/octet-stream`.
    pub const APPLICATION_OCTET_STREAM: &str = "application/octet-stream";
}

/// Converts between wire bytes and an entity of type `E`.
pub trait EntitySerializer<E>: Send + Sync {
    /// Encode `entity` into bytes using `charset` for textual content.
    fn serialize_entity(&self, entity: &E, charset: Charset) -> Result<Vec<u8>, EntityError>;

    /// Decode `bytes` received with `message` into an entity.
    fn deserialize_entity(
        &self,
        bytes: &[u8],
        charset: Charset,
        message: &dyn HttpMessage,
    ) -> Result<E, EntityError>;
}
