//! JSON entity serializer.

use std::fmt;
use std::marker::PhantomData;

use bodykit_core::{Charset, EntityError, EntitySerializer, HttpMessage, ObjectEntity, mime};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Entity serializer for `application/json` bodies carrying a `T`.
///
/// Text is produced and consumed in the message charset: serialized JSON is encoded with
/// it, and received bytes are decoded with it before parsing.
pub struct JsonEntitySerializer<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonEntitySerializer<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for JsonEntitySerializer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for JsonEntitySerializer<T> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for JsonEntitySerializer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonEntitySerializer").finish()
    }
}

impl<T> EntitySerializer<ObjectEntity<T>> for JsonEntitySerializer<T>
where
    T: Serialize + DeserializeOwned,
{
    fn serialize_entity(
        &self,
        entity: &ObjectEntity<T>,
        charset: Charset,
    ) -> Result<Vec<u8>, EntityError> {
        let json = serde_json::to_string(entity.object())
            .map_err(|e| EntityError::serialize_failed(mime::APPLICATION_JSON, e))?;

        let (encoded, _, unmappable) = charset.encode(&json);
        if unmappable {
            return Err(EntityError::serialize_failed(
                mime::APPLICATION_JSON,
                format!("document is not representable in {}", charset.name()),
            ));
        }
        Ok(encoded.into_owned())
    }

    fn deserialize_entity(
        &self,
        bytes: &[u8],
        charset: Charset,
        _message: &dyn HttpMessage,
    ) -> Result<ObjectEntity<T>, EntityError> {
        let (text, _) = charset.decode_without_bom_handling(bytes);
        serde_json::from_str(&text)
            .map(ObjectEntity::new)
            .map_err(|e| {
                tracing::debug!(error = %e, "failed to parse JSON body");
                EntityError::deserialize_failed(mime::APPLICATION_JSON, e)
            })
    }
}
