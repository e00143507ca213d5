//! Raw byte entity serializer.

use bodykit_core::{BinaryEntity, Charset, EntityError, EntitySerializer, HttpMessage};

/// Entity serializer for opaque bodies such as `application/octet-stream`.
///
/// Bytes pass through unchanged in both directions; the charset is ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct BinaryEntitySerializer;

impl EntitySerializer<BinaryEntity> for BinaryEntitySerializer {
    fn serialize_entity(
        &self,
        entity: &BinaryEntity,
        _charset: Charset,
    ) -> Result<Vec<u8>, EntityError> {
        Ok(entity.bytes().to_vec())
    }

    fn deserialize_entity(
        &self,
        bytes: &[u8],
        _charset: Charset,
        _message: &dyn HttpMessage,
    ) -> Result<BinaryEntity, EntityError> {
        Ok(BinaryEntity::new(bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bodykit_core::MessageHead;
    use encoding_rs::{UTF_16LE, UTF_8};

    #[test]
    fn test_bytes_are_not_transcoded() {
        let raw = [0x00, 0xff, 0xfe, b'\r', b'\n'];
        let entity = BinaryEntitySerializer
            .deserialize_entity(&raw, UTF_16LE, &MessageHead::new())
            .expect("deserialize");
        assert_eq!(entity.bytes(), raw);

        let bytes = BinaryEntitySerializer
            .serialize_entity(&entity, UTF_8)
            .expect("serialize");
        assert_eq!(bytes, raw);
    }

    #[test]
    fn test_empty_body() {
        let entity = BinaryEntitySerializer
            .deserialize_entity(&[], UTF_8, &MessageHead::new())
            .expect("deserialize");
        assert!(entity.is_empty());
    }
}
