//! Multipart form data decoder.
//!
//! Decodes `multipart/form-data` style bodies into a [`PartitionedEntity`]. Sections with
//! a `filename` in their `Content-Disposition` become file entities, all others become
//! text decoded with the message charset.
//!
//! The body is consumed through a small sliding window, so memory use does not grow with
//! the size of the uploads; file sections above the spool threshold go to temporary files
//! owned by the returned entity.
//!
//! Encoding multipart bodies is not supported and always fails.

use std::io::Read;
use std::path::{Path, PathBuf};

use bodykit_core::{Charset, EntityError, EntitySerializer, HttpMessage, PartitionedEntity, mime};

mod error;
mod part_body;
mod part_headers;
mod scanner;
mod window;

pub use error::MultipartError;
pub use window::SMALL_BUFFER;

use scanner::Scanner;

/// Default threshold for spooling file sections to a temporary file (1MB).
pub const DEFAULT_SPOOL_THRESHOLD: usize = 1024 * 1024;

/// Default limit for the header block of one section (16KB).
pub const DEFAULT_MAX_HEADER_SIZE: usize = 16 * 1024;

const BOUNDARY_NOT_PRESENT: &str = "The boundary is not present.";
const UNSUPPORTED_SERIALIZE: &str = "Unsupported to serialize entity of Content-Type 'multipart/*'.";

/// Configuration for multipart decoding.
#[derive(Debug, Clone)]
pub struct MultipartConfig {
    /// File sections larger than this are spooled to disk.
    spool_threshold: usize,
    /// Maximum size of one section's header block, separator line included.
    max_header_size: usize,
    /// Directory for spooled files; the system temp directory when unset.
    temp_dir: Option<PathBuf>,
}

impl Default for MultipartConfig {
    fn default() -> Self {
        Self {
            spool_threshold: DEFAULT_SPOOL_THRESHOLD,
            max_header_size: DEFAULT_MAX_HEADER_SIZE,
            temp_dir: None,
        }
    }
}

impl MultipartConfig {
    /// Create a new configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the threshold above which file sections are spooled to a temporary file.
    #[must_use]
    pub fn spool_threshold(mut self, size: usize) -> Self {
        self.spool_threshold = size;
        self
    }

    /// Set the maximum header block size of one section.
    #[must_use]
    pub fn max_header_size(mut self, size: usize) -> Self {
        self.max_header_size = size;
        self
    }

    /// Set the directory spooled files are created in.
    #[must_use]
    pub fn temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = Some(dir.into());
        self
    }

    /// Get the spool-to-disk threshold.
    #[must_use]
    pub fn get_spool_threshold(&self) -> usize {
        self.spool_threshold
    }

    /// Get the maximum header block size.
    #[must_use]
    pub fn get_max_header_size(&self) -> usize {
        self.max_header_size
    }

    /// Get the spool directory, if one was set.
    #[must_use]
    pub fn get_temp_dir(&self) -> Option<&Path> {
        self.temp_dir.as_deref()
    }
}

/// Entity serializer for `multipart/*` bodies.
#[derive(Debug, Clone, Default)]
pub struct MultipartEntitySerializer {
    config: MultipartConfig,
}

impl MultipartEntitySerializer {
    /// Create a serializer with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a serializer with explicit configuration.
    #[must_use]
    pub fn with_config(config: MultipartConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &MultipartConfig {
        &self.config
    }

    /// Decode a body read from `reader`.
    ///
    /// The boundary comes from `message`'s `Content-Type`. The reader is consumed up to
    /// the closing boundary; any epilogue is left unread.
    pub fn deserialize_reader<R: Read>(
        &self,
        reader: R,
        charset: Charset,
        message: &dyn HttpMessage,
    ) -> Result<PartitionedEntity, EntityError> {
        let Some((content_type, boundary)) = message
            .content_type()
            .and_then(|content_type| Some((content_type, content_type.boundary()?)))
        else {
            return Err(EntityError::read(BOUNDARY_NOT_PRESENT));
        };

        tracing::debug!(
            boundary_len = boundary.len(),
            charset = charset.name(),
            "decoding multipart body"
        );
        match Scanner::new(reader, boundary, &self.config, charset).run() {
            Ok(entities) => {
                tracing::debug!(parts = entities.len(), "decoded multipart body");
                Ok(PartitionedEntity::new(entities).with_content_type(content_type.clone()))
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to decode multipart body");
                Err(EntityError::deserialize_failed(mime::MULTIPART_ANY, err))
            }
        }
    }
}

impl EntitySerializer<PartitionedEntity> for MultipartEntitySerializer {
    fn serialize_entity(
        &self,
        _entity: &PartitionedEntity,
        _charset: Charset,
    ) -> Result<Vec<u8>, EntityError> {
        Err(EntityError::write(UNSUPPORTED_SERIALIZE))
    }

    fn deserialize_entity(
        &self,
        bytes: &[u8],
        charset: Charset,
        message: &dyn HttpMessage,
    ) -> Result<PartitionedEntity, EntityError> {
        self.deserialize_reader(bytes, charset, message)
    }
}

#[cfg(test)]
mod tests {
    use bodykit_core::{MessageHead, NamedEntity};
    use encoding_rs::UTF_8;
    use tracing_test::traced_test;

    use super::*;

    fn message() -> MessageHead {
        MessageHead::new().with_header("Content-Type", "multipart/form-data; boundary=--token")
    }

    #[test]
    fn test_config_builder() {
        let config = MultipartConfig::new()
            .spool_threshold(10)
            .max_header_size(20)
            .temp_dir("/tmp/uploads");
        assert_eq!(config.get_spool_threshold(), 10);
        assert_eq!(config.get_max_header_size(), 20);
        assert_eq!(config.get_temp_dir(), Some(Path::new("/tmp/uploads")));

        let defaults = MultipartConfig::default();
        assert_eq!(defaults.get_spool_threshold(), DEFAULT_SPOOL_THRESHOLD);
        assert_eq!(defaults.get_max_header_size(), DEFAULT_MAX_HEADER_SIZE);
        assert!(defaults.get_temp_dir().is_none());
    }

    #[test]
    fn test_serialize_is_unsupported() {
        let serializer = MultipartEntitySerializer::new();
        let entity = PartitionedEntity::new(vec![NamedEntity::text("a", "b")]);
        let err = serializer
            .serialize_entity(&entity, UTF_8)
            .expect_err("multipart encoding is unsupported");
        assert!(err.is_write());
        assert_eq!(
            err.to_string(),
            "Unsupported to serialize entity of Content-Type 'multipart/*'."
        );
    }

    #[test]
    fn test_header_limit_is_enforced() {
        let serializer =
            MultipartEntitySerializer::with_config(MultipartConfig::new().max_header_size(32));
        let body = format!(
            "----token\r\nX-Long: {}\r\n\r\nContent\r\n----token--",
            "v".repeat(64)
        );
        let err = serializer
            .deserialize_entity(body.as_bytes(), UTF_8, &message())
            .expect_err("header block too large");
        assert!(err.is_read());
        let source = std::error::Error::source(&err).expect("source");
        assert_eq!(source.to_string(), "part headers exceed 32 bytes");
    }

    #[traced_test]
    #[test]
    fn test_failed_decode_is_logged() {
        let serializer = MultipartEntitySerializer::new();
        let result = serializer.deserialize_entity(b"----token\r\n", UTF_8, &message());
        assert!(result.is_err());
        assert!(logs_contain("failed to decode multipart body"));
        assert!(logs_contain("unterminated part headers"));
    }
}
