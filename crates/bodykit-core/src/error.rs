//! Entity serialization errors.
//!
//! Serializers report exactly two kinds of failure: reading a body into an entity, and
//! writing an entity back to bytes. The underlying cause, if any, is kept as the error
//! source so callers can log it without matching on it.

use std::error::Error as StdError;

/// Boxed error cause carried by [`EntityError`].
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Failure to convert between wire bytes and an entity.
#[derive(Debug, thiserror::Error)]
pub enum EntityError {
    /// The body could not be decoded into an entity.
    #[error("{message}")]
    Read {
        message: String,
        #[source]
        source: Option<BoxError>,
    },
    /// The entity could not be encoded into bytes.
    #[error("{message}")]
    Write {
        message: String,
        #[source]
        source: Option<BoxError>,
    },
}

impl EntityError {
    /// A read error without an underlying cause.
    #[must_use]
    pub fn read(message: impl Into<String>) -> Self {
        Self::Read {
            message: message.into(),
            source: None,
        }
    }

    /// A read error caused by `source`.
    #[must_use]
    pub fn read_with_source(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::Read {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// A write error without an underlying cause.
    #[must_use]
    pub fn write(message: impl Into<String>) -> Self {
        Self::Write {
            message: message.into(),
            source: None,
        }
    }

    /// A write error caused by `source`.
    #[must_use]
    pub fn write_with_source(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::Write {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Generic decode failure for `mime_type`.
    #[must_use]
    pub fn deserialize_failed(mime_type: &str, source: impl Into<BoxError>) -> Self {
        Self::read_with_source(
            format!("Failed to deserialize message body. [mimeType='{mime_type}']"),
            source,
        )
    }

    /// Generic encode failure for `mime_type`.
    #[must_use]
    pub fn serialize_failed(mime_type: &str, source: impl Into<BoxError>) -> Self {
        Self::write_with_source(
            format!("Failed to serialize message body. [mimeType='{mime_type}']"),
            source,
        )
    }

    /// The human-readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Read { message, .. } | Self::Write { message, .. } => message,
        }
    }

    /// Returns true for decode-time failures.
    #[must_use]
    pub fn is_read(&self) -> bool {
        matches!(self, Self::Read { .. })
    }

    /// Returns true for encode-time failures.
    #[must_use]
    pub fn is_write(&self) -> bool {
        matches!(self, Self::Write { .. })
    }
}
