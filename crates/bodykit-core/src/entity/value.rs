//! Single-value entities: structured objects and raw bytes.

/// A structured object carried as the body, e.g. a JSON document.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectEntity<T> {
    object: T,
}

impl<T> ObjectEntity<T> {
    /// Wrap an object.
    #[must_use]
    pub fn new(object: T) -> Self {
        Self { object }
    }

    /// The wrapped object.
    #[must_use]
    pub fn object(&self) -> &T {
        &self.object
    }

    /// Take the wrapped object.
    #[must_use]
    pub fn into_object(self) -> T {
        self.object
    }
}

/// An opaque byte body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BinaryEntity {
    bytes: Vec<u8>,
}

impl BinaryEntity {
    /// Wrap raw bytes.
    #[must_use]
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    /// The raw bytes.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns the number of bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns true if the body is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Take the raw bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}
