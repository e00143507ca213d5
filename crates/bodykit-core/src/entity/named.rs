//! Named entities: one section of a multipart body.

use super::file::FileEntity;

/// Decoded text content of a form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEntity {
    content: String,
}

impl TextEntity {
    /// Create a text entity.
    #[must_use]
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }

    /// The decoded content.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Take the content.
    #[must_use]
    pub fn into_content(self) -> String {
        self.content
    }
}

/// Payload of a [`NamedEntity`].
#[derive(Debug)]
pub enum PartContent {
    /// A form field without a `filename`.
    Text(TextEntity),
    /// A file upload.
    File(FileEntity),
}

/// A named multipart section: either a text field or a file upload.
#[derive(Debug)]
pub struct NamedEntity {
    name: String,
    content: PartContent,
}

impl NamedEntity {
    /// A text field.
    #[must_use]
    pub fn text(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: PartContent::Text(TextEntity::new(content)),
        }
    }

    /// A file upload.
    #[must_use]
    pub fn file(name: impl Into<String>, file: FileEntity) -> Self {
        Self {
            name: name.into(),
            content: PartContent::File(file),
        }
    }

    /// The field name. Empty when the part declared none.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The payload.
    #[must_use]
    pub fn content(&self) -> &PartContent {
        &self.content
    }

    /// Returns true for text fields.
    #[must_use]
    pub fn is_text(&self) -> bool {
        matches!(self.content, PartContent::Text(_))
    }

    /// Returns true for file uploads.
    #[must_use]
    pub fn is_file(&self) -> bool {
        matches!(self.content, PartContent::File(_))
    }

    /// The text payload, if this is a text field.
    #[must_use]
    pub fn as_text(&self) -> Option<&TextEntity> {
        match &self.content {
            PartContent::Text(text) => Some(text),
            PartContent::File(_) => None,
        }
    }

    /// The file payload, if this is a file upload.
    #[must_use]
    pub fn as_file(&self) -> Option<&FileEntity> {
        match &self.content {
            PartContent::File(file) => Some(file),
            PartContent::Text(_) => None,
        }
    }

    /// Mutable file payload, if this is a file upload.
    pub fn as_file_mut(&mut self) -> Option<&mut FileEntity> {
        match &mut self.content {
            PartContent::File(file) => Some(file),
            PartContent::Text(_) => None,
        }
    }

    /// Split into name and payload.
    #[must_use]
    pub fn into_parts(self) -> (String, PartContent) {
        (self.name, self.content)
    }
}
