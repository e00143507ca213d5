//! Partitioned entities: the decoded form of a multipart body.

use std::io;

use super::file::FileEntity;
use super::named::NamedEntity;
use crate::header::ContentType;

/// Ordered multipart sections, in the order they appeared in the body.
///
/// Owns every file's backing resource. [`PartitionedEntity::close`] releases them all;
/// dropping an unclosed entity does the same.
#[derive(Debug, Default)]
pub struct PartitionedEntity {
    entities: Vec<NamedEntity>,
    /// Content type of the message the sections were decoded from.
    content_type: Option<ContentType>,
    closed: bool,
}

impl PartitionedEntity {
    /// Wrap decoded sections.
    #[must_use]
    pub fn new(entities: Vec<NamedEntity>) -> Self {
        Self {
            entities,
            content_type: None,
            closed: false,
        }
    }

    /// Attach the content type of the message the body came from.
    #[must_use]
    pub fn with_content_type(mut self, content_type: ContentType) -> Self {
        self.content_type = Some(content_type);
        self
    }

    /// Content type of the originating message, carrying its boundary and charset.
    #[must_use]
    pub fn content_type(&self) -> Option<&ContentType> {
        self.content_type.as_ref()
    }

    /// All sections in stream order.
    #[must_use]
    pub fn entities(&self) -> &[NamedEntity] {
        &self.entities
    }

    /// Mutable access to the sections.
    pub fn entities_mut(&mut self) -> &mut [NamedEntity] {
        &mut self.entities
    }

    /// Returns the number of sections.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Returns true if the body had no sections.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// First section with this name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&NamedEntity> {
        self.entities.iter().find(|entity| entity.name() == name)
    }

    /// Content of the first text field with this name.
    #[must_use]
    pub fn text(&self, name: &str) -> Option<&str> {
        self.entities
            .iter()
            .filter(|entity| entity.name() == name)
            .find_map(NamedEntity::as_text)
            .map(|text| text.content())
    }

    /// First file upload with this name.
    #[must_use]
    pub fn file(&self, name: &str) -> Option<&FileEntity> {
        self.entities
            .iter()
            .filter(|entity| entity.name() == name)
            .find_map(NamedEntity::as_file)
    }

    /// All text fields as `(name, content)` pairs.
    pub fn texts(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entities
            .iter()
            .filter_map(|entity| Some((entity.name(), entity.as_text()?.content())))
    }

    /// All file uploads as `(name, file)` pairs.
    pub fn files(&self) -> impl Iterator<Item = (&str, &FileEntity)> {
        self.entities
            .iter()
            .filter_map(|entity| Some((entity.name(), entity.as_file()?)))
    }

    /// Consume the entity and return its sections.
    ///
    /// Ownership of file resources moves to the caller.
    #[must_use]
    pub fn into_entities(mut self) -> Vec<NamedEntity> {
        std::mem::take(&mut self.entities)
    }

    /// Release every file's backing resource.
    ///
    /// All files are released even if one fails; the first failure is returned. Closing an
    /// already closed entity is a no-op.
    pub fn close(&mut self) -> io::Result<()> {
        if self.closed {
            return Ok(());
        }
        let mut first_err = None;
        for entity in &mut self.entities {
            if let Some(file) = entity.as_file_mut() {
                if let Err(err) = file.close() {
                    first_err.get_or_insert(err);
                }
            }
        }
        match first_err {
            Some(err) => Err(err),
            None => {
                self.closed = true;
                Ok(())
            }
        }
    }

    /// Returns true once [`PartitionedEntity::close`] has succeeded.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl Drop for PartitionedEntity {
    fn drop(&mut self) {
        if let Err(err) = self.close() {
            tracing::warn!(error = %err, "failed to release multipart file resources");
        }
    }
}

impl<'a> IntoIterator for &'a PartitionedEntity {
    type Item = &'a NamedEntity;
    type IntoIter = std::slice::Iter<'a, NamedEntity>;

    fn into_iter(self) -> Self::IntoIter {
        self.entities.iter()
    }
}

impl From<Vec<NamedEntity>> for PartitionedEntity {
    fn from(entities: Vec<NamedEntity>) -> Self {
        Self::new(entities)
    }
}
