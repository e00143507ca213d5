//! File entities: uploaded file content with a declared filename.

use std::fs::File;
use std::io::{self, Cursor, Read, Take, Write};
use std::path::Path;

use super::temp::TempFile;

#[derive(Debug)]
enum FileStorage {
    InMemory(Vec<u8>),
    Spooled { file: TempFile, len: u64 },
}

/// An uploaded file.
///
/// Content lives either in memory or in a temporary file owned exclusively by this
/// entity. [`FileEntity::close`] releases the backing resource; dropping does the same.
#[derive(Debug)]
pub struct FileEntity {
    filename: String,
    storage: FileStorage,
    closed: bool,
}

impl FileEntity {
    /// A file whose content is held in memory.
    #[must_use]
    pub fn in_memory(filename: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            storage: FileStorage::InMemory(data),
            closed: false,
        }
    }

    /// A file whose content was spooled to `file`, holding `len` bytes.
    #[must_use]
    pub fn spooled(filename: impl Into<String>, file: TempFile, len: u64) -> Self {
        Self {
            filename: filename.into(),
            storage: FileStorage::Spooled { file, len },
            closed: false,
        }
    }

    /// The filename declared by the sender. May be empty.
    #[must_use]
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Content length in bytes.
    #[must_use]
    pub fn len(&self) -> u64 {
        match &self.storage {
            FileStorage::InMemory(data) => u64::try_from(data.len()).unwrap_or(u64::MAX),
            FileStorage::Spooled { len, .. } => *len,
        }
    }

    /// Returns true if the file has no content.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true when the content is backed by a temporary file.
    #[must_use]
    pub fn is_spooled(&self) -> bool {
        matches!(self.storage, FileStorage::Spooled { .. })
    }

    /// Path of the backing temporary file, if spooled.
    #[must_use]
    pub fn spooled_path(&self) -> Option<&Path> {
        match &self.storage {
            FileStorage::InMemory(_) => None,
            FileStorage::Spooled { file, .. } => Some(file.path()),
        }
    }

    /// Open a reader over the content, positioned at the start.
    pub fn reader(&self) -> io::Result<FileReader<'_>> {
        self.ensure_open()?;
        let inner = match &self.storage {
            FileStorage::InMemory(data) => ReaderInner::Memory(Cursor::new(data.as_slice())),
            FileStorage::Spooled { file, len } => ReaderInner::Disk(file.open()?.take(*len)),
        };
        Ok(FileReader {
            inner,
            len: self.len(),
        })
    }

    /// Read the whole content into memory.
    pub fn bytes(&self) -> io::Result<Vec<u8>> {
        let mut reader = self.reader()?;
        let mut out = Vec::with_capacity(usize::try_from(reader.len()).unwrap_or(0));
        reader.read_to_end(&mut out)?;
        Ok(out)
    }

    /// Copy the content into `writer`, returning the number of bytes copied.
    pub fn transfer_to<W: Write + ?Sized>(&self, writer: &mut W) -> io::Result<u64> {
        let mut reader = self.reader()?;
        io::copy(&mut reader, writer)
    }

    /// Release the backing resource. Closing twice is a no-op.
    pub fn close(&mut self) -> io::Result<()> {
        if self.closed {
            return Ok(());
        }
        match &mut self.storage {
            FileStorage::InMemory(data) => *data = Vec::new(),
            FileStorage::Spooled { file, .. } => file.release()?,
        }
        self.closed = true;
        Ok(())
    }

    /// Returns true once [`FileEntity::close`] has succeeded.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn ensure_open(&self) -> io::Result<()> {
        if self.closed {
            Err(io::Error::other("file entity is closed"))
        } else {
            Ok(())
        }
    }
}

#[derive(Debug)]
enum ReaderInner<'a> {
    Memory(Cursor<&'a [u8]>),
    Disk(Take<File>),
}

/// Length-bearing reader over a [`FileEntity`]'s content.
#[derive(Debug)]
pub struct FileReader<'a> {
    inner: ReaderInner<'a>,
    len: u64,
}

impl FileReader<'_> {
    /// Total content length, independent of how much has been read.
    #[must_use]
    pub fn len(&self) -> u64 {
        self.len
    }

    /// Returns true if the content is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Read for FileReader<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match &mut self.inner {
            ReaderInner::Memory(cursor) => cursor.read(buf),
            ReaderInner::Disk(file) => file.read(buf),
        }
    }
}
