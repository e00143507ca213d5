//! Accumulates the body of one section while it is being scanned.

use std::fs::File;
use std::io::{self, BufWriter, Write};

use bodykit_core::{Charset, FileEntity, NamedEntity, TempFile};

use super::MultipartConfig;
use super::part_headers::PartHeaders;

#[derive(Debug)]
enum Storage {
    InMemory(Vec<u8>),
    // The writer is declared first so its handle closes before the file is removed.
    Spooled {
        writer: BufWriter<File>,
        file: TempFile,
        len: u64,
    },
}

/// Body bytes of the section currently being decoded.
///
/// File sections move to a temporary file once they grow past the configured spool
/// threshold. Text sections always stay in memory since they are decoded to a string.
#[derive(Debug)]
pub(crate) struct PartBody<'a> {
    headers: PartHeaders,
    config: &'a MultipartConfig,
    storage: Storage,
}

impl<'a> PartBody<'a> {
    pub(crate) fn new(headers: PartHeaders, config: &'a MultipartConfig) -> Self {
        Self {
            headers,
            config,
            storage: Storage::InMemory(Vec::new()),
        }
    }

    fn is_file(&self) -> bool {
        self.headers.filename.is_some()
    }

    pub(crate) fn append(&mut self, chunk: &[u8]) -> io::Result<()> {
        if chunk.is_empty() {
            return Ok(());
        }

        let spool = match &self.storage {
            Storage::InMemory(data) => {
                self.is_file()
                    && data.len().saturating_add(chunk.len()) > self.config.get_spool_threshold()
            }
            Storage::Spooled { .. } => false,
        };
        if spool {
            self.spool()?;
        }

        match &mut self.storage {
            Storage::InMemory(data) => data.extend_from_slice(chunk),
            Storage::Spooled { writer, len, .. } => {
                writer.write_all(chunk)?;
                *len = len.saturating_add(u64::try_from(chunk.len()).unwrap_or(u64::MAX));
            }
        }
        Ok(())
    }

    /// Move the in-memory prefix to a fresh temporary file.
    fn spool(&mut self) -> io::Result<()> {
        let Storage::InMemory(data) = &self.storage else {
            return Ok(());
        };
        let (file, handle) = TempFile::create(self.config.get_temp_dir())?;
        let mut writer = BufWriter::new(handle);
        writer.write_all(data)?;
        tracing::trace!(
            path = %file.path().display(),
            buffered = data.len(),
            "spooling multipart file section"
        );
        let len = u64::try_from(data.len()).unwrap_or(u64::MAX);
        self.storage = Storage::Spooled { writer, file, len };
        Ok(())
    }

    /// Finish the section and build its entity.
    ///
    /// The presence of a `filename` decides between a file and a text entity; text is
    /// decoded with `charset`, file bytes are kept as they are.
    pub(crate) fn finish(self, charset: Charset) -> io::Result<NamedEntity> {
        let PartHeaders { name, filename } = self.headers;
        match (filename, self.storage) {
            (None, Storage::InMemory(data)) => {
                let text = charset.decode_without_bom_handling(&data).0.into_owned();
                Ok(NamedEntity::text(name, text))
            }
            (Some(filename), Storage::InMemory(data)) => {
                Ok(NamedEntity::file(name, FileEntity::in_memory(filename, data)))
            }
            (filename, Storage::Spooled { writer, file, len }) => {
                writer.into_inner().map_err(io::IntoInnerError::into_error)?;
                Ok(NamedEntity::file(
                    name,
                    FileEntity::spooled(filename.unwrap_or_default(), file, len),
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use encoding_rs::{UTF_8, WINDOWS_1252};

    fn headers(filename: Option<&str>) -> PartHeaders {
        PartHeaders {
            name: "field".to_string(),
            filename: filename.map(str::to_string),
        }
    }

    #[test]
    fn test_text_section_is_decoded_with_charset() {
        let config = MultipartConfig::default();
        let mut body = PartBody::new(headers(None), &config);
        body.append(b"na\xefve").expect("append");
        let entity = body.finish(WINDOWS_1252).expect("finish");
        assert_eq!(entity.name(), "field");
        assert_eq!(entity.as_text().expect("text").content(), "naïve");
    }

    #[test]
    fn test_small_file_stays_in_memory() {
        let config = MultipartConfig::default();
        let mut body = PartBody::new(headers(Some("a.bin")), &config);
        body.append(&[0xff, 0x00]).expect("append");
        let entity = body.finish(UTF_8).expect("finish");
        let file = entity.as_file().expect("file");
        assert!(!file.is_spooled());
        assert_eq!(file.bytes().expect("bytes"), [0xff, 0x00]);
    }

    #[test]
    fn test_large_file_spools_to_disk() {
        let config = MultipartConfig::default().spool_threshold(8);
        let mut body = PartBody::new(headers(Some("a.bin")), &config);
        body.append(b"0123").expect("append");
        body.append(b"45678").expect("append past threshold");
        body.append(b"9").expect("append while spooled");
        let entity = body.finish(UTF_8).expect("finish");
        let file = entity.as_file().expect("file");
        assert!(file.is_spooled());
        assert_eq!(file.len(), 10);
        assert_eq!(file.bytes().expect("bytes"), b"0123456789");
    }

    #[test]
    fn test_large_text_never_spools() {
        let config = MultipartConfig::default().spool_threshold(2);
        let mut body = PartBody::new(headers(None), &config);
        body.append(b"long text").expect("append");
        let entity = body.finish(UTF_8).expect("finish");
        assert_eq!(entity.as_text().expect("text").content(), "long text");
    }

    #[test]
    fn test_abandoned_spool_is_removed() {
        let config = MultipartConfig::default().spool_threshold(1);
        let mut body = PartBody::new(headers(Some("a.bin")), &config);
        body.append(b"abc").expect("append");
        let Storage::Spooled { file, .. } = &body.storage else {
            panic!("expected spooled storage");
        };
        let path = file.path().to_path_buf();
        assert!(path.exists());
        drop(body);
        assert!(!path.exists());
    }
}
