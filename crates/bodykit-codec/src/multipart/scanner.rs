//! Boundary scanner: the multipart decode state machine.
//!
//! ```text
//! SeekFirstBoundary ──────────────────────▶ PartHeaders ──▶ PartBody
//!        │                                       ▲                │
//!        │              SeekNextBoundary ────────┘                │
//!        │                  ▲      │                              │
//!        ▼                  │      ▼                              │
//!    Terminated ◀───────────┼──────┘                              │
//!                           └─────────────────────────────────────┘
//! ```
//!
//! `SeekNextBoundary` resolves what follows a boundary token: `--` closes the body,
//! optional blanks then CRLF open the next section, anything else is malformed.
//!
//! `SeekFirstBoundary` is more lenient, since everything before the first boundary line is
//! preamble. A boundary token followed by blanks and CRLF opens the body wherever it
//! appears, while the closing form only counts at the start of a line. Any other
//! occurrence is skipped as preamble.
//!
//! All matching happens on raw bytes inside a [`Window`]. When a delimiter is not fully
//! buffered, everything but the last `delimiter.len() - 1` bytes is released and the
//! window is refilled, so a delimiter straddling two reads is still found.

use std::io::Read;

use bodykit_core::{Charset, NamedEntity};
use memchr::memmem::Finder;

use super::MultipartConfig;
use super::error::MultipartError;
use super::part_body::PartBody;
use super::part_headers::{PartHeaders, parse_part_headers};
use super::window::Window;

const CRLF: &[u8] = b"\r\n";
const CLOSE: &[u8] = b"--";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    SeekFirstBoundary,
    SeekNextBoundary,
    PartHeaders,
    PartBody,
    Terminated,
}

/// What followed a boundary token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Delimiter {
    Next,
    Close,
}

/// Decodes one multipart body into its sections.
pub(crate) struct Scanner<'a, R> {
    window: Window<R>,
    /// `--` followed by the boundary parameter.
    boundary: Vec<u8>,
    /// Finds `boundary` anywhere in the preamble.
    opening: Finder<'static>,
    /// CRLF followed by `boundary`; separates a section body from the next boundary.
    delimiter: Finder<'static>,
    config: &'a MultipartConfig,
    charset: Charset,
    phase: Phase,
    pending: Option<PartHeaders>,
    entities: Vec<NamedEntity>,
}

impl<'a, R: Read> Scanner<'a, R> {
    pub(crate) fn new(
        source: R,
        boundary: &str,
        config: &'a MultipartConfig,
        charset: Charset,
    ) -> Self {
        let boundary = format!("--{boundary}").into_bytes();
        let mut delimiter = Vec::with_capacity(boundary.len() + CRLF.len());
        delimiter.extend_from_slice(CRLF);
        delimiter.extend_from_slice(&boundary);

        Self {
            window: Window::new(source),
            opening: Finder::new(&boundary).into_owned(),
            boundary,
            delimiter: Finder::new(&delimiter).into_owned(),
            config,
            charset,
            phase: Phase::SeekFirstBoundary,
            pending: None,
            entities: Vec::new(),
        }
    }

    /// Run to completion.
    ///
    /// On failure every section decoded so far is dropped, releasing its resources.
    pub(crate) fn run(mut self) -> Result<Vec<NamedEntity>, MultipartError> {
        loop {
            let next = match self.phase {
                Phase::SeekFirstBoundary => match self.seek_first_boundary()? {
                    Delimiter::Next => Phase::PartHeaders,
                    Delimiter::Close => Phase::Terminated,
                },
                Phase::SeekNextBoundary => match self.read_boundary_suffix()? {
                    Delimiter::Next => Phase::PartHeaders,
                    Delimiter::Close => Phase::Terminated,
                },
                Phase::PartHeaders => {
                    self.pending = Some(self.read_part_headers()?);
                    Phase::PartBody
                }
                Phase::PartBody => {
                    let headers = self.pending.take().unwrap_or_default();
                    let entity = self.read_part_body(headers)?;
                    self.entities.push(entity);
                    Phase::SeekNextBoundary
                }
                Phase::Terminated => return Ok(self.entities),
            };
            tracing::trace!(from = ?self.phase, to = ?next, "multipart scanner transition");
            self.phase = next;
        }
    }

    /// Skip the preamble and consume the first boundary line.
    fn seek_first_boundary(&mut self) -> Result<Delimiter, MultipartError> {
        if !self.window.require(self.boundary.len())? {
            return Err(MultipartError::TooShort);
        }

        // The two bytes before the window; the input start counts as a line start.
        let mut preceding = [b'\r', b'\n'];
        loop {
            let Some(start) = self.opening.find(self.window.bytes()) else {
                let safe = self.window.len().saturating_sub(self.boundary.len() - 1);
                self.skip_preamble(safe, &mut preceding);
                if !self.window.fill()? {
                    return Err(MultipartError::NoFirstBoundary);
                }
                continue;
            };

            self.skip_preamble(start, &mut preceding);
            let line_start = preceding == [b'\r', b'\n'];
            match self.peek_boundary_suffix(self.boundary.len())? {
                Some((Delimiter::Next, len)) => {
                    self.window.consume(self.boundary.len() + len);
                    return Ok(Delimiter::Next);
                }
                Some((Delimiter::Close, len)) if line_start => {
                    self.window.consume(self.boundary.len() + len);
                    return Ok(Delimiter::Close);
                }
                _ => self.skip_preamble(1, &mut preceding),
            }
        }
    }

    /// Drop `n` preamble bytes, remembering the last two of them.
    fn skip_preamble(&mut self, n: usize, preceding: &mut [u8; 2]) {
        let skipped = &self.window.bytes()[..n];
        match skipped {
            [] => {}
            [only] => *preceding = [preceding[1], *only],
            [.., a, b] => *preceding = [*a, *b],
        }
        self.window.consume(n);
    }

    /// Classify and consume the bytes right after a boundary token.
    fn read_boundary_suffix(&mut self) -> Result<Delimiter, MultipartError> {
        match self.peek_boundary_suffix(0)? {
            Some((delimiter, len)) => {
                self.window.consume(len);
                Ok(delimiter)
            }
            None => Err(MultipartError::InvalidBoundarySuffix),
        }
    }

    /// Look at the bytes from `offset` on without consuming them.
    ///
    /// Returns the delimiter kind and how many bytes its suffix spans: `--`, or blanks
    /// followed by CRLF. `None` if neither follows.
    fn peek_boundary_suffix(
        &mut self,
        offset: usize,
    ) -> Result<Option<(Delimiter, usize)>, MultipartError> {
        if self.window.require(offset + CLOSE.len())?
            && self.window.bytes()[offset..].starts_with(CLOSE)
        {
            return Ok(Some((Delimiter::Close, CLOSE.len())));
        }

        // Blanks may pad the boundary line before its CRLF.
        let mut end = offset;
        while self.window.require(end + 1)? && matches!(self.window.bytes()[end], b' ' | b'\t') {
            end += 1;
        }
        if self.window.require(end + CRLF.len())?
            && self.window.bytes()[end..].starts_with(CRLF)
        {
            return Ok(Some((Delimiter::Next, end + CRLF.len() - offset)));
        }
        Ok(None)
    }

    /// Read CRLF-terminated header lines up to the blank separator line.
    fn read_part_headers(&mut self) -> Result<PartHeaders, MultipartError> {
        let max = self.config.get_max_header_size();
        let mut lines: Vec<Vec<u8>> = Vec::new();
        let mut total = 0usize;

        loop {
            let mut line = Vec::new();
            loop {
                let buffered = self.window.bytes();
                if let Some(end) = memchr::memmem::find(buffered, CRLF) {
                    line.extend_from_slice(&buffered[..end]);
                    self.window.consume(end + CRLF.len());
                    break;
                }
                // A trailing CR may be the first half of a split CRLF.
                let take = buffered.len() - usize::from(buffered.last() == Some(&b'\r'));
                line.extend_from_slice(&buffered[..take]);
                self.window.consume(take);

                if total.saturating_add(line.len()) > max {
                    return Err(MultipartError::HeadersTooLarge { max });
                }
                if !self.window.fill()? {
                    return Err(MultipartError::UnterminatedHeaders);
                }
            }

            total = total.saturating_add(line.len() + CRLF.len());
            if total > max {
                return Err(MultipartError::HeadersTooLarge { max });
            }
            if line.is_empty() {
                return Ok(parse_part_headers(&lines, self.charset));
            }
            lines.push(line);
        }
    }

    /// Collect a section body up to the next delimiter and build its entity.
    fn read_part_body(&mut self, headers: PartHeaders) -> Result<NamedEntity, MultipartError> {
        let mut body = PartBody::new(headers, self.config);

        // The blank line ending the headers doubles as the delimiter's CRLF for an empty
        // section written without one of its own.
        let empty = self.window.require(self.boundary.len())?
            && self.window.bytes().starts_with(&self.boundary);
        if empty {
            self.window.consume(self.boundary.len());
        } else if !self.scan_to_delimiter(Some(&mut body))? {
            return Err(MultipartError::UnterminatedBody);
        }

        Ok(body.finish(self.charset)?)
    }

    /// Advance past the next CRLF + boundary, handing skipped bytes to `body`.
    ///
    /// Returns `false` if the input ends first. Bytes that may still be the start of a
    /// delimiter are kept buffered until more input arrives.
    fn scan_to_delimiter(
        &mut self,
        mut body: Option<&mut PartBody<'_>>,
    ) -> Result<bool, MultipartError> {
        let keep = self.delimiter.needle().len() - 1;
        loop {
            let buffered = self.window.bytes();
            if let Some(start) = self.delimiter.find(buffered) {
                if let Some(body) = body.as_deref_mut() {
                    body.append(&buffered[..start])?;
                }
                let end = start + self.delimiter.needle().len();
                self.window.consume(end);
                return Ok(true);
            }

            let safe = buffered.len().saturating_sub(keep);
            if safe > 0 {
                if let Some(body) = body.as_deref_mut() {
                    body.append(&buffered[..safe])?;
                }
                self.window.consume(safe);
            }
            if !self.window.fill()? {
                return Ok(false);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::multipart::SMALL_BUFFER;
    use encoding_rs::UTF_8;

    fn scan(body: &[u8]) -> Result<Vec<NamedEntity>, MultipartError> {
        let config = MultipartConfig::default();
        Scanner::new(body, "--token", &config, UTF_8).run()
    }

    fn texts(entities: &[NamedEntity]) -> Vec<(&str, &str)> {
        entities
            .iter()
            .filter_map(|entity| Some((entity.name(), entity.as_text()?.content())))
            .collect()
    }

    #[test]
    fn test_preamble_may_run_into_the_boundary() {
        let entities = scan(
            b"xx----token\r\nContent-Disposition: form-data; name=\"k\"\r\n\r\nv\r\n----token--",
        )
        .expect("decode");
        assert_eq!(texts(&entities), [("k", "v")]);
    }

    #[test]
    fn test_boundary_lookalike_line_in_preamble_is_skipped() {
        let entities = scan(
            b"see\r\n----token-ish note\r\n----token\r\nContent-Disposition: form-data; name=\"k\"\r\n\r\nv\r\n----token--",
        )
        .expect("decode");
        assert_eq!(texts(&entities), [("k", "v")]);
    }

    #[test]
    fn test_boundary_with_trailing_blanks_in_preamble_is_skipped() {
        let entities = scan(
            b"----token  x\r\n----token \t\r\nContent-Disposition: form-data; name=\"k\"\r\n\r\nv\r\n----token--",
        )
        .expect("decode");
        assert_eq!(texts(&entities), [("k", "v")]);
    }

    #[test]
    fn test_close_form_only_counts_at_line_start() {
        assert!(scan(b"junk\r\n----token--").expect("decode").is_empty());
        assert!(matches!(
            scan(b"----tokenContent----token--"),
            Err(MultipartError::NoFirstBoundary)
        ));
    }

    #[test]
    fn test_preamble_straddling_reads() {
        let mut body = vec![b'p'; SMALL_BUFFER - 4];
        body.extend_from_slice(
            b"----token\r\nContent-Disposition: form-data; name=\"k\"\r\n\r\nv\r\n----token--",
        );
        let entities = scan(&body).expect("decode");
        assert_eq!(texts(&entities), [("k", "v")]);
    }
}
