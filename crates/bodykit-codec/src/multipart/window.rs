//! Sliding read window over a multipart body.

use std::io::{self, ErrorKind, Read};

use bytes::{Buf, BytesMut};

/// Size of one refill of the window.
///
/// Delimiters are searched for in the buffered bytes only, so a delimiter may straddle
/// two refills; callers keep a tail of `delimiter.len() - 1` bytes between searches.
pub const SMALL_BUFFER: usize = 256;

/// Buffered, forward-only view of a byte source.
///
/// Bytes are appended in chunks of at most [`SMALL_BUFFER`] and dropped once consumed,
/// so the resident size is bounded by what the caller leaves unconsumed plus one chunk.
#[derive(Debug)]
pub(crate) struct Window<R> {
    source: R,
    buf: BytesMut,
    eof: bool,
}

impl<R: Read> Window<R> {
    pub(crate) fn new(source: R) -> Self {
        Self {
            source,
            buf: BytesMut::with_capacity(2 * SMALL_BUFFER),
            eof: false,
        }
    }

    /// Currently buffered, unconsumed bytes.
    pub(crate) fn bytes(&self) -> &[u8] {
        &self.buf
    }

    pub(crate) fn len(&self) -> usize {
        self.buf.len()
    }

    /// Drop `n` buffered bytes from the front.
    pub(crate) fn consume(&mut self, n: usize) {
        self.buf.advance(n);
    }

    /// Read one more chunk from the source.
    ///
    /// Returns `false` once the source is exhausted.
    pub(crate) fn fill(&mut self) -> io::Result<bool> {
        if self.eof {
            return Ok(false);
        }

        let mut chunk = [0u8; SMALL_BUFFER];
        loop {
            match self.source.read(&mut chunk) {
                Ok(0) => {
                    self.eof = true;
                    return Ok(false);
                }
                Ok(read) => {
                    self.buf.extend_from_slice(&chunk[..read]);
                    return Ok(true);
                }
                Err(err) if err.kind() == ErrorKind::Interrupted => {}
                Err(err) => return Err(err),
            }
        }
    }

    /// Refill until at least `n` bytes are buffered.
    ///
    /// Returns `false` if the source ends first; whatever was read stays buffered.
    pub(crate) fn require(&mut self, n: usize) -> io::Result<bool> {
        while self.buf.len() < n {
            if !self.fill()? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}
