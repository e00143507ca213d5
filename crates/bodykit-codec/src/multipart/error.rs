/// Structural failures detected while scanning a multipart body.
///
/// These never reach callers directly: the serializer reports all of them as one
/// [`EntityError::Read`](bodykit_core::EntityError::Read) and keeps this as its source.
#[derive(Debug, thiserror::Error)]
pub enum MultipartError {
    /// The body is empty or shorter than the boundary token.
    #[error("body is shorter than the boundary")]
    TooShort,

    /// No boundary line was found.
    #[error("no first boundary")]
    NoFirstBoundary,

    /// A boundary token was followed by something other than `--` or CRLF.
    #[error("invalid content after boundary")]
    InvalidBoundarySuffix,

    /// The input ended inside a section's header block.
    #[error("unterminated part headers")]
    UnterminatedHeaders,

    /// A section's header block exceeded the configured limit.
    #[error("part headers exceed {max} bytes")]
    HeadersTooLarge { max: usize },

    /// The input ended before a section body's closing delimiter.
    #[error("unterminated part body")]
    UnterminatedBody,

    /// Reading the body or spooling a file section failed.
    #[error("multipart I/O error: {0}")]
    Io(#[from] std::io::Error),
}
