//! Entity serializers for bodykit.
//!
//! The centerpiece is [`MultipartEntitySerializer`], a streaming `multipart/*` decoder
//! that reads the body through a small sliding window and spools large file sections to
//! temporary files. [`JsonEntitySerializer`] and [`BinaryEntitySerializer`] implement the
//! same [`EntitySerializer`](bodykit_core::EntitySerializer) contract for JSON objects and
//! opaque bytes.
//!
//! # Example
//!
//! ```
//! use bodykit_codec::MultipartEntitySerializer;
//! use bodykit_core::{EntitySerializer, MessageHead};
//!
//! let message = MessageHead::new()
//!     .with_header("Content-Type", "multipart/form-data; boundary=XyZ");
//! let body = b"--XyZ\r\n\
//!     Content-Disposition: form-data; name=\"greeting\"\r\n\
//!     \r\n\
//!     hello\r\n\
//!     --XyZ--\r\n";
//!
//! let entity = MultipartEntitySerializer::new()
//!     .deserialize_entity(body, encoding_rs::UTF_8, &message)
//!     .unwrap();
//! assert_eq!(entity.text("greeting"), Some("hello"));
//! ```

#![forbid(unsafe_code)]

mod binary;
mod json;
pub mod multipart;

pub use binary::BinaryEntitySerializer;
pub use json::JsonEntitySerializer;
pub use multipart::{MultipartConfig, MultipartEntitySerializer, MultipartError};
