//! Core types for bodykit.
//!
//! This crate provides the entity model shared by every body codec:
//! - [`HeaderValue`] and [`ContentType`] for parameterized header values
//! - [`HttpMessage`], the view of a message a codec is allowed to see
//! - Entities: [`PartitionedEntity`], [`NamedEntity`], [`FileEntity`], [`ObjectEntity`], ...
//! - [`EntitySerializer`], the contract every codec implements
//! - [`EntityError`], the two failure kinds codecs report
//!
//! # Design Principles
//!
//! - Entities own their resources; closing or dropping releases them
//! - Multipart sections are a sum type, never "text with an optional file"
//! - All types support `Send`

#![forbid(unsafe_code)]

pub mod entity;
pub mod error;
pub mod header;
mod message;
pub mod serializer;

pub use entity::{
    BinaryEntity, FileEntity, FileReader, NamedEntity, ObjectEntity, PartContent,
    PartitionedEntity, TempFile, TextEntity,
};
pub use error::{BoxError, EntityError};
pub use header::{ContentType, HeaderValue, ParameterCollection};
pub use message::{HttpMessage, MessageHead, MessageHeaders};
pub use serializer::{Charset, EntitySerializer, mime};
