//! HTTP body entities.
//!
//! - [`ObjectEntity`] and [`BinaryEntity`] hold a whole body as one value.
//! - [`PartitionedEntity`] holds a multipart body as ordered [`NamedEntity`] sections,
//!   each either a [`TextEntity`] or a [`FileEntity`].
//!
//! File content may be spooled to a [`TempFile`] owned by exactly one [`FileEntity`].

mod file;
mod named;
mod partitioned;
mod temp;
mod value;

pub use file::{FileEntity, FileReader};
pub use named::{NamedEntity, PartContent, TextEntity};
pub use partitioned::PartitionedEntity;
pub use temp::TempFile;
pub use value::{BinaryEntity, ObjectEntity};
