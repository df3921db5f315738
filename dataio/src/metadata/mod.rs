//! Metadata documents and their assembly.
//!
//! [`fields`] and [`data`] hold the blocks shared by all record classes,
//! [`MetadataDocument`] dispatches on the record class, and
//! [`MetadataAssembler`] produces validated object documents.

mod assembler;
pub mod data;
mod document;
pub mod fields;
mod prune;
mod schema;

pub use assembler::MetadataAssembler;
pub use document::{CaseMetadata, ContextMetadata, MetadataDocument, ObjectMetadata};
pub use prune::prune_nulls;
pub use schema::{validate_document, validate_value};
