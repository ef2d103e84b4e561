pub mod document_kind;
pub mod document_metadata;
pub mod file_hash;
pub mod processing_status;
pub mod source_reference;

pub use document_kind::DocumentKind;
pub use document_metadata::DocumentMetadata;
pub use file_hash::FileHash;
pub use processing_status::ProcessingStatus;
pub use source_reference::{SourceReference, format_sources};
