pub mod schema;
pub mod document;
pub mod validation;
pub mod render;
pub mod collect;
pub mod registry;
pub mod error;

pub use error::{ChsonError, Result};
pub use schema::{detect_version, SchemaVersion};
pub use document::{
    format_example, load_document, parse_document, read_document, Document, DocumentV1, Entry,
    RetrievalDirection, Section, VersionedDocument,
};
pub use registry::{CheatsheetRef, Registry};
