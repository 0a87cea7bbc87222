//! Document store: the pages and journal entries of a knowledge base

mod document;
mod outline;
mod store;


pub use document::{
    normalize_name, property_list, Block, Document, DocumentId, DocumentKind, Properties,
};
pub use outline::{parse_outline, parse_property_line, Outline};
pub use store::{DocumentStore, StoreError, StoreResult};
