//! Filesystem access
//!
//! Reading graph directories into a [`DocumentStore`](crate::graph::DocumentStore)
//! and writing rendered reports back out.

mod loader;
mod writer;

pub use loader::{
    decode_file_name, document_name, journal_title, load_graph, GraphLoader, LoadOptions,
    LoadedGraph,
};
pub use writer::ReportWriter;

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur reading or writing files
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Graph directory not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("IO error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
