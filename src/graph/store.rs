//! DocumentStore: ordered collection of the documents in a knowledge base

use super::document::{normalize_name, Document, DocumentId, DocumentKind};
use std::collections::HashMap;
use thiserror::Error;

/// Errors raised while building a document store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Duplicate document: {0}")]
    DuplicateDocument(DocumentId),

    #[error("Document has an empty name")]
    EmptyName,
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Documents in first-seen order, indexed by normalized name and alias
///
/// Insertion order is the tie-break order for every ranking computed over
/// the store.
#[derive(Debug, Default, Clone)]
pub struct DocumentStore {
    documents: Vec<Document>,
    /// Normalized name -> position
    names: HashMap<String, usize>,
    /// Normalized alias -> position
    aliases: HashMap<String, usize>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from documents, failing on the first duplicate name
    pub fn from_documents(documents: impl IntoIterator<Item = Document>) -> StoreResult<Self> {
        let mut store = Self::new();
        for doc in documents {
            store.insert(doc)?;
        }
        Ok(store)
    }

    /// Append a document
    ///
    /// Aliases that collide with an existing name or alias are ignored.
    pub fn insert(&mut self, document: Document) -> StoreResult<usize> {
        let key = document.id.key();
        if key.is_empty() {
            return Err(StoreError::EmptyName);
        }
        if self.names.contains_key(&key) {
            return Err(StoreError::DuplicateDocument(document.id));
        }

        let position = self.documents.len();
        self.names.insert(key.clone(), position);
        // A real page shadows an alias declared earlier
        self.aliases.remove(&key);

        for alias in document.aliases() {
            let alias_key = normalize_name(&alias);
            if alias_key == key {
                continue;
            }
            if self.names.contains_key(&alias_key) || self.aliases.contains_key(&alias_key) {
                tracing::warn!(
                    document = %document.id,
                    alias = %alias,
                    "alias already names another document, ignoring"
                );
                continue;
            }
            self.aliases.insert(alias_key, position);
        }

        self.documents.push(document);
        Ok(position)
    }

    /// Position of the document a name refers to, by name first, then alias
    pub fn resolve(&self, name: &str) -> Option<usize> {
        let key = normalize_name(name);
        self.names
            .get(&key)
            .or_else(|| self.aliases.get(&key))
            .copied()
    }

    pub fn get(&self, name: &str) -> Option<&Document> {
        self.resolve(name).map(|i| &self.documents[i])
    }

    pub fn get_by_id(&self, id: &DocumentId) -> Option<&Document> {
        self.names.get(&id.key()).map(|&i| &self.documents[i])
    }

    /// First-seen position of a document
    pub fn position(&self, id: &DocumentId) -> Option<usize> {
        self.names.get(&id.key()).copied()
    }

    pub fn contains(&self, id: &DocumentId) -> bool {
        self.names.contains_key(&id.key())
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn iter(&self) -> impl Iterator<Item = &Document> {
        self.documents.iter()
    }

    pub fn pages(&self) -> impl Iterator<Item = &Document> {
        self.documents.iter().filter(|d| d.kind == DocumentKind::Page)
    }

    pub fn journals(&self) -> impl Iterator<Item = &Document> {
        self.documents
            .iter()
            .filter(|d| d.kind == DocumentKind::Journal)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}
