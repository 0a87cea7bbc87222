//! Reads a Logseq-style graph directory into a document store

use super::{StorageError, StorageResult};
use crate::graph::{Document, DocumentKind, DocumentStore};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

/// Directory holding Logseq's own metadata, never content
const INTERNAL_DIR: &str = "logseq";

/// Where documents live inside a graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadOptions {
    pub pages_dir: String,
    pub journals_dir: String,
    pub include_journals: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            pages_dir: "pages".to_string(),
            journals_dir: "journals".to_string(),
            include_journals: true,
        }
    }
}

/// A loaded graph plus the files that could not be used
#[derive(Debug)]
pub struct LoadedGraph {
    pub root: PathBuf,
    pub store: DocumentStore,
    pub skipped: Vec<PathBuf>,
}

/// Loader for a graph directory
///
/// Store order is deterministic: pages (sorted by path bytes), then journals
/// (sorted by file name, so by date), then any other Markdown files.
pub struct GraphLoader {
    root: PathBuf,
    options: LoadOptions,
}

impl GraphLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            options: LoadOptions::default(),
        }
    }

    pub fn with_options(mut self, options: LoadOptions) -> Self {
        self.options = options;
        self
    }

    pub fn load(&self) -> StorageResult<LoadedGraph> {
        if !self.root.is_dir() {
            return Err(StorageError::NotFound(self.root.clone()));
        }

        let mut pages = Vec::new();
        let mut journals = Vec::new();
        let mut others = Vec::new();
        let mut skipped = Vec::new();

        let walker = WalkDir::new(&self.root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !is_ignored(entry));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(error = %e, "skipping unreadable entry");
                    if let Some(path) = e.path() {
                        skipped.push(path.to_path_buf());
                    }
                    continue;
                }
            };
            if !entry.file_type().is_file() || !is_markdown(entry.path()) {
                continue;
            }

            match self.section(entry.path()) {
                Section::Pages => pages.push(entry.into_path()),
                Section::Journals if self.options.include_journals => {
                    journals.push(entry.into_path())
                }
                Section::Journals => {}
                Section::Other => others.push(entry.into_path()),
            }
        }

        let mut store = DocumentStore::new();
        let files = pages
            .into_iter()
            .map(|p| (p, DocumentKind::Page))
            .chain(journals.into_iter().map(|p| (p, DocumentKind::Journal)))
            .chain(others.into_iter().map(|p| (p, DocumentKind::Page)));

        for (path, kind) in files {
            let text = match std::fs::read_to_string(&path) {
                Ok(text) => text,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "skipping unreadable file");
                    skipped.push(path);
                    continue;
                }
            };

            let name = document_name(&path, kind);
            let relative = path.strip_prefix(&self.root).unwrap_or(&path);
            let document = Document::parse(name, kind, &text).with_path(relative);
            match store.insert(document) {
                Ok(_) => debug!(path = %path.display(), "loaded document"),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "skipping document");
                    skipped.push(path);
                }
            }
        }

        info!(
            root = %self.root.display(),
            documents = store.len(),
            skipped = skipped.len(),
            "loaded graph"
        );

        Ok(LoadedGraph {
            root: self.root.clone(),
            store,
            skipped,
        })
    }

    /// Top-level directory a file sits in
    fn section(&self, path: &Path) -> Section {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        let mut components = relative.components();
        let first = components.next().and_then(|c| c.as_os_str().to_str());
        // Files directly under the root are never in a section
        if components.next().is_none() {
            return Section::Other;
        }
        match first {
            Some(dir) if dir == self.options.pages_dir => Section::Pages,
            Some(dir) if dir == self.options.journals_dir => Section::Journals,
            _ => Section::Other,
        }
    }
}

enum Section {
    Pages,
    Journals,
    Other,
}

/// Load a graph with the given options
pub fn load_graph(root: impl AsRef<Path>, options: &LoadOptions) -> StorageResult<LoadedGraph> {
    GraphLoader::new(root.as_ref())
        .with_options(options.clone())
        .load()
}

fn is_ignored(entry: &DirEntry) -> bool {
    let name = entry.file_name().to_string_lossy();
    if name.starts_with('.') {
        return true;
    }
    entry.file_type().is_dir() && entry.depth() == 1 && name == INTERNAL_DIR
}

fn is_markdown(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("md") || ext.eq_ignore_ascii_case("markdown"))
        .unwrap_or(false)
}

/// Document name for a file
///
/// Journals named `YYYY_MM_DD` get a date title; other names decode the
/// namespace separators Logseq writes into file names.
pub fn document_name(path: &Path, kind: DocumentKind) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    if kind == DocumentKind::Journal {
        if let Ok(date) = NaiveDate::parse_from_str(&stem, "%Y_%m_%d") {
            return journal_title(date);
        }
    }
    decode_file_name(&stem)
}

/// `a___b` and `a%2Fb` both name the page `a/b`
pub fn decode_file_name(stem: &str) -> String {
    stem.replace("___", "/")
        .replace("%2F", "/")
        .replace("%2f", "/")
}

/// Logseq's default journal title, e.g. `Jan 15th, 2024`
pub fn journal_title(date: NaiveDate) -> String {
    let day = date.day();
    let suffix = match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{} {}{}, {}", date.format("%b"), day, suffix, date.year())
}
