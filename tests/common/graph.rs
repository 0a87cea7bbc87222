//! Temporary graph directories

use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// A graph directory that is deleted when dropped
pub struct TestGraph {
    dir: TempDir,
}

impl TestGraph {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Add `pages/<name>.md`; namespaces are written the way Logseq does
    pub fn page(self, name: &str, contents: &str) -> Self {
        let file = format!("pages/{}.md", name.replace('/', "___"));
        self.file(&file, contents)
    }

    /// Add `journals/<date>.md` for a `YYYY_MM_DD` date
    pub fn journal(self, date: &str, contents: &str) -> Self {
        self.file(&format!("journals/{}.md", date), contents)
    }

    /// Add any file relative to the graph root
    pub fn file(self, relative: &str, contents: &str) -> Self {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create directory");
        }
        fs::write(&path, contents).expect("Failed to write file");
        self
    }
}
