//! Writes rendered reports into an output directory

use super::{StorageError, StorageResult};
use std::path::{Path, PathBuf};
use tracing::info;

pub struct ReportWriter {
    dir: PathBuf,
}

impl ReportWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write one file, creating the output directory on first use
    pub fn write(&self, file_name: &str, contents: &str) -> StorageResult<PathBuf> {
        std::fs::create_dir_all(&self.dir).map_err(|source| StorageError::Io {
            path: self.dir.clone(),
            source,
        })?;

        let path = self.dir.join(file_name);
        std::fs::write(&path, contents).map_err(|source| StorageError::Io {
            path: path.clone(),
            source,
        })?;
        info!(path = %path.display(), bytes = contents.len(), "wrote report");
        Ok(path)
    }

    /// Write several files, stopping at the first failure
    pub fn write_all<'a, I>(&self, files: I) -> StorageResult<Vec<PathBuf>>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        files
            .into_iter()
            .map(|(name, contents)| self.write(name, contents))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_creates_directory() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("reports").join("2024");
        let writer = ReportWriter::new(&out);

        let path = writer.write("summary-report.md", "# Summary\n").unwrap();
        assert_eq!(path, out.join("summary-report.md"));
        assert_eq!(std::fs::read_to_string(path).unwrap(), "# Summary\n");
    }

    #[test]
    fn test_write_all_overwrites() {
        let dir = TempDir::new().unwrap();
        let writer = ReportWriter::new(dir.path());
        writer.write("a.md", "old").unwrap();

        let paths = writer
            .write_all([("a.md", "new"), ("b.md", "b")])
            .unwrap();
        assert_eq!(paths.len(), 2);
        assert_eq!(std::fs::read_to_string(dir.path().join("a.md")).unwrap(), "new");
    }

    #[test]
    fn test_write_into_file_path_fails() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();

        let result = ReportWriter::new(&blocker).write("a.md", "x");
        assert!(matches!(result, Err(StorageError::Io { .. })));
    }
}
