//! [`SourceSink`] implementations.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use crate::{error::Error, traits::SourceSink};

/// Keeps generated sources in memory, ordered by hint name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemorySink {
    sources: BTreeMap<String, String>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, hint_name: &str) -> Option<&str> {
        self.sources.get(hint_name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.sources.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn into_inner(self) -> BTreeMap<String, String> {
        self.sources
    }
}

impl SourceSink for MemorySink {
    fn add_source(&mut self, hint_name: &str, source: &str) -> Result<(), Error> {
        self.sources.insert(hint_name.to_string(), source.to_string());
        Ok(())
    }
}

/// Writes each source to `<root>/<hint_name>`, creating `root` when needed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectorySink {
    root: PathBuf,
}

impl DirectorySink {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Where a source with `hint_name` is written.
    pub fn path_for(&self, hint_name: &str) -> PathBuf {
        self.root.join(hint_name)
    }
}

impl SourceSink for DirectorySink {
    fn add_source(&mut self, hint_name: &str, source: &str) -> Result<(), Error> {
        if hint_name.contains(['/', '\\']) || hint_name.starts_with('.') {
            return Err(Error::invalid_options(format!(
                "hint name `{hint_name}` must be a plain file name"
            )));
        }
        fs::create_dir_all(&self.root)?;
        let path = self.path_for(hint_name);
        // Unchanged files are left alone so file watchers and incremental builds stay quiet.
        if fs::read_to_string(&path).is_ok_and(|existing| existing == source) {
            tracing::debug!(path = %path.display(), "generated file is up to date");
            return Ok(());
        }
        fs::write(&path, source)?;
        tracing::debug!(path = %path.display(), "wrote generated file");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_memory_sink_replaces_by_hint() {
        let mut sink = MemorySink::new();
        sink.add_source("A.g.cs", "one").unwrap();
        sink.add_source("A.g.cs", "two").unwrap();
        sink.add_source("B.g.cs", "three").unwrap();

        assert_eq!(sink.len(), 2);
        assert_eq!(sink.get("A.g.cs"), Some("two"));
        assert_eq!(
            sink.iter().map(|(k, _)| k).collect::<Vec<_>>(),
            vec!["A.g.cs", "B.g.cs"]
        );
    }

    #[test]
    fn test_directory_sink_writes_files() {
        let temp_dir = TempDir::new().unwrap();
        let mut sink = DirectorySink::new(temp_dir.path().join("generated"));
        sink.add_source("App.Strings.g.cs", "// text\n").unwrap();

        let written = fs::read_to_string(sink.path_for("App.Strings.g.cs")).unwrap();
        assert_eq!(written, "// text\n");
    }

    #[test]
    fn test_directory_sink_rejects_paths() {
        let temp_dir = TempDir::new().unwrap();
        let mut sink = DirectorySink::new(temp_dir.path());
        assert!(sink.add_source("../escape.g.cs", "x").is_err());
        assert!(sink.add_source("nested/file.g.cs", "x").is_err());
    }
}
