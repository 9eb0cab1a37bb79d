use crate::core::Source;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

/// Reads content from the local filesystem. Identifiers are paths, resolved
/// against `root` when one is set.
#[derive(Debug, Clone, Default)]
pub struct FileSource {
    root: Option<PathBuf>,
}

impl FileSource {
    pub fn new() -> Self {
        Self { root: None }
    }

    pub fn with_root<P: AsRef<Path>>(mut self, root: P) -> Self {
        self.root = Some(root.as_ref().to_path_buf());
        self
    }

    fn resolve(&self, identifier: &str) -> PathBuf {
        match &self.root {
            Some(root) => root.join(identifier),
            None => PathBuf::from(identifier),
        }
    }
}

impl Source for FileSource {
    fn read(&self, identifier: &str) -> io::Result<String> {
        let path = self.resolve(identifier);
        // The handle lives only for this scope and is closed on every return.
        let mut file = File::open(&path)?;
        let mut content = String::new();
        file.read_to_string(&mut content)?;
        Ok(content)
    }
}
