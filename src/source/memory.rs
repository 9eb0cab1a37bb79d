use crate::core::Source;
use std::collections::HashMap;
use std::io;

/// In-memory identifier to content map.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    entries: HashMap<String, String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, identifier: impl Into<String>, content: impl Into<String>) -> Self {
        self.insert(identifier, content);
        self
    }

    pub fn insert(&mut self, identifier: impl Into<String>, content: impl Into<String>) {
        self.entries.insert(identifier.into(), content.into());
    }
}

impl Source for MemorySource {
    fn read(&self, identifier: &str) -> io::Result<String> {
        self.entries.get(identifier).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no entry named '{}'", identifier),
            )
        })
    }
}
