use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Excerpt reported for a source with no content at all.
const EMPTY_EXCERPT: &str = "<empty>";

/// Predicates the stages apply to content, plus the names they report on
/// failure. The defaults reproduce the reference demonstration scenarios.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    /// Token that makes loaded content structurally invalid.
    pub parse_marker: String,
    /// Token that fails validation; also reported as the offending field.
    pub validation_marker: String,
    /// Minimum length of the validated body (prefix excluded).
    pub min_length: usize,
    /// Task name reported by processing failures.
    pub task_name: String,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            parse_marker: "malformed".to_string(),
            validation_marker: "invalid_field".to_string(),
            min_length: 10,
            task_name: "Data Processing".to_string(),
        }
    }
}

impl Rules {
    pub fn from_toml_str(s: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(s)?)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading rules file {}", path.display()))?;
        Self::from_toml_str(&text)
    }

    /// Returns the offending excerpt when `content` cannot be accepted by
    /// the load stage.
    pub fn parse_violation(&self, content: &str) -> Option<String> {
        if content.is_empty() {
            return Some(EMPTY_EXCERPT.to_string());
        }
        if !self.parse_marker.is_empty() && content.contains(&self.parse_marker) {
            return Some(self.parse_marker.clone());
        }
        None
    }

    /// Returns `(field_name, invalid_value)` when `data` breaks the domain rule.
    pub fn validation_violation(&self, data: &str) -> Option<(String, String)> {
        if !self.validation_marker.is_empty() && data.contains(&self.validation_marker) {
            return Some((
                self.validation_marker.clone(),
                "contains disallowed value".to_string(),
            ));
        }
        None
    }
}
