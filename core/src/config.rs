use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Tunables for the analyzer and its listings, read from a JSON file.
/// Missing fields fall back to their defaults.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Slots preallocated in the word table
    pub initial_capacity: usize,

    /// Words printed per page in full listings, `0` disables paging
    pub page_size: usize,

    /// Leading words shown when printing a single paragraph
    pub excerpt_words: usize,

    /// Inserted before `.txt` in the name of a cleaned copy
    pub clean_suffix: String,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 16,
            page_size: 20,
            excerpt_words: 50,
            clean_suffix: "limpio".to_string(),
        }
    }
}

impl AnalyzerConfig {
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;

        Self::from_json(&json).with_context(|| format!("invalid config {}", path.display()))
    }
}
