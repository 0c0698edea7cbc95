//! Title filter: the set of pages worth keeping, loaded once per run.

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Immutable set of page titles. Never mutated after construction, so
/// workers share it behind an `Arc` with no locking.
#[derive(Debug, Default)]
pub struct TitleSet {
    titles: HashSet<String>,
}

impl TitleSet {
    /// Load from a JSON array of strings: `["Title 1", "Title 2", ...]`.
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("failed to open titles file {}", path.display()))?;
        let titles: Vec<String> = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("{} is not a JSON array of strings", path.display()))?;
        Ok(titles.into_iter().collect())
    }

    pub fn contains(&self, title: &str) -> bool {
        self.titles.contains(title)
    }

    pub fn len(&self) -> usize {
        self.titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }
}

impl FromIterator<String> for TitleSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            titles: iter.into_iter().collect(),
        }
    }
}
