//! Name → URI catalogs for news feeds and radio stations.

use crate::config::NamedUri;

/// A catalog that keeps the order entries were declared in.
///
/// Built once per configuration load and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    entries: Vec<NamedUri>,
}

impl Catalog {
    /// Build from configured entries.  A repeated name keeps its first URI.
    pub fn new(entries: impl IntoIterator<Item = NamedUri>) -> Self {
        let mut out: Vec<NamedUri> = Vec::new();
        for entry in entries {
            if !out.iter().any(|e| e.name == entry.name) {
                out.push(entry);
            }
        }
        Self { entries: out }
    }

    pub fn get(&self, name: &str) -> Option<&NamedUri> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Pick `default` when present, else the first declared entry.
    ///
    /// `None` only for an empty catalog.
    pub fn select(&self, default: &str) -> Option<&NamedUri> {
        self.get(default).or_else(|| self.entries.first())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
