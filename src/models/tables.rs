// file: src/models/tables.rs
// description: ordered basename and url replacement tables produced by the first pass
// reference: internal data structures

use crate::models::post::SkippedPost;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BasenameEntry {
    pub old_basename: String,
    pub new_basename: String,
    pub title: String,
}

/// Old basename to new basename, in first-seen order.
///
/// Keys are unique (the first insert wins) and values are unique, so the
/// mapping is injective.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BasenameMapping {
    entries: Vec<BasenameEntry>,
    index: HashMap<String, usize>,
    assigned: HashSet<String>,
}

impl BasenameMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false and leaves the mapping untouched when `old_basename` is
    /// already mapped or `new_basename` is already assigned.
    pub fn insert(&mut self, old_basename: &str, new_basename: &str, title: &str) -> bool {
        if self.index.contains_key(old_basename) || self.assigned.contains(new_basename) {
            return false;
        }

        self.index
            .insert(old_basename.to_string(), self.entries.len());
        self.assigned.insert(new_basename.to_string());
        self.entries.push(BasenameEntry {
            old_basename: old_basename.to_string(),
            new_basename: new_basename.to_string(),
            title: title.to_string(),
        });
        true
    }

    pub fn get(&self, old_basename: &str) -> Option<&str> {
        self.index
            .get(old_basename)
            .map(|&i| self.entries[i].new_basename.as_str())
    }

    pub fn contains_old(&self, old_basename: &str) -> bool {
        self.index.contains_key(old_basename)
    }

    pub fn is_assigned(&self, new_basename: &str) -> bool {
        self.assigned.contains(new_basename)
    }

    pub fn entries(&self) -> &[BasenameEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UrlReplacement {
    pub old_url: String,
    pub new_url: String,
}

impl UrlReplacement {
    /// The old url after `scheme://host/`, e.g. `2009/04/a.html`.
    pub fn old_path(&self) -> Option<&str> {
        let (_, rest) = self.old_url.split_once("://")?;
        rest.split_once('/').map(|(_, path)| path)
    }
}

/// Old url to new url, one row per mapped basename, same order as the
/// basename mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlReplacementTable {
    entries: Vec<UrlReplacement>,
    index: HashMap<String, usize>,
}

impl UrlReplacementTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, old_url: String, new_url: String) -> bool {
        if self.index.contains_key(&old_url) {
            return false;
        }

        self.index.insert(old_url.clone(), self.entries.len());
        self.entries.push(UrlReplacement { old_url, new_url });
        true
    }

    pub fn entries(&self) -> &[UrlReplacement] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Everything the first pass learns about the export.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingSet {
    pub basenames: BasenameMapping,
    pub urls: UrlReplacementTable,
    pub skipped: Vec<SkippedPost>,
    pub duplicates: usize,
    /// Mapped posts whose own url is not under the configured old url root.
    pub root_mismatches: usize,
}

impl MappingSet {
    pub fn posts_seen(&self) -> usize {
        self.basenames.len() + self.skipped.len() + self.duplicates
    }
}
