// file: src/models/post.rs
// description: Post record and date segment extracted from an export header
// reference: Movable Type import/export format

use serde::{Deserialize, Serialize};
use std::fmt;

/// Year and month of a post, the date segment of both URL schemes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PostDate {
    year: u16,
    month: u8,
}

impl PostDate {
    pub fn new(year: u16, month: u8) -> Option<Self> {
        if !(1000..=9999).contains(&year) || !(1..=12).contains(&month) {
            return None;
        }
        Some(Self { year, month })
    }

    pub fn year(&self) -> u16 {
        self.year
    }

    pub fn month(&self) -> u8 {
        self.month
    }
}

impl fmt::Display for PostDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}/{:02}", self.year, self.month)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostRecord {
    pub old_basename: String,
    pub title: String,
    pub date: PostDate,
    /// 1-based line number of the basename marker.
    pub line: usize,
    /// Value of the header's original-url marker, when present.
    pub unique_url: Option<String>,
}

impl PostRecord {
    pub fn new(old_basename: String, title: String, date: PostDate, line: usize) -> Self {
        Self {
            old_basename,
            title,
            date,
            line,
            unique_url: None,
        }
    }

    pub fn with_unique_url(mut self, unique_url: Option<String>) -> Self {
        self.unique_url = unique_url;
        self
    }

    /// Scheme of the post's old url: `https` when its own url says so, else `http`.
    pub fn old_scheme(&self) -> &'static str {
        match &self.unique_url {
            Some(url) if url.get(..8).is_some_and(|s| s.eq_ignore_ascii_case("https://")) => {
                "https"
            }
            _ => "http",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum SkipReason {
    MissingTitle,
    MissingDate,
    MalformedDate(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MissingTitle => write!(f, "basename marker without a title"),
            SkipReason::MissingDate => write!(f, "no date segment in post header"),
            SkipReason::MalformedDate(value) => write!(f, "unparsable date '{}'", value),
        }
    }
}

/// A post header that could not be turned into a mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedPost {
    pub line: usize,
    pub old_basename: Option<String>,
    pub title: Option<String>,
    pub reason: SkipReason,
}
