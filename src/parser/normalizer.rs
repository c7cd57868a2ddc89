// file: src/parser/normalizer.rs
// description: title to basename normalization for the new url scheme
// reference: WordPress post slug conventions

use crate::parser::patterns::{HYPHEN_RUN, WHITESPACE_RUN};

/// Derives a candidate basename from a post title.
///
/// Lowercases, drops everything but alphanumerics, whitespace and hyphens
/// (uppercase letters without a lowercase form are dropped too),
/// turns whitespace runs into a hyphen and collapses repeated hyphens. The
/// result is never truncated. Titles without alphanumeric content yield an
/// empty string.
pub struct BasenameNormalizer;

impl BasenameNormalizer {
    pub fn new() -> Self {
        Self
    }

    pub fn normalize(&self, title: &str) -> String {
        let kept: String = title
            .to_lowercase()
            .chars()
            .filter(|&c| {
                (c.is_alphanumeric() && !c.is_uppercase()) || c.is_whitespace() || c == '-'
            })
            .collect();

        let hyphenated = WHITESPACE_RUN.replace_all(kept.trim(), "-");
        let collapsed = HYPHEN_RUN.replace_all(&hyphenated, "-");

        collapsed.trim_matches('-').to_string()
    }

    /// Candidate for a post whose title normalizes to nothing: the old
    /// basename with underscores read as word breaks.
    pub fn normalize_old_basename(&self, old_basename: &str) -> String {
        self.normalize(&old_basename.replace('_', " "))
    }
}

impl Default for BasenameNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

pub fn is_valid_basename(candidate: &str) -> bool {
    !candidate.is_empty()
        && !candidate.starts_with('-')
        && !candidate.ends_with('-')
        && !candidate.contains("--")
        && candidate
            .chars()
            .all(|c| c == '-' || (c.is_alphanumeric() && !c.is_uppercase()))
}
