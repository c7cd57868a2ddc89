// file: src/exporter/json.rs
// description: json run report with every mapping, skipped post and unresolved link

use crate::error::Result;
use crate::models::{MappingSet, SkippedPost};
use crate::pipeline::audit::UnresolvedLink;
use crate::pipeline::rewriter::RewriteStats;
use chrono::Utc;
use serde::Serialize;
use sha2::{Digest, Sha256};

#[derive(Debug, Clone, Serialize)]
pub struct ReportMapping {
    pub title: String,
    pub old_basename: String,
    pub new_basename: String,
    pub old_url: String,
    pub new_url: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ReportStats {
    pub posts_mapped: usize,
    pub posts_skipped: usize,
    pub duplicate_markers: usize,
    pub root_mismatches: usize,
    #[serde(flatten)]
    pub rewrite: Option<RewriteStats>,
    pub unresolved_links: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct MigrationReport {
    pub generated_at: String,
    pub input: String,
    pub input_sha256: String,
    pub old_domain: String,
    pub new_domain: String,
    pub stats: ReportStats,
    pub mappings: Vec<ReportMapping>,
    pub skipped: Vec<SkippedPost>,
    pub unresolved: Vec<UnresolvedLink>,
}

impl MigrationReport {
    pub fn new(
        input: &str,
        content: &str,
        old_domain: &str,
        new_domain: &str,
        mappings: &MappingSet,
    ) -> Self {
        let rows = mappings
            .basenames
            .entries()
            .iter()
            .zip(mappings.urls.entries())
            .map(|(basename, url)| ReportMapping {
                title: basename.title.clone(),
                old_basename: basename.old_basename.clone(),
                new_basename: basename.new_basename.clone(),
                old_url: url.old_url.clone(),
                new_url: url.new_url.clone(),
            })
            .collect();

        Self {
            generated_at: Utc::now().to_rfc3339(),
            input: input.to_string(),
            input_sha256: compute_hash(content),
            old_domain: old_domain.to_string(),
            new_domain: new_domain.to_string(),
            stats: ReportStats {
                posts_mapped: mappings.basenames.len(),
                posts_skipped: mappings.skipped.len(),
                duplicate_markers: mappings.duplicates,
                root_mismatches: mappings.root_mismatches,
                rewrite: None,
                unresolved_links: 0,
            },
            mappings: rows,
            skipped: mappings.skipped.clone(),
            unresolved: Vec::new(),
        }
    }

    pub fn with_rewrite(mut self, rewrite: RewriteStats, unresolved: Vec<UnresolvedLink>) -> Self {
        self.stats.rewrite = Some(rewrite);
        self.stats.unresolved_links = unresolved.len();
        self.unresolved = unresolved;
        self
    }
}

pub fn compute_hash(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}

pub struct JsonReporter {
    pretty: bool,
}

impl JsonReporter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    pub fn render(&self, report: &MigrationReport) -> Result<String> {
        let mut json = if self.pretty {
            serde_json::to_string_pretty(report)?
        } else {
            serde_json::to_string(report)?
        };
        json.push('\n');
        Ok(json)
    }
}
