// file: src/pipeline/rewriter.rs
// description: second pass that applies the url replacement table to the export
// reference: host-anchored url replacement over a line stream

use crate::config::Config;
use crate::error::{MigrationError, Result};
use crate::models::MappingSet;
use crate::parser::patterns::old_host_prefix;
use crate::pipeline::progress::ProgressTracker;
use regex::Regex;
use serde::Serialize;
use std::borrow::Cow;
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Original-url marker, copied verbatim.
    Protected,
    Basename,
    Content,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewrittenLine<'l> {
    pub text: Cow<'l, str>,
    pub kind: LineKind,
    pub replacements: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RewriteStats {
    pub lines: usize,
    pub protected_lines: usize,
    pub basename_lines: usize,
    pub rewritten_lines: usize,
    pub replacements: usize,
}

pub struct Rewriter<'a> {
    config: &'a Config,
    mappings: &'a MappingSet,
    host: Regex,
    /// Old url path after the host, paired with the new url. Longest path first.
    keys: Vec<(&'a str, &'a str)>,
}

impl<'a> Rewriter<'a> {
    pub fn new(config: &'a Config, mappings: &'a MappingSet) -> Result<Self> {
        let host = old_host_prefix(&config.migration.old_domain)
            .map_err(|e| MigrationError::Config(format!("invalid old domain pattern: {}", e)))?;

        let mut keys: Vec<(&str, &str)> = mappings
            .urls
            .entries()
            .iter()
            .filter_map(|r| r.old_path().map(|path| (path, r.new_url.as_str())))
            .collect();
        keys.sort_by_key(|(path, _)| std::cmp::Reverse(path.len()));

        Ok(Self {
            config,
            mappings,
            host,
            keys,
        })
    }

    /// Rewrites a single line. Any trailing line ending is preserved.
    pub fn rewrite_line<'l>(&self, line: &'l str) -> RewrittenLine<'l> {
        let markers = &self.config.markers;

        if line.starts_with(markers.protected.as_str()) {
            return RewrittenLine {
                text: Cow::Borrowed(line),
                kind: LineKind::Protected,
                replacements: 0,
            };
        }

        if self.config.migration.rewrite_basename_lines
            && let Some(value) = line.strip_prefix(markers.basename.as_str())
        {
            let text = match self.mappings.basenames.get(value.trim()) {
                Some(new_basename) => Cow::Owned(format!(
                    "{} {}{}",
                    markers.basename,
                    new_basename,
                    line_ending(line)
                )),
                None => Cow::Borrowed(line),
            };
            return RewrittenLine {
                text,
                kind: LineKind::Basename,
                replacements: 0,
            };
        }

        let (text, replacements) = self.replace_urls(line);
        RewrittenLine {
            text,
            kind: LineKind::Content,
            replacements,
        }
    }

    /// Rewrites a whole buffered export into `out`, line by line.
    pub fn rewrite_document<W: Write>(
        &self,
        content: &str,
        out: &mut W,
        progress: Option<&ProgressTracker>,
    ) -> Result<RewriteStats> {
        let mut stats = RewriteStats::default();

        for line in content.split_inclusive('\n') {
            let rewritten = self.rewrite_line(line);
            out.write_all(rewritten.text.as_bytes())?;

            stats.lines += 1;
            match rewritten.kind {
                LineKind::Protected => stats.protected_lines += 1,
                LineKind::Basename => {
                    if matches!(rewritten.text, Cow::Owned(_)) {
                        stats.basename_lines += 1;
                    }
                }
                LineKind::Content => {
                    if rewritten.replacements > 0 {
                        stats.rewritten_lines += 1;
                        stats.replacements += rewritten.replacements;
                    }
                }
            }

            if let Some(progress) = progress {
                progress.inc_line(rewritten.replacements);
            }
        }

        out.flush()?;
        Ok(stats)
    }

    /// Replaces every `http(s)://<old-domain>/<path>` whose path is a key. Scheme
    /// and host match in any case; the path must match exactly.
    fn replace_urls<'l>(&self, line: &'l str) -> (Cow<'l, str>, usize) {
        let mut text = String::new();
        let mut copied = 0;
        let mut replacements = 0;

        for host in self.host.find_iter(line) {
            if host.start() < copied {
                continue;
            }
            let rest = &line[host.end()..];
            if let Some((path, new_url)) = self.keys.iter().find(|(path, _)| rest.starts_with(*path)) {
                text.push_str(&line[copied..host.start()]);
                text.push_str(new_url);
                copied = host.end() + path.len();
                replacements += 1;
            }
        }

        if replacements == 0 {
            return (Cow::Borrowed(line), 0);
        }
        text.push_str(&line[copied..]);
        (Cow::Owned(text), replacements)
    }
}

fn line_ending(line: &str) -> &'static str {
    if line.ends_with("\r\n") {
        "\r\n"
    } else if line.ends_with('\n') {
        "\n"
    } else {
        ""
    }
}
