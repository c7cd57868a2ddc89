// file: src/parser/export.rs
// description: post header extraction from a Movable Type / Typepad export stream
// reference: Movable Type import/export format

use crate::config::MarkerConfig;
use crate::models::{PostDate, PostRecord, SkipReason, SkippedPost};
use crate::parser::patterns::URL_DATE_SEGMENT;
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use tracing::debug;

const DATE_TIME_FORMATS: &[&str] = &["%m/%d/%Y %I:%M:%S %p", "%m/%d/%Y %H:%M:%S", "%Y-%m-%d %H:%M:%S"];
const DATE_FORMATS: &[&str] = &["%m/%d/%Y", "%Y-%m-%d"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportEvent {
    Post(PostRecord),
    Skipped(SkippedPost),
}

#[derive(Debug, Default)]
struct PendingHeader {
    title: Option<String>,
    basename: Option<(String, usize)>,
    unique_url: Option<String>,
    date: Option<String>,
    first_line: usize,
}

/// Line-at-a-time state machine over an export.
///
/// A post header starts at its first title or basename marker and ends at the
/// next `-----` / `--------` separator, a second basename marker, or the end of
/// input. Title markers without a basename (comment and ping sections) are
/// not posts and produce no event.
pub struct ExportScanner<'a> {
    markers: &'a MarkerConfig,
    pending: Option<PendingHeader>,
}

impl<'a> ExportScanner<'a> {
    pub fn new(markers: &'a MarkerConfig) -> Self {
        Self {
            markers,
            pending: None,
        }
    }

    /// Scans a whole export and returns its events in stream order.
    pub fn scan(markers: &'a MarkerConfig, content: &str) -> Vec<ExportEvent> {
        let mut scanner = Self::new(markers);
        let mut events: Vec<ExportEvent> = content
            .lines()
            .enumerate()
            .filter_map(|(i, line)| scanner.feed(i + 1, line))
            .collect();
        events.extend(scanner.finish());
        events
    }

    pub fn feed(&mut self, line_no: usize, line: &str) -> Option<ExportEvent> {
        let line = line.trim_end_matches(['\r', '\n']);

        if is_separator(line) {
            return self.flush();
        }

        if let Some(value) = marker_value(line, &self.markers.protected) {
            if let Some(pending) = self.pending.as_mut()
                && pending.unique_url.is_none()
            {
                pending.unique_url = Some(value.to_string());
            }
            return None;
        }

        if let Some(value) = marker_value(line, &self.markers.title) {
            if let Some(pending) = self.pending.as_mut()
                && pending.title.is_none()
            {
                pending.title = Some(value.to_string());
                return None;
            }
            let closed = self.flush();
            self.pending = Some(PendingHeader {
                title: Some(value.to_string()),
                first_line: line_no,
                ..Default::default()
            });
            return closed;
        }

        if let Some(value) = marker_value(line, &self.markers.basename) {
            if value.is_empty() {
                return None;
            }
            let basename = (value.to_string(), line_no);
            if let Some(pending) = self.pending.as_mut()
                && pending.basename.is_none()
            {
                pending.basename = Some(basename);
                return None;
            }
            let closed = self.flush();
            self.pending = Some(PendingHeader {
                basename: Some(basename),
                first_line: line_no,
                ..Default::default()
            });
            return closed;
        }

        if let Some(value) = marker_value(line, &self.markers.date)
            && let Some(pending) = self.pending.as_mut()
            && pending.date.is_none()
        {
            pending.date = Some(value.to_string());
        }

        None
    }

    pub fn finish(&mut self) -> Option<ExportEvent> {
        self.flush()
    }

    fn flush(&mut self) -> Option<ExportEvent> {
        let pending = self.pending.take()?;

        let Some((old_basename, line)) = pending.basename else {
            if let Some(title) = pending.title {
                debug!(
                    "Ignoring title without basename at line {}: {}",
                    pending.first_line, title
                );
            }
            return None;
        };

        let Some(title) = pending.title else {
            return Some(ExportEvent::Skipped(SkippedPost {
                line,
                old_basename: Some(old_basename),
                title: None,
                reason: SkipReason::MissingTitle,
            }));
        };

        let date = match resolve_date(pending.unique_url.as_deref(), pending.date.as_deref()) {
            Ok(date) => date,
            Err(reason) => {
                return Some(ExportEvent::Skipped(SkippedPost {
                    line,
                    old_basename: Some(old_basename),
                    title: Some(title),
                    reason,
                }));
            }
        };

        Some(ExportEvent::Post(
            PostRecord::new(old_basename, title, date, line).with_unique_url(pending.unique_url),
        ))
    }
}

fn is_separator(line: &str) -> bool {
    matches!(line.trim(), "-----" | "--------")
}

fn marker_value<'l>(line: &'l str, prefix: &str) -> Option<&'l str> {
    line.strip_prefix(prefix).map(str::trim)
}

/// The post url's date segment wins over the header's date line.
fn resolve_date(
    unique_url: Option<&str>,
    date_line: Option<&str>,
) -> std::result::Result<PostDate, SkipReason> {
    if let Some(date) = unique_url.and_then(date_from_url) {
        return Ok(date);
    }

    match date_line {
        Some(value) => {
            parse_export_date(value).ok_or_else(|| SkipReason::MalformedDate(value.to_string()))
        }
        None => match unique_url {
            Some(url) => Err(SkipReason::MalformedDate(url.to_string())),
            None => Err(SkipReason::MissingDate),
        },
    }
}

pub fn date_from_url(url: &str) -> Option<PostDate> {
    let caps = URL_DATE_SEGMENT.captures(url)?;
    let year = caps[1].parse().ok()?;
    let month = caps[2].parse().ok()?;
    PostDate::new(year, month)
}

/// Parses the `DATE:` value of an export header, e.g. `04/12/2009 10:15:00 AM`.
pub fn parse_export_date(value: &str) -> Option<PostDate> {
    let value = value.trim();

    let date = DATE_TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .map(|dt| dt.date())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
        })?;

    PostDate::new(u16::try_from(date.year()).ok()?, date.month() as u8)
}
