// file: src/exporter/table.rs
// description: comma delimited mapping tables, one row per mapped post
// reference: basename_mappings.txt / url_replacements.txt layout

use crate::models::{BasenameMapping, UrlReplacementTable};

/// Rows of fields joined by a delimiter. A delimiter inside a field is
/// written as `\<delimiter>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelimitedTable {
    delimiter: char,
    rows: Vec<Vec<String>>,
}

impl DelimitedTable {
    pub fn new(delimiter: char) -> Self {
        Self {
            delimiter,
            rows: Vec::new(),
        }
    }

    pub fn basenames(mapping: &BasenameMapping) -> Self {
        let mut table = Self::new(',');
        for entry in mapping.entries() {
            table.push_row([entry.old_basename.as_str(), entry.new_basename.as_str()]);
        }
        table
    }

    pub fn url_replacements(urls: &UrlReplacementTable) -> Self {
        let mut table = Self::new(',');
        for replacement in urls.entries() {
            table.push_row([replacement.old_url.as_str(), replacement.new_url.as_str()]);
        }
        table
    }

    pub fn push_row<'f>(&mut self, fields: impl IntoIterator<Item = &'f str>) {
        self.rows
            .push(fields.into_iter().map(str::to_string).collect());
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn render(&self) -> String {
        let separator = self.delimiter.to_string();
        let escaped = format!("\\{}", self.delimiter);

        let mut output = String::new();
        for row in &self.rows {
            let fields: Vec<String> = row
                .iter()
                .map(|field| field.replace(self.delimiter, &escaped))
                .collect();
            output.push_str(&fields.join(&separator));
            output.push('\n');
        }
        output
    }
}
