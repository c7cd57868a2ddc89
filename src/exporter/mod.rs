// file: src/exporter/mod.rs
// description: output writers for mapping tables, reports and staged files
// reference: internal module structure

pub mod json;
pub mod staging;
pub mod table;

pub use json::{JsonReporter, MigrationReport, ReportMapping, ReportStats};
pub use staging::StagedFile;
pub use table::DelimitedTable;
