// file: src/lib.rs
// description: library entry point and public api exports
// reference: rust library patterns
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/readme.md"))]

pub mod config;
pub mod error;
pub mod exporter;
pub mod mapping;
pub mod models;
pub mod parser;
pub mod pipeline;
pub mod utils;

pub use config::{Config, MarkerConfig, MigrationConfig, OutputConfig};
pub use error::{MigrationError, Result};
pub use exporter::{DelimitedTable, JsonReporter, MigrationReport, StagedFile};
pub use mapping::MappingBuilder;
pub use models::{
    BasenameMapping, MappingSet, PostDate, PostRecord, SkipReason, SkippedPost,
    UrlReplacement, UrlReplacementTable,
};
pub use parser::{BasenameNormalizer, ExportEvent, ExportScanner, is_valid_basename};
pub use pipeline::{
    LinkAuditor, MigrationOutcome, MigrationPipeline, PlanOutcome, ProgressTracker,
    RewriteStats, Rewriter, UnresolvedLink,
};
pub use utils::{OperationTimer, Validator};
