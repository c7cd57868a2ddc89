// file: src/pipeline/mod.rs
// description: pipeline module exports and public api
// reference: pipeline orchestration

pub mod audit;
pub mod orchestrator;
pub mod progress;
pub mod rewriter;

pub use audit::{LinkAuditor, UnresolvedLink};
pub use orchestrator::{MigrationOutcome, MigrationPipeline, PlanOutcome};
pub use progress::ProgressTracker;
pub use rewriter::{LineKind, RewriteStats, RewrittenLine, Rewriter};
