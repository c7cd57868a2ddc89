// file: src/parser/mod.rs
// description: export parsing module exports
// reference: internal module structure

pub mod export;
pub mod normalizer;
pub mod patterns;

pub use export::{ExportEvent, ExportScanner};
pub use normalizer::{BasenameNormalizer, is_valid_basename};
