// file: src/models/mod.rs
// description: data models module exports
// reference: internal module structure

pub mod post;
pub mod tables;

pub use post::{PostDate, PostRecord, SkipReason, SkippedPost};
pub use tables::{
    BasenameEntry, BasenameMapping, MappingSet, UrlReplacement, UrlReplacementTable,
};
