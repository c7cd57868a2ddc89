// file: src/mapping/mod.rs
// description: basename and url mapping module exports
// reference: internal module structure

pub mod builder;

pub use builder::{MappingBuilder, new_post_url, old_post_url};
