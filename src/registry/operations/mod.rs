//! Tag-level workflows built on top of [`RegistryClient`](crate::registry::RegistryClient)
//!
//! - [`find_equivalent_tags`]: tags sharing the base tag's config digest
//! - [`copy_tag`]: re-PUT the base manifest under a new tag

pub mod tag_operations;

pub use tag_operations::{copy_tag, find_equivalent_tags};
