//! Image reference and manifest model
//!
//! - [`reference`]: `[scheme://]registry/repo:tag` parsing and registry URLs
//! - [`manifest`]: typed tag-list and v2 manifest documents

pub mod manifest;
pub mod reference;

pub use manifest::{Descriptor, ImageManifest, MANIFEST_V2_MEDIA_TYPE, TagList};
pub use reference::ImageReference;
