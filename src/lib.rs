//! regtag library
//!
//! Lists the tags of a registry repository that point at the same image as a
//! given tag, and adds tags by re-uploading an existing manifest.

pub mod cli;
pub mod digest;
pub mod error;
pub mod image;
pub mod logging;
pub mod output;
pub mod registry;

pub use error::{RegistryError, Result};
pub use image::ImageReference;
pub use logging::Logger;
pub use registry::{Credentials, RegistryClient};
