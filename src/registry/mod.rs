//! Registry module for Docker registry interactions
//!
//! This module provides credential resolution, the HTTP API v2 client and the
//! tag workflows built on it.

pub mod auth;
pub mod client;
pub mod operations;

pub use auth::{CredentialResolver, Credentials, LoginFileResolver, StaticCredentials};
pub use client::{RegistryClient, RegistryClientBuilder};
pub use operations::{copy_tag, find_equivalent_tags};
