//! Image reference parsing
//!
//! Turns the `[scheme://]registry/repo:tag` shorthand accepted on the command
//! line into the pieces needed to address the registry API v2.

use crate::error::{RegistryError, Result};
use std::fmt;
use url::Url;

pub const DEFAULT_SCHEME: &str = "https";
pub const DEFAULT_TAG: &str = "latest";

const MAX_TAG_LEN: usize = 128;

/// A parsed `registry/repository:tag` reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageReference {
    /// `http` or `https`
    pub scheme: String,
    /// `host[:port]`
    pub registry: String,
    /// Repository path, always with a leading slash (`/ns/image`)
    pub repository: String,
    pub tag: String,
}

impl ImageReference {
    pub fn parse(input: &str) -> Result<Self> {
        let with_scheme = if input.contains("://") {
            input.to_string()
        } else {
            format!("{}://{}", DEFAULT_SCHEME, input)
        };

        let url = Url::parse(&with_scheme)?;

        let scheme = url.scheme();
        if scheme != "http" && scheme != "https" {
            return Err(RegistryError::Parse(format!(
                "unsupported scheme {} in {}",
                scheme, with_scheme
            )));
        }

        let host = match url.host_str() {
            Some(host) if !host.is_empty() => host,
            _ => {
                return Err(RegistryError::Parse(format!(
                    "registry url not found in {}",
                    with_scheme
                )));
            }
        };
        let registry = match url.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        };

        let segments: Vec<&str> = url.path().split(':').collect();
        let (repository, tag) = match segments.as_slice() {
            [repository] => (*repository, DEFAULT_TAG),
            [repository, tag] => (*repository, *tag),
            _ => {
                return Err(RegistryError::Parse(format!(
                    "more than one tag separator in {}",
                    with_scheme
                )));
            }
        };

        if repository.trim_start_matches('/').is_empty() {
            return Err(RegistryError::Parse(format!(
                "repository not found in {}",
                with_scheme
            )));
        }

        Self::validate_tag(tag)?;

        Ok(Self {
            scheme: scheme.to_string(),
            registry,
            repository: repository.to_string(),
            tag: tag.to_string(),
        })
    }

    /// Tags are `[A-Za-z0-9_][A-Za-z0-9._-]{0,127}`.
    pub fn validate_tag(tag: &str) -> Result<()> {
        if tag.is_empty() {
            return Err(RegistryError::Parse("tag cannot be empty".to_string()));
        }
        if tag.len() > MAX_TAG_LEN {
            return Err(RegistryError::Parse(format!(
                "tag {} exceeds {} characters",
                tag, MAX_TAG_LEN
            )));
        }

        let mut chars = tag.chars();
        let first_ok = chars
            .next()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_');
        let rest_ok = chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'));

        if first_ok && rest_ok {
            Ok(())
        } else {
            Err(RegistryError::Parse(format!("invalid tag {}", tag)))
        }
    }

    /// `{scheme}://{registry}`
    pub fn registry_url(&self) -> String {
        format!("{}://{}", self.scheme, self.registry)
    }

    /// Base URL for manifest operations, without a trailing tag
    pub fn manifests_url(&self) -> String {
        format!("{}/v2{}/manifests", self.registry_url(), self.repository)
    }

    pub fn manifest_url(&self, tag: &str) -> String {
        format!("{}/{}", self.manifests_url(), tag)
    }

    pub fn tags_url(&self) -> String {
        format!("{}/v2{}/tags/list", self.registry_url(), self.repository)
    }
}

impl fmt::Display for ImageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}:{}", self.registry, self.repository, self.tag)
    }
}
