//! Content digest helpers
//!
//! Digests are `algorithm:hex` strings. The tool only compares config
//! digests for equality; these helpers exist for reporting what was pushed.

use sha2::Digest;

const SHORT_DIGEST_CHARS: usize = 19;

/// Utilities for working with registry content digests
pub struct DigestUtils;

impl DigestUtils {
    /// Compute SHA256 hex digest from byte data
    pub fn compute_sha256(data: &[u8]) -> String {
        let mut hasher = sha2::Sha256::new();
        hasher.update(data);
        hex::encode(hasher.finalize())
    }

    /// Compute full registry digest (with sha256: prefix) from byte data
    pub fn compute_docker_digest(data: &[u8]) -> String {
        format!("sha256:{}", Self::compute_sha256(data))
    }

    /// `algorithm:hex` with a lowercase alphanumeric algorithm and a
    /// non-empty lowercase hex part.
    pub fn is_well_formed(digest: &str) -> bool {
        match digest.split_once(':') {
            Some((algorithm, encoded)) => {
                !algorithm.is_empty()
                    && algorithm
                        .chars()
                        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || "+._-".contains(c))
                    && !encoded.is_empty()
                    && encoded.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
            }
            None => false,
        }
    }

    /// Format digest for display (truncated to 19 characters for readability)
    pub fn format_digest_short(digest: &str) -> String {
        if digest.chars().count() > SHORT_DIGEST_CHARS {
            let prefix: String = digest.chars().take(SHORT_DIGEST_CHARS).collect();
            format!("{}...", prefix)
        } else {
            digest.to_string()
        }
    }
}
