//! Drop endpoint URLs.

use serde::{Deserialize, Serialize};

use crate::error::IdentityError;
use crate::Result;

/// An HTTP(S) blob-storage location where envelopes addressed to an
/// identity are deposited by senders and later pulled by the owner.
///
/// Endpoints are dumb: they store and return opaque blobs and enforce
/// nothing about authenticity. The URL is normalized (no trailing slash)
/// so that equal locations compare equal and can key outcome maps.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DropEndpoint(String);

impl DropEndpoint {
    /// Parse and normalize a drop endpoint URL.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::InvalidEndpoint`] if the URL does not use
    /// the `http` or `https` scheme or has no host part.
    pub fn parse(url: impl Into<String>) -> Result<Self> {
        let url = url.into();
        let rest = url
            .strip_prefix("https://")
            .or_else(|| url.strip_prefix("http://"))
            .ok_or_else(|| {
                IdentityError::InvalidEndpoint(format!("unsupported scheme in {:?}", url))
            })?;
        if rest.is_empty() || rest.starts_with('/') {
            return Err(IdentityError::InvalidEndpoint(format!(
                "missing host in {:?}",
                url
            )));
        }
        Ok(Self(url.trim_end_matches('/').to_string()))
    }

    /// The normalized URL string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for DropEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DropEndpoint({})", self.0)
    }
}

impl std::fmt::Display for DropEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
