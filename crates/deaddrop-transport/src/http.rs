//! HTTP(S) drop endpoint adapter.
//!
//! Speaks the minimal drop protocol: `POST` deposits a raw envelope blob,
//! `GET` returns the endpoint's current contents as a length-prefixed
//! batch. Endpoints are plain blob stores with no authentication and no
//! sessions to speak of.
//!
//! ## Batch Format
//!
//! A pull response body is a concatenation of frames:
//!
//! ```text
//! +-----------------+-----------------+ ...
//! | len: u32 BE     | blob: len bytes | ...
//! +-----------------+-----------------+ ...
//! ```
//!
//! An empty endpoint answers `204 No Content`.

use reqwest::StatusCode;
use tracing::debug;

use deaddrop_identity::DropEndpoint;

use crate::error::TransportError;
use crate::transport::{DropTransport, SendStatus, TransportConfig};
use crate::Result;

use async_trait::async_trait;

/// Upper bound on a single framed blob in a pulled batch.
///
/// Checked before allocating, so a hostile endpoint cannot force large
/// allocations with a fabricated length field.
const MAX_FRAME_BYTES: usize = 64 * 1024;

/// Production HTTP(S) transport for drop endpoints.
#[derive(Clone)]
pub struct HttpDropTransport {
    client: reqwest::Client,
}

impl HttpDropTransport {
    /// Build a transport with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Http`] if the underlying client cannot be
    /// constructed.
    pub fn new(config: TransportConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| TransportError::Http(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl DropTransport for HttpDropTransport {
    async fn send_blob(&self, endpoint: &DropEndpoint, blob: &[u8]) -> Result<SendStatus> {
        let resp = self
            .client
            .post(endpoint.as_str())
            .body(blob.to_vec())
            .send()
            .await
            .map_err(|e| TransportError::Http(e.to_string()))?;

        let status = SendStatus::new(resp.status().as_u16());
        debug!(endpoint = %endpoint, code = status.code(), "deposited blob");
        Ok(status)
    }

    async fn pull_batch(&self, endpoint: &DropEndpoint) -> Result<Vec<Vec<u8>>> {
        let resp = self
            .client
            .get(endpoint.as_str())
            .send()
            .await
            .map_err(|e| TransportError::Http(e.to_string()))?;

        match resp.status() {
            StatusCode::OK => {
                let body = resp
                    .bytes()
                    .await
                    .map_err(|e| TransportError::Http(e.to_string()))?;
                let batch = split_frames(&body)?;
                debug!(endpoint = %endpoint, blobs = batch.len(), "pulled batch");
                Ok(batch)
            }
            StatusCode::NO_CONTENT => Ok(Vec::new()),
            other => Err(TransportError::UnexpectedStatus {
                code: other.as_u16(),
            }),
        }
    }
}

/// Split a batch body into its length-prefixed blobs.
fn split_frames(body: &[u8]) -> Result<Vec<Vec<u8>>> {
    let mut blobs = Vec::new();
    let mut rest = body;
    while !rest.is_empty() {
        if rest.len() < 4 {
            return Err(TransportError::MalformedBatch(format!(
                "truncated frame header: {} trailing bytes",
                rest.len()
            )));
        }
        let len = u32::from_be_bytes([rest[0], rest[1], rest[2], rest[3]]) as usize;
        if len > MAX_FRAME_BYTES {
            return Err(TransportError::MalformedBatch(format!(
                "frame of {} bytes exceeds maximum {}",
                len, MAX_FRAME_BYTES
            )));
        }
        rest = &rest[4..];
        if rest.len() < len {
            return Err(TransportError::MalformedBatch(format!(
                "frame declares {} bytes, {} remain",
                len,
                rest.len()
            )));
        }
        blobs.push(rest[..len].to_vec());
        rest = &rest[len..];
    }
    Ok(blobs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(blob: &[u8]) -> Vec<u8> {
        let mut out = (blob.len() as u32).to_be_bytes().to_vec();
        out.extend_from_slice(blob);
        out
    }

    #[test]
    fn test_transport_builds_with_default_config() {
        assert!(HttpDropTransport::new(TransportConfig::default()).is_ok());
    }

    #[test]
    fn test_split_frames_empty_body() {
        assert!(split_frames(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_split_frames_roundtrip() {
        let mut body = frame(b"first");
        body.extend(frame(b""));
        body.extend(frame(b"third blob"));

        let blobs = split_frames(&body).unwrap();

        assert_eq!(blobs.len(), 3);
        assert_eq!(blobs[0], b"first");
        assert!(blobs[1].is_empty());
        assert_eq!(blobs[2], b"third blob");
    }

    #[test]
    fn test_split_frames_truncated_header() {
        let result = split_frames(&[0, 0, 1]);
        assert!(matches!(result, Err(TransportError::MalformedBatch(_))));
    }

    #[test]
    fn test_split_frames_truncated_body() {
        let mut body = (10u32).to_be_bytes().to_vec();
        body.extend_from_slice(b"short");

        let result = split_frames(&body);
        assert!(matches!(result, Err(TransportError::MalformedBatch(_))));
    }

    #[test]
    fn test_split_frames_rejects_huge_frame() {
        let body = ((MAX_FRAME_BYTES + 1) as u32).to_be_bytes().to_vec();

        let result = split_frames(&body);
        assert!(matches!(result, Err(TransportError::MalformedBatch(_))));
    }
}
