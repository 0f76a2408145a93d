//! Outbound HTTP transport — DNS-over-HTTPS (RFC 8484)
//!
//! GET carries the query as a `dns` URL parameter, POST carries the raw DNS
//! wire format message as the body. Either way the response body is relayed
//! untouched, and non-success statuses are returned as data so the relay can
//! forward upstream semantics verbatim.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use tandem_doh_domain::RelayError;
use tandem_doh_application::{DohTransport, WireResponse};
use tracing::debug;

/// Content type for DNS-over-HTTPS messages (RFC 8484 §6)
pub const DNS_MESSAGE_CONTENT_TYPE: &str = "application/dns-message";

/// `reqwest`-backed DoH transport with rustls TLS and connection pooling.
///
/// One instance is built at startup and shared by every request task; the
/// configured timeout bounds each complete outbound exchange.
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .timeout(timeout)
            .pool_max_idle_per_host(4)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { client }
    }
}

#[async_trait]
impl DohTransport for ReqwestTransport {
    async fn get(&self, url: &str) -> Result<WireResponse, RelayError> {
        let response = self
            .client
            .get(url)
            .header(ACCEPT, DNS_MESSAGE_CONTENT_TYPE)
            .send()
            .await
            .map_err(|e| RelayError::transport(url, e))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| RelayError::transport(url, e))?;

        debug!(status, response_len = body.len(), "DoH GET completed");
        Ok(WireResponse { status, body })
    }

    async fn post(&self, url: &str, body: Bytes) -> Result<WireResponse, RelayError> {
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, DNS_MESSAGE_CONTENT_TYPE)
            .header(ACCEPT, DNS_MESSAGE_CONTENT_TYPE)
            .body(body)
            .send()
            .await
            .map_err(|e| RelayError::transport(url, e))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| RelayError::transport(url, e))?;

        debug!(status, response_len = body.len(), "DoH POST completed");
        Ok(WireResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_creation() {
        // Builder must not panic with the default feature set.
        let _transport = ReqwestTransport::new(Duration::from_secs(10));
    }
}
