use async_trait::async_trait;
use bytes::Bytes;
use tandem_doh_domain::RelayError;

/// Raw outcome of one outbound HTTP exchange.
///
/// Non-success statuses are data, not errors: the relay forwards upstream
/// semantics verbatim, so only transport-level failures surface as
/// `RelayError`.
#[derive(Debug, Clone)]
pub struct WireResponse {
    pub status: u16,
    pub body: Bytes,
}

#[async_trait]
pub trait DohTransport: Send + Sync {
    /// GET `url` with `Accept: application/dns-message`.
    async fn get(&self, url: &str) -> Result<WireResponse, RelayError>;

    /// POST a binary DNS message to `url` with
    /// `Content-Type: application/dns-message`.
    async fn post(&self, url: &str, body: Bytes) -> Result<WireResponse, RelayError>;
}
