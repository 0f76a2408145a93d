use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use tandem_doh_domain::RelayError;
use tracing::{debug, warn};

use crate::ports::DohTransport;
use crate::use_cases::forward_query::ForwardOutcome;

/// Inbound payload at the edge.
///
/// Unlike the worker, the edge does not single out the `dns` parameter: the
/// whole query string travels to the worker untouched, so anything else the
/// client appended survives the hop.
#[derive(Debug, Clone)]
pub enum RelayPayload {
    /// Full raw query string of the inbound GET request.
    Get { raw_query: String },
    /// Raw binary DNS message from a POST body.
    Post { body: Bytes },
}

/// Edge query path: same forwarding contract as the worker, with the
/// destination fixed to the configured worker relay.
pub struct RelayQueryUseCase {
    transport: Arc<dyn DohTransport>,
    worker_query_url: String,
    log_queries: bool,
}

impl RelayQueryUseCase {
    pub fn new(
        transport: Arc<dyn DohTransport>,
        worker_query_url: String,
        log_queries: bool,
    ) -> Self {
        Self {
            transport,
            worker_query_url,
            log_queries,
        }
    }

    pub async fn execute(&self, payload: RelayPayload) -> Result<ForwardOutcome, RelayError> {
        let start = Instant::now();

        let response = match payload {
            RelayPayload::Get { raw_query } => {
                let url = format!("{}?{}", self.worker_query_url, raw_query);
                self.transport.get(&url).await
            }
            RelayPayload::Post { body } => self.transport.post(&self.worker_query_url, body).await,
        };

        let elapsed_ms = start.elapsed().as_millis() as u64;
        match response {
            Ok(wire) => {
                if self.log_queries {
                    debug!(status = wire.status, elapsed_ms, "relayed DoH query to worker");
                }
                Ok(ForwardOutcome {
                    status: wire.status,
                    body: wire.body,
                    upstream_url: self.worker_query_url.clone(),
                    elapsed_ms,
                })
            }
            Err(e) => {
                warn!(worker = %self.worker_query_url, error = %e, "worker DoH call failed");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::WireResponse;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct RecordingTransport {
        last_url: Mutex<Option<String>>,
        last_body: Mutex<Option<Bytes>>,
    }

    #[async_trait]
    impl DohTransport for RecordingTransport {
        async fn get(&self, url: &str) -> Result<WireResponse, RelayError> {
            *self.last_url.lock().unwrap() = Some(url.to_string());
            Ok(WireResponse {
                status: 503,
                body: Bytes::from_static(b"worker says no"),
            })
        }

        async fn post(&self, url: &str, body: Bytes) -> Result<WireResponse, RelayError> {
            *self.last_url.lock().unwrap() = Some(url.to_string());
            *self.last_body.lock().unwrap() = Some(body);
            Ok(WireResponse {
                status: 200,
                body: Bytes::from_static(b"\x00\x00\x81\x80"),
            })
        }
    }

    fn recording() -> Arc<RecordingTransport> {
        Arc::new(RecordingTransport {
            last_url: Mutex::new(None),
            last_body: Mutex::new(None),
        })
    }

    #[tokio::test]
    async fn test_get_relays_whole_query_string() {
        let transport = recording();
        let use_case = RelayQueryUseCase::new(
            transport.clone(),
            "https://worker.example.net/dns-query".to_string(),
            false,
        );

        let outcome = use_case
            .execute(RelayPayload::Get {
                raw_query: "dns=AAAA&ct=application%2Fdns-message".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(
            transport.last_url.lock().unwrap().as_deref(),
            Some("https://worker.example.net/dns-query?dns=AAAA&ct=application%2Fdns-message")
        );
        // Non-success worker statuses are relayed, not treated as errors.
        assert_eq!(outcome.status, 503);
        assert_eq!(outcome.body, Bytes::from_static(b"worker says no"));
    }

    #[tokio::test]
    async fn test_post_goes_to_worker_query_url() {
        let transport = recording();
        let use_case = RelayQueryUseCase::new(
            transport.clone(),
            "https://worker.example.net/dns-query".to_string(),
            false,
        );

        let body = Bytes::from_static(b"\x00\x01binary");
        use_case
            .execute(RelayPayload::Post { body: body.clone() })
            .await
            .unwrap();

        assert_eq!(
            transport.last_url.lock().unwrap().as_deref(),
            Some("https://worker.example.net/dns-query")
        );
        assert_eq!(transport.last_body.lock().unwrap().as_ref(), Some(&body));
    }
}
