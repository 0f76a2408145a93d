use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use tandem_doh_domain::config::UpstreamConfig;
use tandem_doh_domain::{RelayError, UpstreamPool};
use tracing::{debug, warn};

use crate::ports::DohTransport;
use crate::use_cases::select_upstream::UpstreamSelector;

/// Inbound DoH payload, kept opaque end to end.
#[derive(Debug, Clone)]
pub enum QueryPayload {
    /// Verbatim (still-encoded) value of the `dns` query parameter.
    Get { dns: String },
    /// Raw binary DNS message from a POST body.
    Post { body: Bytes },
}

/// One forwarded exchange: the next hop's status and body, relayed
/// byte-exact.
#[derive(Debug, Clone)]
pub struct ForwardOutcome {
    pub status: u16,
    pub body: Bytes,
    /// Base URL of the hop the query went to.
    pub upstream_url: String,
    pub elapsed_ms: u64,
}

/// Worker query path: pick one upstream per request, forward, relay the
/// answer. No retry against a different upstream on failure.
pub struct ForwardQueryUseCase {
    transport: Arc<dyn DohTransport>,
    selector: UpstreamSelector,
    upstream: UpstreamConfig,
    log_queries: bool,
}

impl ForwardQueryUseCase {
    pub fn new(
        transport: Arc<dyn DohTransport>,
        selector: UpstreamSelector,
        upstream: UpstreamConfig,
        log_queries: bool,
    ) -> Self {
        Self {
            transport,
            selector,
            upstream,
            log_queries,
        }
    }

    pub async fn execute(&self, payload: QueryPayload) -> Result<ForwardOutcome, RelayError> {
        let pool = UpstreamPool::resolve(&self.upstream);
        let endpoint = self.selector.pick(&pool);
        let start = Instant::now();

        let response = match payload {
            QueryPayload::Get { dns } => {
                let url = append_dns_param(&endpoint.base_url, &dns);
                self.transport.get(&url).await
            }
            QueryPayload::Post { body } => self.transport.post(&endpoint.base_url, body).await,
        };

        let elapsed_ms = start.elapsed().as_millis() as u64;
        match response {
            Ok(wire) => {
                if self.log_queries {
                    debug!(
                        upstream = %endpoint.name,
                        status = wire.status,
                        elapsed_ms,
                        "forwarded DoH query"
                    );
                }
                Ok(ForwardOutcome {
                    status: wire.status,
                    body: wire.body,
                    upstream_url: endpoint.base_url,
                    elapsed_ms,
                })
            }
            Err(e) => {
                warn!(upstream = %endpoint.name, error = %e, "upstream DoH call failed");
                Err(e)
            }
        }
    }
}

/// `{base}?dns={value}`, switching to `&` when the base already carries a
/// query string.
pub(crate) fn append_dns_param(base: &str, dns: &str) -> String {
    let sep = if base.contains('?') { '&' } else { '?' };
    format!("{base}{sep}dns={dns}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{RandomSource, WireResponse};
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct RecordingTransport {
        last_url: Mutex<Option<String>>,
        last_body: Mutex<Option<Bytes>>,
        fail: bool,
    }

    impl RecordingTransport {
        fn new(fail: bool) -> Self {
            Self {
                last_url: Mutex::new(None),
                last_body: Mutex::new(None),
                fail,
            }
        }

        fn respond(&self, url: &str) -> Result<WireResponse, RelayError> {
            if self.fail {
                return Err(RelayError::transport(url, "connection refused"));
            }
            Ok(WireResponse {
                status: 200,
                body: Bytes::from_static(b"\x00\x00\x81\x80answer"),
            })
        }
    }

    #[async_trait]
    impl DohTransport for RecordingTransport {
        async fn get(&self, url: &str) -> Result<WireResponse, RelayError> {
            *self.last_url.lock().unwrap() = Some(url.to_string());
            self.respond(url)
        }

        async fn post(&self, url: &str, body: Bytes) -> Result<WireResponse, RelayError> {
            *self.last_url.lock().unwrap() = Some(url.to_string());
            *self.last_body.lock().unwrap() = Some(body);
            self.respond(url)
        }
    }

    struct AlwaysFirst;
    impl RandomSource for AlwaysFirst {
        fn pick_index(&self, _len: usize) -> usize {
            0
        }
    }

    fn use_case(transport: Arc<RecordingTransport>) -> ForwardQueryUseCase {
        let upstream = UpstreamConfig {
            urls: vec!["https://resolver.example/dns-query".to_string()],
            ..Default::default()
        };
        ForwardQueryUseCase::new(
            transport,
            UpstreamSelector::new(Arc::new(AlwaysFirst)),
            upstream,
            false,
        )
    }

    #[tokio::test]
    async fn test_get_copies_dns_value_verbatim() {
        let transport = Arc::new(RecordingTransport::new(false));
        let outcome = use_case(transport.clone())
            .execute(QueryPayload::Get {
                // Deliberately percent-encoded-looking text; it must not be
                // decoded or re-encoded on the way through.
                dns: "AAABAAABAAAAAAAAB2V4YW1wbGUDY29tAAABAAE%3D".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(
            transport.last_url.lock().unwrap().as_deref(),
            Some("https://resolver.example/dns-query?dns=AAABAAABAAAAAAAAB2V4YW1wbGUDY29tAAABAAE%3D")
        );
        assert_eq!(outcome.status, 200);
        assert_eq!(outcome.upstream_url, "https://resolver.example/dns-query");
    }

    #[tokio::test]
    async fn test_post_passes_body_through() {
        let transport = Arc::new(RecordingTransport::new(false));
        let body = Bytes::from_static(b"\x12\x34\x01\x00raw-query");

        let outcome = use_case(transport.clone())
            .execute(QueryPayload::Post { body: body.clone() })
            .await
            .unwrap();

        assert_eq!(transport.last_body.lock().unwrap().as_ref(), Some(&body));
        assert_eq!(outcome.body, Bytes::from_static(b"\x00\x00\x81\x80answer"));
    }

    #[tokio::test]
    async fn test_transport_failure_propagates() {
        let transport = Arc::new(RecordingTransport::new(true));
        let err = use_case(transport)
            .execute(QueryPayload::Get {
                dns: "AAAA".to_string(),
            })
            .await
            .unwrap_err();

        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn test_append_dns_param_separator() {
        assert_eq!(
            append_dns_param("https://r.example/dns-query", "QQ"),
            "https://r.example/dns-query?dns=QQ"
        );
        assert_eq!(
            append_dns_param("https://r.example/dns-query?ct=1", "QQ"),
            "https://r.example/dns-query?ct=1&dns=QQ"
        );
    }
}
