use std::sync::Arc;
use std::time::Instant;

use tandem_doh_domain::config::UpstreamConfig;
use tandem_doh_domain::health::{utc_timestamp, UpstreamProbe};
use tandem_doh_domain::UpstreamPool;
use tracing::{debug, warn};

use crate::ports::DohTransport;
use crate::use_cases::forward_query::append_dns_param;
use crate::use_cases::select_upstream::UpstreamSelector;

/// Wire query sent by health probes: base64url (no padding) encoding of a
/// 29-byte A/IN lookup for `example.com`, message ID 0, RD set.
pub const PROBE_DNS_QUERY: &str = "AAABAAABAAAAAAAAB2V4YW1wbGUDY29tAAABAAE";

/// Worker health path: one real DoH lookup against one selected upstream,
/// wall-clock timed. Selection goes through the same selector as the query
/// path, so the probe sees the pool exactly as client traffic does.
pub struct ProbeUpstreamUseCase {
    transport: Arc<dyn DohTransport>,
    selector: UpstreamSelector,
    upstream: UpstreamConfig,
    log_queries: bool,
}

impl ProbeUpstreamUseCase {
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

    pub async fn execute(&self) -> UpstreamProbe {
        let pool = UpstreamPool::resolve(&self.upstream);
        let endpoint = self.selector.pick(&pool);
        let url = append_dns_param(&endpoint.base_url, PROBE_DNS_QUERY);

        let start = Instant::now();
        match self.transport.get(&url).await {
            Ok(wire) => {
                let latency_ms = start.elapsed().as_millis() as u64;
                // Measured latency falls under the query-logging privacy
                // gate; failure lines below name only configured URLs.
                if self.log_queries {
                    debug!(
                        upstream = %endpoint.name,
                        status = wire.status,
                        latency_ms,
                        "upstream health probe completed"
                    );
                }
                UpstreamProbe {
                    upstream_url: endpoint.base_url,
                    upstream_status: Some(wire.status),
                    latency_ms: Some(latency_ms),
                    error: None,
                    checked_at: utc_timestamp(),
                }
            }
            Err(e) => {
                warn!(upstream = %endpoint.name, error = %e, "upstream health probe failed");
                UpstreamProbe {
                    upstream_url: endpoint.base_url,
                    upstream_status: None,
                    latency_ms: None,
                    error: Some(e.to_string()),
                    checked_at: utc_timestamp(),
                }
            }
        }
    }
}
