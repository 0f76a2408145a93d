use std::sync::Arc;
use std::time::Instant;

use tandem_doh_domain::WorkerHealthSnapshot;
use tracing::{debug, warn};

use crate::ports::DohTransport;

/// Outcome of probing the worker's health endpoint from the edge.
#[derive(Debug, Clone)]
pub enum WorkerProbe {
    /// The worker answered. Its payload is parsed leniently: any body that
    /// is not valid JSON of the expected shape collapses to an empty
    /// snapshot rather than failing the edge's own health check.
    Responded {
        http_status: u16,
        snapshot: WorkerHealthSnapshot,
        edge_latency_ms: u64,
    },
    /// Transport failure before any response arrived.
    Unreachable { error: String },
}

/// Edge health path: time one GET of the worker's health endpoint.
pub struct ProbeWorkerUseCase {
    transport: Arc<dyn DohTransport>,
    worker_health_url: String,
    log_queries: bool,
}

impl ProbeWorkerUseCase {
    pub fn new(
        transport: Arc<dyn DohTransport>,
        worker_health_url: String,
        log_queries: bool,
    ) -> Self {
        Self {
            transport,
            worker_health_url,
            log_queries,
        }
    }

    pub async fn execute(&self) -> WorkerProbe {
        let start = Instant::now();
        match self.transport.get(&self.worker_health_url).await {
            Ok(wire) => {
                let edge_latency_ms = start.elapsed().as_millis() as u64;
                let snapshot: WorkerHealthSnapshot =
                    serde_json::from_slice(&wire.body).unwrap_or_default();
                // Measured hop latency sits behind the privacy gate; the
                // failure line below names only the configured worker URL.
                if self.log_queries {
                    debug!(
                        status = wire.status,
                        edge_latency_ms, "worker health probe completed"
                    );
                }
                WorkerProbe::Responded {
                    http_status: wire.status,
                    snapshot,
                    edge_latency_ms,
                }
            }
            Err(e) => {
                warn!(worker = %self.worker_health_url, error = %e, "worker health probe failed");
                WorkerProbe::Unreachable {
                    error: e.to_string(),
                }
            }
        }
    }
}
