use std::sync::Arc;

use tandem_doh_application::{
    ForwardQueryUseCase, ProbeUpstreamUseCase, ProbeWorkerUseCase, RelayQueryUseCase,
};

/// Shared state for the worker tier router.
#[derive(Clone)]
pub struct WorkerState {
    pub forward_query: Arc<ForwardQueryUseCase>,
    pub probe_upstream: Arc<ProbeUpstreamUseCase>,
    /// Value of the `X-DoH-Proxy` response header, e.g. `tandem-doh-worker/0.3.2`.
    pub proxy_id: String,
}

/// Shared state for the edge tier router.
#[derive(Clone)]
pub struct EdgeState {
    pub relay_query: Arc<RelayQueryUseCase>,
    pub probe_worker: Arc<ProbeWorkerUseCase>,
    pub proxy_id: String,
}
