use std::sync::Arc;
use std::time::Duration;

use tandem_doh_api::{EdgeState, WorkerState};
use tandem_doh_application::{
    DohTransport, ForwardQueryUseCase, ProbeUpstreamUseCase, ProbeWorkerUseCase, RelayQueryUseCase,
    UpstreamSelector,
};
use tandem_doh_domain::Config;
use tandem_doh_infrastructure::{ReqwestTransport, ThreadRngSource};

fn transport(config: &Config) -> Arc<dyn DohTransport> {
    Arc::new(ReqwestTransport::new(Duration::from_secs(
        config.upstream.timeout,
    )))
}

pub fn worker_state(config: &Config) -> WorkerState {
    let transport = transport(config);
    let random = Arc::new(ThreadRngSource::new());

    WorkerState {
        forward_query: Arc::new(ForwardQueryUseCase::new(
            transport.clone(),
            UpstreamSelector::new(random.clone()),
            config.upstream.clone(),
            config.logging.log_queries,
        )),
        probe_upstream: Arc::new(ProbeUpstreamUseCase::new(
            transport,
            UpstreamSelector::new(random),
            config.upstream.clone(),
            config.logging.log_queries,
        )),
        proxy_id: format!("tandem-doh-worker/{}", env!("CARGO_PKG_VERSION")),
    }
}

pub fn edge_state(config: &Config) -> anyhow::Result<EdgeState> {
    // validate() already requires these for the edge tier.
    let worker_query_url = config
        .edge
        .worker_query_url()
        .ok_or_else(|| anyhow::anyhow!("edge tier requires a worker URL"))?;
    let worker_health_url = config
        .edge
        .worker_health_url()
        .ok_or_else(|| anyhow::anyhow!("edge tier requires a worker URL"))?;

    let transport = transport(config);
    Ok(EdgeState {
        relay_query: Arc::new(RelayQueryUseCase::new(
            transport.clone(),
            worker_query_url,
            config.logging.log_queries,
        )),
        probe_worker: Arc::new(ProbeWorkerUseCase::new(
            transport,
            worker_health_url,
            config.logging.log_queries,
        )),
        proxy_id: format!("tandem-doh-edge/{}", env!("CARGO_PKG_VERSION")),
    })
}
