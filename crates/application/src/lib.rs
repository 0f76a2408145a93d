//! Tandem DoH Application Layer
pub mod ports;
pub mod use_cases;

pub use ports::{DohTransport, RandomSource, WireResponse};
pub use use_cases::{
    ForwardOutcome, ForwardQueryUseCase, ProbeUpstreamUseCase, ProbeWorkerUseCase, QueryPayload,
    RelayPayload, RelayQueryUseCase, UpstreamSelector, WorkerProbe, PROBE_DNS_QUERY,
};
