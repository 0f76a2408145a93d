pub mod forward_query;
pub mod probe_upstream;
pub mod probe_worker;
pub mod relay_query;
pub mod select_upstream;

// Re-export use cases
pub use forward_query::{ForwardOutcome, ForwardQueryUseCase, QueryPayload};
pub use probe_upstream::{ProbeUpstreamUseCase, PROBE_DNS_QUERY};
pub use probe_worker::{ProbeWorkerUseCase, WorkerProbe};
pub use relay_query::{RelayPayload, RelayQueryUseCase};
pub use select_upstream::UpstreamSelector;
