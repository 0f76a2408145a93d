//! Tandem DoH Domain Layer
pub mod config;
pub mod errors;
pub mod health;

pub use config::{CliOverrides, Config, ConfigError, RelayTier, UpstreamEndpoint, UpstreamPool};
pub use errors::RelayError;
pub use health::{EdgeHealthReport, HealthStatus, WorkerHealthReport, WorkerHealthSnapshot};
