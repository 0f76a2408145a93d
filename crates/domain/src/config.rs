pub mod edge;
pub mod errors;
pub mod logging;
pub mod root;
pub mod server;
pub mod upstream;

pub use edge::EdgeConfig;
pub use errors::ConfigError;
pub use logging::LoggingConfig;
pub use root::{CliOverrides, Config, RelayTier};
pub use server::ServerConfig;
pub use upstream::{UpstreamConfig, UpstreamEndpoint, UpstreamPool};
