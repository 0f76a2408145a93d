use tandem_doh_domain::{CliOverrides, Config, RelayTier};
use tracing_subscriber::EnvFilter;

/// Load and validate configuration for the tier being started.
///
/// File, environment and CLI layers are applied inside `Config::load`;
/// validation happens before logging is up, so failures print through the
/// returned error rather than a log line.
pub fn load_config(
    path: Option<&str>,
    overrides: CliOverrides,
    tier: RelayTier,
) -> anyhow::Result<Config> {
    let config = Config::load(path, overrides)?;
    config.validate(tier)?;
    Ok(config)
}

/// Initialize the tracing subscriber.
///
/// The configured level is the default directive; `RUST_LOG` can still
/// raise or lower individual targets.
pub fn init_logging(config: &Config) {
    let default_directive = config
        .logging
        .level
        .parse()
        .unwrap_or_else(|_| tracing::Level::INFO.into());

    let filter = EnvFilter::builder()
        .with_default_directive(default_directive)
        .from_env_lossy();

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
