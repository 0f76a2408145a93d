use std::net::SocketAddr;

use axum::Router;
use tandem_doh_domain::{Config, RelayTier};
use tower_http::trace::TraceLayer;
use tracing::info;

/// Bind and serve one relay tier until the process is stopped.
pub async fn serve(config: &Config, tier: RelayTier, app: Router) -> anyhow::Result<()> {
    // Per-request HTTP tracing sits behind the same privacy gate as the
    // query diagnostics in the use cases.
    let app = if config.logging.log_queries {
        app.layer(TraceLayer::new_for_http())
    } else {
        app
    };

    let addr: SocketAddr =
        format!("{}:{}", config.server.bind_address, config.server.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!(
        tier = %tier,
        bind_address = %addr,
        dashboard_url = format!("http://{addr}"),
        doh_url = format!("http://{addr}/dns-query"),
        "Relay listening"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
