use std::net::SocketAddr;
use std::time::Duration;

use clap::Parser;
use resource_sync::{proxy, ProxyConfig};
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Debug, Parser)]
#[command(name = "media-proxy", version, about = "Same-origin relay for remote-hosted media")]
struct Cli {
    /// Where the relay will listen, e.g. 127.0.0.1:3000
    #[arg(long, env = "LISTEN_ADDR", default_value = "127.0.0.1:3000")]
    listen: String,

    /// Origin of the remote API that hosts `/storage/...` objects.
    #[arg(long, env = "API_BASE_URL", default_value = resource_sync::config::DEFAULT_API_BASE_URL)]
    api_base_url: String,

    /// Only `path` values under this prefix are relayed.
    #[arg(long, default_value = resource_sync::config::DEFAULT_STORAGE_PREFIX)]
    path_prefix: String,

    /// max-age advertised on relayed responses, in seconds.
    #[arg(long, env = "MEDIA_MAX_AGE_SECS", default_value_t = 3600)]
    max_age_secs: u64,

    /// Upstream request timeout in seconds.
    #[arg(long, env = "API_TIMEOUT_SECS", default_value_t = 30)]
    timeout_secs: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fmt()
        .with_target(false)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = ProxyConfig::new(cli.api_base_url)
        .with_max_age(Duration::from_secs(cli.max_age_secs))
        .with_upstream_timeout(Duration::from_secs(cli.timeout_secs));
    config.path_prefix = cli.path_prefix;

    info!("starting media proxy with config: {:?}", config);

    let state = proxy::ProxyState::new(config)?;
    let app = proxy::router(state).layer(TraceLayer::new_for_http());

    let addr: SocketAddr = cli.listen.parse()?;
    info!("listening on http://{}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = signal::ctrl_c().await;
    info!("shutdown requested");
}
