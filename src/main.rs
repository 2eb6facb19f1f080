use std::error::Error;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};
use write_track::{catalog::Catalog, router, AppState, Config, Upstream};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = Config::from_env();
    let upstream = Upstream::new(&config.upstream_base_url, config.connect_timeout)?;
    let app = router(AppState::new(upstream, Catalog::default()));

    let addr = config.listen_addr();
    info!(upstream = %config.upstream_base_url, "listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutting down");
    }
}
