use blog_graphql_gateway::{build_schema, serve, AppState, Config, RestClient};
use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(true).init();

    let config = Config::parse();
    let client = RestClient::new(config.rest_service_url.clone());
    let state = AppState::new(build_schema(), client);

    let listener = TcpListener::bind(config.listen_address()).await.map_err(|e| {
        tracing::error!(address = %config.listen_address(), error = %e, "server start failed");
        e
    })?;

    serve(listener, state, shutdown_signal()).await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}
