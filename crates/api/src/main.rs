use anyhow::Context;

use backoffice_api::config::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    backoffice_observability::init();

    let config = ServerConfig::from_env().context("invalid server configuration")?;
    let app = backoffice_api::app::build_app(&config).context("failed to build services")?;

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
