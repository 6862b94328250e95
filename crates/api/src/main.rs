use anyhow::Context;

use tokengate_api::config::ApiConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tokengate_observability::init();

    let config = ApiConfig::from_env().inspect_err(|e| {
        tracing::error!(error = %e, "invalid configuration");
    })?;
    let addr = config.bind_addr;

    let app = tokengate_api::app::build_app(config);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
