use std::sync::Arc;

use anyhow::Context;

use bizdesk_infra::AppConfig;
use bizdesk_observability::LogSettings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("failed to load configuration")?;

    bizdesk_observability::init(&LogSettings {
        level: config.log.level.clone(),
        json: config.log.json,
    });

    let services = bizdesk_api::app::services::build_services(&config)
        .await
        .context("failed to initialize document store")?;
    let app = bizdesk_api::app::build_app(Arc::new(services));

    let addr = config.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, app).await?;
    Ok(())
}
