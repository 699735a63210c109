use anyhow::Context;

use phonebook_infra::config::Settings;
use phonebook_observability::LogFormat;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    match std::env::var("PHONEBOOK_LOG_FORMAT") {
        Ok(name) => phonebook_observability::tracing::init(LogFormat::from_name(&name), "info"),
        Err(_) => phonebook_observability::init(),
    }

    let settings = Settings::load().context("failed to load settings")?;
    tracing::info!(?settings, "configuration loaded");

    let app = phonebook_api::app::build_app_from_settings(&settings).await?;

    let listener = tokio::net::TcpListener::bind(&settings.bind_address)
        .await
        .with_context(|| format!("failed to bind {}", settings.bind_address))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
