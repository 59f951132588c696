use std::time::Duration;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod adapters;
mod app_state;
mod config;
mod domain;
mod factory;
mod router;
mod routes;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "phonebook_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = config::read_config().context("Failed to read configuration")?;
    tracing::debug!("loaded settings: {:?}", settings);

    let connection_pool = PgPoolOptions::new()
        .max_connections(settings.database.max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect_lazy_with(settings.database.with_db());

    let contact_service = factory::contact_service(connection_pool, &settings)
        .await
        .context("Failed to set up contact service")?;

    let app = router::create(
        app_state::AppState::new(contact_service),
        &settings.application,
        &settings.images,
    );

    let address = format!("{}:{}", settings.application.host, settings.application.port);
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;
    tracing::info!("listening on {}", address);

    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}
