use std::{error::Error, sync::Arc};

use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt::time::LocalTime, layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    adapters::outbound::postgres::{PgArticleStore, PgBookRegistry},
    app_state::{AccessPolicy, AppState},
    domain::{ports::inbound::LibraryService, services::LibraryServiceImpl},
};

mod adapters;
mod app_state;
mod auth;
mod config;
mod domain;
mod router;
mod routes;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "legal_text_api=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_timer(LocalTime::rfc_3339()))
        .init();

    let config = config::read_config()?;

    let connection_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect_with(config.database.with_db())
        .await?;
    sqlx::migrate!().run(&connection_pool).await?;
    tracing::info!("Connected to database '{}'", config.database.database_name);

    let library = LibraryServiceImpl::new(
        Arc::new(PgBookRegistry::new(connection_pool.clone())),
        Arc::new(PgArticleStore::new(connection_pool)),
        config.search.library_config(),
    );

    match library.reconcile().await {
        Ok(orphans) if !orphans.is_empty() => {
            tracing::warn!("Found {} orphaned article partitions", orphans.len());
        }
        Ok(_) => {}
        Err(err) => tracing::warn!("Startup reconciliation failed: {}", err),
    }

    let access = AccessPolicy::from_settings(&config);
    if access == AccessPolicy::Deny {
        tracing::warn!("No API token configured, mutations are disabled");
    }

    let app = router::create(AppState::new(Arc::new(library), access));

    let addr = format!("{}:{}", config.application.host, config.application.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
