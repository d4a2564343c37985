use anyhow::Context;
use kitchen4u_api::api::{create_router, AppState};
use kitchen4u_api::infrastructure::{Config, Database};
use std::net::SocketAddr;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kitchen4u_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();

    let config = Config::from_env()?;

    let db = Database::connect(&config.database);
    db.check_connection()
        .await
        .context("database connection failed")?;
    info!("PostgreSQL pool initialized");

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);
    let state = AppState::new(db, config);
    let app = create_router(state);

    info!("Kitchen4u API listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
