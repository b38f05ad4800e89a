//! Storefront entry point - wires configuration, database and HTTP server.

use std::env;
use sweetshop::{
    config::{database, settings},
    core::user,
    errors::Result,
    web::{AppState, router},
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing as early as possible
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load .env file; env vars can also be set externally
    dotenvy::dotenv().ok();

    let shop_settings = settings::load_default_settings()
        .inspect_err(|e| error!("Failed to load shop settings: {e}"))?;
    info!("Shop settings loaded.");

    let db = database::create_connection()
        .await
        .inspect(|_| info!("Database connection established."))
        .inspect_err(|e| error!("Failed to connect to database: {e}"))?;
    database::create_tables(&db).await?;

    // Seed the administrator account when credentials are configured
    match (env::var("SHOP_ADMIN_USER"), env::var("SHOP_ADMIN_PASSWORD")) {
        (Ok(username), Ok(password)) => {
            let admin = user::seed_admin(
                &db,
                &username,
                &password,
                &shop_settings.shop.default_currency,
            )
            .await?;
            info!(admin = %admin.username, "Administrator account ready.");
        }
        _ => info!("SHOP_ADMIN_USER/SHOP_ADMIN_PASSWORD not set, skipping admin seeding."),
    }

    let bind_addr = shop_settings.shop.bind_addr.clone();
    let app = router(AppState::new(db, shop_settings));

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("Listening on {bind_addr}");
    axum::serve(listener, app).await?;

    Ok(())
}
