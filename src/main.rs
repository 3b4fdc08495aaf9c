use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use distrohub::{config::Config, db, router};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "distrohub=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load config
    let config = Config::from_env()?;
    tracing::info!("Starting distrohub server");
    tracing::info!("Database: {}", config.database_url);
    tracing::info!("Listening on: {}", config.bind_address());

    // Connect to database and run migrations
    let pool = db::create_pool(&config.database_url).await?;

    let app = router(pool);

    // Run server
    let listener = tokio::net::TcpListener::bind(&config.bind_address()).await?;
    tracing::info!("REST API: http://{}", config.bind_address());

    axum::serve(listener, app).await?;

    Ok(())
}
