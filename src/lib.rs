pub mod api;
pub mod authorization;
pub mod config;
pub mod db;
pub mod identity;
pub mod models;
pub mod store;

use tracing_subscriber::EnvFilter;

/// Initialize logging, open and migrate the database, then serve the
/// API until shutdown.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("Caredesk starting v{}", config::APP_VERSION);

    std::fs::create_dir_all(config::app_data_dir())?;
    let db_path = config::db_path();
    // Open once up-front so migrations run before the first request.
    db::open_database(&db_path)?;

    let ctx = api::types::ApiContext::new(db_path);
    api::server::serve(ctx, config::bind_addr()).await?;
    Ok(())
}
