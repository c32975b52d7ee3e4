use std::sync::Arc;
use storage::{LocalFileStorage, Storage};

mod config;
mod errors;
mod routes;
mod storage;

use config::AppConfig;
use routes::PublicLinks;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env()?;

    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .init();

    let storage: Arc<dyn Storage> = Arc::new(LocalFileStorage::new(
        config.storage_path.clone(),
        config.naming,
    )?);
    tracing::info!(
        path = %config.storage_path.display(),
        naming = ?config.naming,
        "Upload directory ready"
    );

    let app = routes::router(
        storage,
        PublicLinks::new(config.public_base_url()),
        config.max_upload_bytes,
    );

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Server running on {} ({})", addr, config.public_base_url());

    axum::serve(listener, app).await?;
    Ok(())
}
