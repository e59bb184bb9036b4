use anyhow::Context;
use tracing_subscriber::EnvFilter;

use deckbuilder_api::{
    api::{create_router, AppState},
    config::Config,
    services::loader,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("deckbuilder_api=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;

    // Reference data is loaded once; any failure aborts startup
    let (catalog, store) = loader::load_reference_data(&config.data_dir).with_context(|| {
        format!(
            "Failed to load reference data from {}",
            config.data_dir.display()
        )
    })?;

    let state = AppState::new(catalog, store, &config);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    tracing::info!(addr = %config.bind_addr(), "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
