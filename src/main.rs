use anyhow::Result;
use inpi_status_sync::config::Config;
use inpi_status_sync::orchestrator::App;
use inpi_status_sync::utils::logging;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    logging::init();

    // Load configuration
    let config = Config::from_env();

    // Initialize and run the application
    App::initialize(config).await?.run().await?;

    Ok(())
}
