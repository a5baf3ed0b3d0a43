use openhours::startup;
use tracing::info;

#[tokio::main]
async fn main() -> miette::Result<()> {
    // Initialize logging
    startup::init_logging()?;

    info!("Starting openhours");

    // Load configuration
    let config = startup::load_config()?;

    // Render the page
    startup::run(config).await
}
