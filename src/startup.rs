use crate::components::StaticPage;
use crate::config::Config;
use crate::error::Error;
use crate::OpenHours;
use std::env;
use std::fs;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Page layout read when OPENHOURS_PAGE is not set
pub const DEFAULT_PAGE_PATH: &str = "config/page.toml";

/// Initialize logging with environment-based configuration
pub fn init_logging() -> miette::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,reqwest=warn,hyper=warn")),
        )
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| Error::Other(format!("Failed to set up logging: {}", e)))?;

    Ok(())
}

/// Load the application config
pub fn load_config() -> miette::Result<Config> {
    match Config::load() {
        Ok(config) => Ok(config),
        Err(e) => {
            error!("Failed to load configuration: {:?}", e);
            Err(e.into())
        }
    }
}

/// Load the page layout, render the hours into it and write the HTML out
pub async fn run(config: Config) -> miette::Result<()> {
    let page_path = env::var("OPENHOURS_PAGE").unwrap_or_else(|_| DEFAULT_PAGE_PATH.to_string());
    info!("Loading page layout from {}", page_path);
    let mut page = StaticPage::load(&page_path)?;

    let mut openhours = OpenHours::new(config);
    match openhours.bootstrap_page(&mut page).await? {
        Some(summary) => info!("Rendered hours for {} placeholders", summary.outcomes.len()),
        None => info!("No openhours container in {}, nothing to render", page_path),
    }

    let html = page.to_html();
    match env::var("OPENHOURS_OUTPUT") {
        Ok(path) => {
            fs::write(&path, html).map_err(Error::from)?;
            info!("Wrote hours to {}", path);
        }
        Err(_) => print!("{}", html),
    }

    Ok(())
}
