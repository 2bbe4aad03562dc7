use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};

use gazette::{
    app::App,
    cli::{DEFAULT_CONFIG_PATH, config_path_from_args},
    config::Config,
    console,
    logging::init_tracing,
    service::HttpFeedService,
};

#[tokio::main]
async fn main() -> Result<()> {
    let config = match config_path_from_args()? {
        Some(path) => Config::load(&path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => {
            let default_path = PathBuf::from(DEFAULT_CONFIG_PATH);
            if default_path.exists() {
                Config::load(&default_path).with_context(|| {
                    format!("failed to load config from {}", default_path.display())
                })?
            } else {
                eprintln!("no {} found; using built-in defaults", DEFAULT_CONFIG_PATH);
                Config::default()
            }
        }
    };

    let logging_guard = init_tracing(&config.logging).context("failed to initialize logging")?;
    tracing::info!(
        target: "console",
        run_id = %logging_guard.run_id(),
        base_url = %config.service.base_url,
        "gazette_started"
    );

    let service = Arc::new(
        HttpFeedService::new(&config.service)
            .context("failed to construct feed service client")?,
    );
    let app = App::new(service);

    let exit_reason = console::run(app).await?;
    tracing::info!(target: "console", exit_reason = ?exit_reason, "gazette_stopped");
    eprintln!("gazette stopped: {:?}", exit_reason);
    Ok(())
}
