mod app;
mod config;
mod data;
mod ui;

use std::sync::Arc;

use app::App;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    init_logging()?;

    let path = config::config_path();
    let cfg = config::load_config(&path);
    info!(
        coin = %cfg.coin_id,
        days = cfg.days,
        refresh_secs = cfg.refresh_secs,
        "starting btcdash"
    );

    let mut terminal = ratatui::init();
    let mut app = App::new(cfg);
    let result = app.run(&mut terminal).await;
    ratatui::restore();

    if let Err(err) = config::save_config(&path, app.config()) {
        warn!(%err, "failed to save config");
    }
    info!("stopped");
    result
}

/// Logs go to a file: the terminal belongs to the UI.
fn init_logging() -> color_eyre::Result<()> {
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open("btcdash.log")?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("btcdash=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Arc::new(file))
        .init();
    Ok(())
}
