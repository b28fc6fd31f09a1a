mod app;
mod components;
mod tui;

use anyhow::{Context, Result};
use app::App;
use sqlauth::auth::SqlUserInfo;
use sqlauth::config::Settings;
use sqlauth::db::{self, SqlHelper};
use std::fs::OpenOptions;
use tui::Tui;

fn main() -> Result<()> {
    let settings = Settings::load().context("Failed to load configuration")?;
    init_logging(&settings)?;

    let helper = SqlHelper::from_settings(&settings);
    db::init_db(&helper).context("Failed to initialise database")?;

    let _guard = CleanupGuard;
    let mut tui = Tui::new()?;
    tui.enter()?;

    let mut app = App::new(SqlUserInfo::new(helper));
    let res = app.run(&mut tui);

    tui.exit()?;

    if let Err(e) = res {
        log::error!("Application error: {e:#}");
        eprintln!("Application Error: {e:#}");
    }
    Ok(())
}

/// Sends `log` output to the configured file so it stays off the terminal UI.
fn init_logging(settings: &Settings) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(settings.log_file())
        .with_context(|| format!("Failed to open log file {}", settings.log_file()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    log::info!("Starting sqlauth");
    Ok(())
}

struct CleanupGuard;

impl Drop for CleanupGuard {
    fn drop(&mut self) {
        // Ignore errors during cleanup
        let _ = tui::restore();
    }
}
