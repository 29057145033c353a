use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use kundali_core::{logging, AstroClient, Config, Overrides, ServiceConfig};

mod app;
mod handler;
mod screens;
mod tui;
mod ui;

#[cfg(test)]
mod test_support;

use app::App;
use tui::{EventHandler, Tui};

#[derive(Parser)]
#[command(name = "kundali")]
#[command(version)]
#[command(about = "Kundali birth charts and astrology Q&A in the terminal")]
struct Cli {
    /// Base URL of the astrology service (overrides KUNDALI_API_URL and the config file)
    #[arg(long)]
    api_url: Option<String>,
    /// Request timeout in seconds, 0 disables it
    #[arg(long)]
    timeout: Option<u64>,
    /// Write the resolved service settings to the config file
    #[arg(long)]
    save: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init().context("Failed to set up logging")?;

    let service = resolve_service(&cli)?;
    tracing::info!("Using astrology service at {}", service.base_url);

    if cli.save {
        Config::from(&service)
            .save()
            .context("Failed to save config")?;
        tracing::info!("Saved service settings");
    }

    let client = AstroClient::new(service).context("Failed to build HTTP client")?;
    let service_url = client.base_url().to_string();
    let mut app = App::new(Arc::new(client), service_url);

    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let result = run(&mut terminal, &mut app).await;
    tui::restore()?;

    if let Err(e) = &result {
        tracing::error!("Exited with error: {:#}", e);
        eprintln!("Logs are in {}", logging::log_dir().display());
    }
    result
}

fn resolve_service(cli: &Cli) -> Result<ServiceConfig> {
    let file = Config::load().context("Failed to read config file")?;
    let overrides = Overrides {
        api_url: cli.api_url.clone(),
        timeout_secs: cli.timeout,
    };
    Ok(ServiceConfig::resolve(&overrides, &file)?)
}

async fn run(terminal: &mut Tui, app: &mut App) -> Result<()> {
    let mut events = EventHandler::new();

    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        match events.next().await {
            Some(event) => handler::handle_event(app, event),
            None => break,
        }
    }

    tracing::info!("Quitting");
    Ok(())
}
