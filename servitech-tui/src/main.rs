mod app;
mod bootstrap;
mod cli;
mod logging;
mod login;
mod runtime;
mod session_store;
mod ui;

use anyhow::{Context, Result};
use app::App;
use bootstrap::Services;
use clap::Parser;
use cli::{Cli, Commands};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use servitech_client::ServitechClient;
use servitech_core::config::{read_config, user_config_file};
use std::io;

const DEFAULT_CONFIG: &str = r#"# ServiTech terminal client configuration.
# Environment variables (SERVITECH_API__BASE_URL, ...) take precedence.

[api]
base_url = "http://localhost:8000"
timeout_ms = 5000

[tracker]
tick_interval_ms = 1000
"#;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match cli.command {
        Commands::ConfigPath => {
            let path = user_config_file().context("Cannot determine config directory")?;
            if !path.exists() {
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                std::fs::write(&path, DEFAULT_CONFIG)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
            }
            println!("{}", path.display());
            return Ok(());
        }
        Commands::Logout => {
            session_store::clear_session()?;
            println!("Logged out.");
            return Ok(());
        }
        _ => {}
    }

    logging::init(&session_store::log_path()?)?;
    let settings = read_config().context("Failed to load configuration")?;

    match cli.command {
        Commands::Login => {
            let client = ServitechClient::new(&settings.api.base_url, settings.api.timeout())?;
            login::run_login(&client).await?;
            Ok(())
        }
        Commands::Run => {
            let session = session_store::load_session()?
                .context("Not logged in. Run `servitech-tui login` first.")?;
            let services = bootstrap::http_services(&settings, &session)?;
            run_tui(App::new(session.user().clone()), services).await
        }
        Commands::Dev => {
            let session = bootstrap::dev_session();
            let services = bootstrap::dev_services(&settings, &session);
            run_tui(App::new(session.user().clone()), services).await
        }
        Commands::ConfigPath | Commands::Logout => Ok(()),
    }
}

async fn run_tui(mut app: App, services: Services) -> Result<()> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = runtime::run_app(&mut terminal, &mut app, &services).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        tracing::error!("TUI exited with error: {:?}", err);
    }
    res
}
