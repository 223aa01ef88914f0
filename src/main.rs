mod api;
mod config;
mod controller;
mod logging;
mod model;
mod store;
mod view;

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use api::{HttpApi, MusicApi};
use config::{AppConfig, Cli};
use controller::AppController;
use model::AppModel;
use store::{Revision, SessionStorage, StoreContext, Toasts};
use view::AppView;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load(&cli).context("Failed to load configuration")?;

    if let Err(e) = logging::init_logging(&config.log_dir) {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }

    tracing::info!(api_url = %config.api_url, "=== Spotify Clone TUI Starting ===");

    let api: Arc<dyn MusicApi> = Arc::new(
        HttpApi::new(config.api_base_url()?, config.request_timeout())
            .context("Failed to build HTTP client")?,
    );
    let revision = Revision::new();
    let toasts = Toasts::new(config.toast_lifetime(), revision.clone());
    let ctx = StoreContext::new(toasts, revision);
    let session = SessionStorage::for_process(config.session_dir.clone());

    let app_model = AppModel::new(api, ctx, session, config.token_file.clone());
    let controller = AppController::new(app_model.clone());

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let controller_for_init = controller.clone();
    tokio::spawn(async move {
        controller_for_init.bootstrap().await;
    });

    let res = run_app(&mut terminal, app_model.clone(), controller).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = ?err, "Application error");
    }

    app_model.end_session();

    tracing::info!("Spotify Clone TUI shutting down");
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    model: AppModel,
    controller: AppController,
) -> io::Result<()> {
    let mut revision = model.revision.subscribe();
    let mut dirty = true;

    loop {
        model.toasts.expire_old().await;

        if dirty || revision.has_changed().unwrap_or(false) {
            revision.mark_unchanged();
            let snapshot = model.snapshot().await;
            terminal.draw(|f| AppView::render(f, &snapshot))?;
            dirty = false;
        }

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if let Err(e) = controller.handle_key_event(key).await {
                    tracing::warn!(error = %e, "Key handling failed");
                }
                dirty = true;
            } else {
                // Resize and the like
                dirty = true;
            }
        }

        if model.should_quit().await {
            break;
        }
    }

    Ok(())
}
