//! Terminal UI for wastewise that lets users log waste and browse stats, trends, and tips.

mod app;
mod input;
mod ui;

use std::{env, io, sync::Arc, time::Duration as StdDuration};

use anyhow::Result;
use chrono::Utc;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event as CEvent},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use wastewise_core::{
    model::UserId, service::WasteWiseService, store::InMemoryLogStore, suggest::SuggestionEngine,
};
use wastewise_provider_openai::{self as openai, OpenAiConfig};

use crate::app::App;
use crate::input::Action;

const DEFAULT_USER: &str = "guest";

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    // Suggestion engine: OpenAI only when a key is configured
    let engine = match OpenAiConfig::from_env()? {
        Some(config) => {
            info!(model = %config.model, "using OpenAI suggestions with rule fallback");
            SuggestionEngine::with_primary(openai::provider(config)?)
        }
        None => SuggestionEngine::rules_only(),
    };

    let store = Arc::new(InMemoryLogStore::new());
    let service = Arc::new(WasteWiseService::new(store, engine));
    service.seed_demo_data(Utc::now()).await?;

    // App state
    let mut app = App::new(service, current_user());
    if let Err(err) = app.refresh().await {
        app.error_message = Some(format!("Failed to load data: {err}"));
    }

    // Terminal init
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run event loop
    let res = run(&mut terminal, app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    res
}

async fn run(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, mut app: App) -> Result<()> {
    loop {
        // Draw current UI
        terminal.draw(|frame| ui::draw(frame, &app))?;

        // Poll for input (non-blocking, small timeout to keep CPU low)
        if event::poll(StdDuration::from_millis(100))?
            && let CEvent::Key(key) = event::read()?
        {
            let action = input::handle_key_event(key, &mut app);

            match action {
                Action::Quit => break,
                Action::None => {}
                Action::Refresh => {
                    app.is_loading = true;
                    app.info_message = None;
                    terminal.draw(|frame| ui::draw(frame, &app))?;

                    let res = app.refresh().await;

                    app.is_loading = false;
                    if let Err(err) = res {
                        app.error_message = Some(format!("Failed to load data: {err}"));
                    }
                }
                Action::SubmitLog => {
                    app.error_message = None;
                    match app.submit_log().await {
                        Ok(message) => {
                            app.info_message = Some(message);
                            if let Err(err) = app.refresh().await {
                                app.error_message = Some(format!("Failed to load data: {err}"));
                            }
                        }
                        Err(message) => {
                            warn!("log entry rejected: {message}");
                            app.error_message = Some(message);
                        }
                    }
                }
            }
        }
    }

    Ok(())
}

fn current_user() -> UserId {
    env::args()
        .nth(1)
        .or_else(|| env::var("WASTEWISE_USER").ok())
        .map(|name| name.trim().to_owned())
        .filter(|name| !name.is_empty())
        .map_or_else(|| UserId::from(DEFAULT_USER), UserId)
}

/// Log to stderr so the alternate screen stays clean; redirect with `2>wastewise.log`.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_err| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(false)
        .init();
}
