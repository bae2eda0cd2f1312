mod app;
mod auth;
mod catalog;
mod config;
mod db;
mod documents;
mod metrics;
mod models;
mod notice;
mod summarizer;
mod sync;
mod ui;

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use tui::{
    backend::{Backend as TuiBackend, CrosstermBackend},
    Terminal,
};

use crate::app::{AppState, DEMO_OPERATOR_EMAIL, DEMO_OPERATOR_PASSWORD};
use crate::db::{Backend, MemoryStore};
use crate::sync::SeedData;
use crate::ui::route::Route;

/// How long the loop waits for a key before applying background results
const TICK: Duration = Duration::from_millis(200);

/// Terminal dashboard for running a recording studio
#[derive(Parser, Debug)]
#[command(name = "studio_desk", version, about)]
struct Args {
    /// Run against the built-in demo data with an in-memory store
    #[arg(long)]
    demo: bool,

    /// Where to write logs; the terminal belongs to the UI
    #[arg(long, default_value = "studio_desk.log")]
    log_file: PathBuf,

    /// Screen to open after sign-in, e.g. /finance or /client/c1
    #[arg(long, default_value = "/")]
    open: String,
}

fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("cannot create log file {}", path.display()))?;

    let file_layer = fmt::layer()
        .with_writer(Arc::new(file))
        .with_target(true)
        .with_ansi(false);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("studio_desk=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_file)?;

    // Load configuration
    let config = config::init()?;
    tracing::info!(demo = args.demo, "starting studio desk");

    let store = if args.demo {
        let seeds = SeedData::default();
        Backend::Memory(
            MemoryStore::new()
                .with_operator(DEMO_OPERATOR_EMAIL, DEMO_OPERATOR_PASSWORD)
                .with_projects(seeds.projects)
                .with_clients(seeds.clients)
                .with_invoices(seeds.invoices),
        )
    } else {
        Backend::Postgres(db::init(&config).await?)
    };

    let mut app_state = AppState::new(store, &config, args.demo)?.with_home(Route::parse(&args.open));

    // Setup terminal
    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app_state).await;

    // Restore terminal
    terminal::disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    if let Err(err) = &result {
        tracing::error!(error = %err, "studio desk exited with an error");
        println!("Error: {}", err);
    }

    // Tear down the feed and its listener before the runtime goes away.
    drop(app_state);
    tracing::info!("studio desk stopped");

    result
}

async fn run_app<B: TuiBackend>(terminal: &mut Terminal<B>, app_state: &mut AppState) -> Result<()> {
    loop {
        app_state.pump();
        terminal.draw(|f| app_state.draw(f))?;

        if !event::poll(TICK)? {
            continue;
        }
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if app_state.handle_key(key).await? {
                break;
            }
        }
    }

    Ok(())
}
