//! Agenda TUI - notes and meeting scheduler in the terminal.
//!
//! Talks to an Agenda data service (`agenda serve` by default) and keeps
//! one page per collection.

mod app;
mod ui;

use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use directories::ProjectDirs;
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use agenda::config::{ClientArgs, Config};
use app::App;

/// How often the loop wakes to apply finished calls when no key arrives.
const TICK: Duration = Duration::from_millis(100);

#[derive(Parser)]
#[command(name = "agenda-tui")]
#[command(about = "Notes and meeting scheduler in the terminal")]
struct Cli {
    #[command(flatten)]
    client: ClientArgs,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::from_args(&cli.client)?;
    let log_path = init_logging();

    let runtime = tokio::runtime::Runtime::new()?;
    let mut app = App::new(&config, runtime.handle().clone())?;
    tracing::info!("Agenda TUI using data service at {}", config.base_url);
    app.load_all();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {e}");
    }
    if let Some(path) = log_path {
        eprintln!("Log written to {}", path.display());
    }

    Ok(())
}

/// Logs go to a file; the terminal belongs to the UI.
fn init_logging() -> Option<PathBuf> {
    let dir = ProjectDirs::from("", "", "agenda")?.data_dir().to_path_buf();
    std::fs::create_dir_all(&dir).ok()?;
    let path = dir.join("agenda-tui.log");
    let file = OpenOptions::new().create(true).append(true).open(&path).ok()?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "agenda=debug,agenda_core=debug,agenda_tui=debug".into()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false),
        )
        .init();
    Some(path)
}

/// Main event loop.
fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|frame| ui::render(frame, app))?;

        if event::poll(TICK)? {
            if let Event::Key(key) = event::read()? {
                // Only handle key press events (not release)
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }
        app.tick();

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
