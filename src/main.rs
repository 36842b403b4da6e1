//! cinefetch - movie details in your terminal
//!
//! # Usage
//!
//! ```bash
//! # Interactive detail screens
//! cinefetch view 438631
//!
//! # CLI mode (for automation)
//! cinefetch info 438631 --json
//! cinefetch poster 438631
//! ```

use std::io::{stdout, Stdout};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, widgets::Clear, Frame, Terminal};

use cinefetch::app::{App, MovieScreen};
use cinefetch::cli::{self, Cli, Command, ExitCode, Output, ViewCmd};
use cinefetch::config::Config;
use cinefetch::{commands, logging, ui};

/// Terminal type alias for convenience
type Tui = Terminal<CrosstermBackend<Stdout>>;

const TICK_RATE: Duration = Duration::from_millis(100);

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if cli.is_tui_mode() {
        logging::init_tui();
    } else {
        logging::init_cli(cli.quiet);
    }

    let exit_code = run(cli).await;
    std::process::exit(exit_code.into());
}

/// Run the selected command and return its exit code
async fn run(cli: Cli) -> ExitCode {
    let output = Output::new(&cli);
    let config = commands::load_config(cli.config.as_deref());

    match cli.command {
        Command::Info(mut cmd) => {
            match cli::validate_movie_id(&cmd.id) {
                Ok(id) => cmd.id = id.to_string(),
                Err(e) => return output.error(e, ExitCode::InvalidArgs),
            }
            commands::info_cmd(cmd, &config, &output).await
        }

        Command::Poster(mut cmd) => {
            match cli::validate_movie_id(&cmd.id) {
                Ok(id) => cmd.id = id.to_string(),
                Err(e) => return output.error(e, ExitCode::InvalidArgs),
            }
            commands::poster_cmd(cmd, &config, &output).await
        }

        Command::Config(cmd) => commands::config_cmd(cmd, cli.config.as_deref(), &output),

        Command::View(cmd) => {
            if let Some(bad) = cmd.ids.iter().find(|id| cli::validate_movie_id(id).is_err()) {
                return output.error(
                    format!("Invalid TMDB movie ID: {}", bad),
                    ExitCode::InvalidArgs,
                );
            }

            let client = match commands::tmdb_client(&config, &output) {
                Ok(client) => Arc::new(client),
                Err(code) => return code,
            };

            match run_tui(cmd, client, &config).await {
                Ok(()) => ExitCode::Success,
                Err(e) => output.error(format!("{:#}", e), ExitCode::Error),
            }
        }
    }
}

// =============================================================================
// TUI Mode
// =============================================================================

/// Initialize the terminal for TUI mode
fn init_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore terminal to normal state
fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Open one screen per id (last on top) and run until the last one closes
async fn run_tui<S>(cmd: ViewCmd, source: Arc<S>, config: &Config) -> Result<()>
where
    S: cinefetch::api::MovieSource + 'static,
{
    let mut app = App::new().with_posters(config.image_base_url(), config.poster_size());
    for id in &cmd.ids {
        app.open(MovieScreen::open(Arc::clone(&source), id.trim()));
    }

    let mut terminal = init_terminal()?;
    let result = run_event_loop(&mut terminal, &mut app).await;

    // Always restore terminal, even on error
    restore_terminal(&mut terminal)?;
    app.quit();

    result
}

/// Main event loop - handles input, updates state, renders UI
async fn run_event_loop(terminal: &mut Tui, app: &mut App) -> Result<()> {
    while app.running {
        terminal.draw(|frame| render_ui(frame, app))?;

        // Fetches settle on runtime workers; redraw every tick to pick them up
        let polled = tokio::task::block_in_place(|| event::poll(TICK_RATE))?;
        if polled {
            if let Event::Key(key) = event::read()? {
                // Only handle key press events (ignore releases on Windows)
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }
    }

    Ok(())
}

fn render_ui(frame: &mut Frame, app: &App) {
    let area = frame.area();
    frame.render_widget(Clear, area);
    ui::detail::render(frame, area, app);
}
