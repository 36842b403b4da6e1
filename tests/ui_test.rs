//! Detail screen rendering and navigation tests
//!
//! Renders the app into a ratatui `TestBackend` and drives it with key events.

use std::future::Future;
use std::sync::Arc;

use cinefetch::api::{MovieSource, TmdbError};
use cinefetch::app::{App, MovieScreen, Navigator};
use cinefetch::fetch::{FetchError, UseFetch};
use cinefetch::models::{MovieRecord, Named};
use cinefetch::ui::detail;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};
use ratatui::{backend::TestBackend, Terminal};

/// In-memory movie lookup
struct Catalog;

impl MovieSource for Catalog {
    fn movie_details(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<MovieRecord, TmdbError>> + Send {
        let result = match id {
            "438631" => Ok(dune()),
            "603" => Ok(MovieRecord {
                id: Some(603),
                title: Some("The Matrix".into()),
                release_date: Some("1999-03-30".into()),
                ..Default::default()
            }),
            _ => Err(TmdbError::NotFound),
        };
        async move { result }
    }
}

fn dune() -> MovieRecord {
    MovieRecord {
        id: Some(438631),
        title: Some("Dune".into()),
        poster_path: Some("/d5NXSklXo0qyIYkgV94XAgMIckC.jpg".into()),
        release_date: Some("2021-09-15".into()),
        runtime: Some(155),
        vote_average: Some(7.8),
        vote_count: Some(9000),
        overview: Some("Paul Atreides leads nomadic tribes.".into()),
        genres: vec![Named::new("Science Fiction"), Named::new("Adventure")],
        budget: Some(165_000_000),
        revenue: None,
        production_companies: vec![Named::new("Legendary Pictures")],
    }
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent {
        code,
        modifiers: KeyModifiers::NONE,
        kind: KeyEventKind::Press,
        state: KeyEventState::NONE,
    }
}

/// Render `app` and return the screen as lines of text
fn render(app: &App, width: u16, height: u16) -> Vec<String> {
    let backend = TestBackend::new(width, height);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| detail::render(frame, frame.area(), app))
        .unwrap();

    let buffer = terminal.backend().buffer();
    (0..buffer.area.height)
        .map(|y| {
            (0..buffer.area.width)
                .map(|x| buffer[(x, y)].symbol().to_string())
                .collect::<String>()
        })
        .collect()
}

fn screen_text(app: &App) -> String {
    render(app, 100, 40).join("\n")
}

async fn open_settled(app: &mut App, id: &str) {
    let screen = MovieScreen::open(Arc::new(Catalog), id);
    screen.fetch().settled().await;
    app.open(screen);
}

// =============================================================================
// Rendering
// =============================================================================

#[tokio::test]
async fn test_render_loaded_movie() {
    let mut app = App::new();
    open_settled(&mut app, "438631").await;

    let text = screen_text(&app);
    assert!(text.contains("MOVIE 438631"));
    assert!(text.contains(
        "Poster: https://image.tmdb.org/t/p/w500/d5NXSklXo0qyIYkgV94XAgMIckC.jpg"
    ));
    assert!(text.contains("Dune"));
    assert!(text.contains("2021  155m"));
    assert!(text.contains("8/10"));
    assert!(text.contains("(9000 votes)"));
    assert!(text.contains("Science Fiction - Adventure"));
    assert!(text.contains("$165.0 million"));
    assert!(text.contains("Legendary Pictures"));
    assert!(text.contains("← Go back"));
}

#[tokio::test]
async fn test_render_missing_fields_as_na() {
    let mut app = App::new();
    open_settled(&mut app, "603").await;

    let text = screen_text(&app);
    assert!(text.contains("The Matrix"));
    assert!(text.contains("1999  N/A"));
    assert!(text.contains("Poster: N/A"));
    assert!(text.contains("0/10"));
}

#[tokio::test]
async fn test_render_loading_state() {
    let fetch = UseFetch::new(
        || futures::future::pending::<Result<MovieRecord, FetchError>>(),
        false,
    );
    let _pending = fetch.fetch();

    let mut app = App::new();
    app.open(MovieScreen::with_fetch("438631", fetch));

    let text = screen_text(&app);
    assert!(text.contains("Loading movie..."));
    assert!(!text.contains("Poster:"));
}

#[tokio::test]
async fn test_render_not_found() {
    let mut app = App::new();
    open_settled(&mut app, "1").await;

    let text = screen_text(&app);
    assert!(text.contains("✗ Not found: Resource not found (404)"));
    assert!(text.contains("Press r to retry"));
}

#[test]
fn test_render_without_screens() {
    let app = App::new();
    let text = screen_text(&app);
    assert!(text.contains("No movie open"));
}

#[tokio::test]
async fn test_render_small_terminal() {
    let mut app = App::new();
    open_settled(&mut app, "438631").await;

    let lines = render(&app, 20, 6);
    assert_eq!(lines.len(), 6);
}

// =============================================================================
// Navigation
// =============================================================================

#[tokio::test]
async fn test_go_back_walks_the_stack() {
    let mut app = App::new();
    open_settled(&mut app, "603").await;
    open_settled(&mut app, "438631").await;

    assert!(screen_text(&app).contains("Dune"));

    app.handle_key(key(KeyCode::Esc));
    assert!(app.running);
    assert!(screen_text(&app).contains("The Matrix"));

    app.go_back();
    assert!(!app.running);
    assert!(app.screens.is_empty());
}

#[tokio::test]
async fn test_retry_after_failure() {
    let mut app = App::new();
    open_settled(&mut app, "1").await;

    assert!(app.handle_key(key(KeyCode::Char('r'))));
    let screen = app.current().unwrap();
    screen.fetch().settled().await;

    assert!(screen.state().error.unwrap().is_not_found());
}

#[tokio::test]
async fn test_scroll_moves_content() {
    let mut app = App::new();
    open_settled(&mut app, "438631").await;

    let before = render(&app, 100, 40);
    app.handle_key(key(KeyCode::Down));
    app.handle_key(key(KeyCode::Down));
    assert_eq!(app.current().unwrap().scroll, 2);

    let after = render(&app, 100, 40);
    assert_ne!(before, after);
}
