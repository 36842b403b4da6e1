//! App state and core application logic
//!
//! Manages the stack of open movie screens, the "go back" navigation
//! action, and keyboard handling for the detail view.

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::task::JoinHandle;

use crate::api::tmdb::{self, movie_details_producer, MovieSource};
use crate::fetch::{FetchState, Phase, UseFetch};
use crate::models::MovieRecord;

// =============================================================================
// Navigation
// =============================================================================

/// The "go back" primitive used by screens
pub trait Navigator {
    /// Leave the current screen. Has no return value; effects are UI-only.
    fn go_back(&mut self);
}

// =============================================================================
// Movie Screen
// =============================================================================

/// One open movie detail screen and the fetch backing it
#[derive(Debug)]
pub struct MovieScreen {
    /// TMDB id as typed by the user
    pub id: String,
    /// Scroll offset for the info panel
    pub scroll: u16,
    fetch: UseFetch<MovieRecord>,
}

impl MovieScreen {
    /// Open a screen for `id` and start loading it right away.
    ///
    /// Must be called from within a tokio runtime.
    pub fn open<S>(source: Arc<S>, id: impl Into<String>) -> Self
    where
        S: MovieSource + 'static,
    {
        let id = id.into();
        let fetch = UseFetch::new(movie_details_producer(source, id.clone()), true);
        Self::with_fetch(id, fetch)
    }

    /// Build a screen around an existing fetch handle
    pub fn with_fetch(id: impl Into<String>, fetch: UseFetch<MovieRecord>) -> Self {
        Self {
            id: id.into(),
            scroll: 0,
            fetch,
        }
    }

    pub fn state(&self) -> FetchState<MovieRecord> {
        self.fetch.snapshot()
    }

    pub fn phase(&self) -> Phase {
        self.fetch.phase()
    }

    pub fn fetch(&self) -> &UseFetch<MovieRecord> {
        &self.fetch
    }

    /// Load the movie again
    pub fn retry(&self) -> JoinHandle<()> {
        tracing::info!(id = %self.id, "reloading movie");
        self.fetch.spawn_fetch()
    }

    /// Stop listening for results; late responses are dropped
    pub fn close(&self) {
        self.fetch.dispose();
    }

    pub fn scroll_up(&mut self) {
        self.scroll = self.scroll.saturating_sub(1);
    }

    pub fn scroll_down(&mut self) {
        self.scroll = self.scroll.saturating_add(1);
    }
}

// =============================================================================
// Main Application State
// =============================================================================

/// Main application state
#[derive(Debug)]
pub struct App {
    /// Open screens, current one last
    pub screens: Vec<MovieScreen>,
    /// Whether the app is running
    pub running: bool,
    /// TMDB image CDN root for poster links
    pub image_base_url: String,
    /// Poster width segment, e.g. "w500"
    pub poster_size: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            screens: Vec::new(),
            running: true,
            image_base_url: tmdb::DEFAULT_IMAGE_BASE_URL.to_string(),
            poster_size: tmdb::DEFAULT_POSTER_SIZE.to_string(),
        }
    }
}

impl App {
    /// Create a new App instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different image CDN and poster size
    pub fn with_posters(
        mut self,
        image_base_url: impl Into<String>,
        size: impl Into<String>,
    ) -> Self {
        self.image_base_url = image_base_url.into();
        self.poster_size = size.into();
        self
    }

    /// Push a screen on top of the stack
    pub fn open(&mut self, screen: MovieScreen) {
        tracing::debug!(id = %screen.id, depth = self.screens.len() + 1, "open screen");
        self.screens.push(screen);
    }

    pub fn current(&self) -> Option<&MovieScreen> {
        self.screens.last()
    }

    pub fn current_mut(&mut self) -> Option<&mut MovieScreen> {
        self.screens.last_mut()
    }

    /// Poster link for the current screen, once its data has arrived
    pub fn poster_url(&self) -> Option<String> {
        let screen = self.current()?;
        screen.fetch().with_state(|state| {
            let movie = state.data.as_ref()?;
            tmdb::poster_url(
                &self.image_base_url,
                &self.poster_size,
                movie.poster_path.as_deref(),
            )
        })
    }

    /// Quit the application, discarding every open screen
    pub fn quit(&mut self) {
        for screen in self.screens.drain(..) {
            screen.close();
        }
        self.running = false;
    }

    // -------------------------------------------------------------------------
    // Keyboard Event Handling
    // -------------------------------------------------------------------------

    /// Handle keyboard event, returns true if event was consumed
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.quit();
            return true;
        }

        match key.code {
            KeyCode::Esc | KeyCode::Backspace | KeyCode::Left | KeyCode::Char('q') => {
                self.go_back();
                true
            }
            KeyCode::Char('r') => match self.current() {
                Some(screen) if screen.phase() != Phase::Loading => {
                    screen.retry();
                    true
                }
                _ => false,
            },
            KeyCode::Up | KeyCode::Char('k') => match self.current_mut() {
                Some(screen) => {
                    screen.scroll_up();
                    true
                }
                None => false,
            },
            KeyCode::Down | KeyCode::Char('j') => match self.current_mut() {
                Some(screen) => {
                    screen.scroll_down();
                    true
                }
                None => false,
            },
            _ => false,
        }
    }
}

impl Navigator for App {
    fn go_back(&mut self) {
        if let Some(screen) = self.screens.pop() {
            tracing::debug!(id = %screen.id, "leaving screen");
            screen.close();
        }

        if self.screens.is_empty() {
            self.running = false;
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
