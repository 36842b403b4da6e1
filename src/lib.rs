//! cinefetch - movie details in your terminal
//!
//! Built around [`UseFetch`], a handle that runs an async producer and keeps
//! a `{data, loading, error}` snapshot of its latest outcome.
//!
//! # Modules
//!
//! - `fetch` - `UseFetch` request-state wrapper
//! - `models` - TMDB movie record and display helpers
//! - `api` - TMDB client
//! - `app` - Screen stack and "go back" navigation
//! - `ui` - TUI components
//! - `cli` / `commands` - Scriptable command line
//! - `config` / `logging` - Config file and tracing setup

pub mod api;
pub mod app;
pub mod cli;
pub mod commands;
pub mod config;
pub mod fetch;
pub mod logging;
pub mod models;
pub mod ui;

// Re-export commonly used types
pub use api::{MovieSource, TmdbClient, TmdbError};
pub use app::{App, MovieScreen, Navigator};
pub use fetch::{FetchError, FetchState, Phase, UseFetch};
pub use models::{MovieRecord, Named};
