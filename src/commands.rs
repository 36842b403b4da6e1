//! CLI Command Handlers
//!
//! Each handler takes its parsed args, the loaded config and an Output,
//! and returns an ExitCode.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;

use crate::api::{movie_details_producer, poster_url, MovieSource, TmdbClient};
use crate::cli::{ConfigCmd, ExitCode, InfoCmd, Output, PosterCmd, PosterResponse};
use crate::config::Config;
use crate::fetch::{FetchError, FetchState, UseFetch};
use crate::models::{MovieRecord, NOT_AVAILABLE};

// =============================================================================
// Shared Setup
// =============================================================================

/// Load config from `--config` when given, else the default location
pub fn load_config(path: Option<&Path>) -> Config {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

/// Build a TMDB client from config, or report why we can't
pub fn tmdb_client(config: &Config, output: &Output) -> Result<TmdbClient, ExitCode> {
    let api_key = config
        .tmdb_api_key()
        .map_err(|e| output.error(e.to_string(), ExitCode::ConfigError))?;

    Ok(TmdbClient::with_base_url(api_key, config.api_base_url()).with_timeout(config.timeout()))
}

/// Exit code for a failed fetch
pub fn fetch_exit_code(err: &FetchError) -> ExitCode {
    match err {
        FetchError::NotFound(_) => ExitCode::NotFound,
        FetchError::Misuse(_) => ExitCode::InvalidArgs,
        FetchError::Transport(_) => ExitCode::NetworkError,
    }
}

/// Run one lookup through a [`UseFetch`] and return its settled snapshot
pub async fn fetch_movie<S>(source: Arc<S>, id: &str) -> FetchState<MovieRecord>
where
    S: MovieSource + 'static,
{
    let fetch = UseFetch::new(movie_details_producer(source, id), true);
    fetch.settled().await;
    fetch.snapshot()
}

/// Settled snapshot into the record, or the error already reported
fn into_movie(state: FetchState<MovieRecord>, output: &Output) -> Result<MovieRecord, ExitCode> {
    match state {
        FetchState { error: Some(err), .. } => {
            Err(output.error(err.to_string(), fetch_exit_code(&err)))
        }
        FetchState { data: Some(movie), .. } => Ok(movie),
        _ => Err(output.error("No data returned", ExitCode::Error)),
    }
}

// =============================================================================
// Info Command
// =============================================================================

/// JSON shape of `info`: the TMDB record plus a resolved poster link
#[derive(Debug, Serialize)]
pub struct MovieInfo {
    #[serde(flatten)]
    pub movie: MovieRecord,
    pub poster_url: Option<String>,
}

/// Labelled text block for `info`
pub fn info_text(movie: &MovieRecord, poster: Option<&str>) -> String {
    let mut lines = vec![movie.to_string()];
    lines.push(format!("Poster: {}", poster.unwrap_or(NOT_AVAILABLE)));
    lines.push(format!("Votes: {}", movie.votes_label()));
    for (label, value) in movie.info_rows() {
        lines.push(String::new());
        lines.push(format!("{}:", label));
        lines.push(value);
    }
    lines.join("\n")
}

pub async fn info_cmd(cmd: InfoCmd, config: &Config, output: &Output) -> ExitCode {
    let client = match tmdb_client(config, output) {
        Ok(client) => Arc::new(client),
        Err(code) => return code,
    };

    output.info(format!("Getting info for: {}", cmd.id));

    let movie = match into_movie(fetch_movie(client, &cmd.id).await, output) {
        Ok(movie) => movie,
        Err(code) => return code,
    };

    let poster = poster_url(
        config.image_base_url(),
        config.poster_size(),
        movie.poster_path.as_deref(),
    );
    let text = info_text(&movie, poster.as_deref());
    let info = MovieInfo {
        movie,
        poster_url: poster,
    };

    if let Err(e) = output.print(&info, text) {
        return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
    }
    ExitCode::Success
}

// =============================================================================
// Poster Command
// =============================================================================

pub async fn poster_cmd(cmd: PosterCmd, config: &Config, output: &Output) -> ExitCode {
    let client = match tmdb_client(config, output) {
        Ok(client) => Arc::new(client),
        Err(code) => return code,
    };

    let movie = match into_movie(fetch_movie(client, &cmd.id).await, output) {
        Ok(movie) => movie,
        Err(code) => return code,
    };

    let size = cmd.size.as_deref().unwrap_or(config.poster_size());
    let url = poster_url(config.image_base_url(), size, movie.poster_path.as_deref());
    let text = url.clone().unwrap_or_else(|| NOT_AVAILABLE.to_string());

    let response = PosterResponse { id: cmd.id, url };
    if let Err(e) = output.print(&response, text) {
        return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
    }
    ExitCode::Success
}

// =============================================================================
// Config Command
// =============================================================================

/// What `config` reports back; the API key is never echoed
#[derive(Debug, Serialize)]
pub struct ConfigReport {
    pub path: Option<PathBuf>,
    pub api_key_set: bool,
    pub api_base_url: String,
    pub image_base_url: String,
    pub poster_size: String,
    pub timeout_secs: u64,
}

impl ConfigReport {
    fn new(config: &Config, path: Option<PathBuf>) -> Self {
        Self {
            path,
            api_key_set: config.tmdb_api_key().is_ok(),
            api_base_url: config.api_base_url(),
            image_base_url: config.image_base_url().to_string(),
            poster_size: config.poster_size().to_string(),
            timeout_secs: config.timeout().as_secs(),
        }
    }

    fn text(&self) -> String {
        let path = self
            .path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());
        format!(
            "Config file:    {}\nAPI key:        {}\nAPI base URL:   {}\nImage base URL: {}\nPoster size:    {}\nTimeout:        {}s",
            path,
            if self.api_key_set { "set" } else { "not set" },
            self.api_base_url,
            self.image_base_url,
            self.poster_size,
            self.timeout_secs,
        )
    }
}

pub fn config_cmd(cmd: ConfigCmd, path: Option<&Path>, output: &Output) -> ExitCode {
    let path = path.map(Path::to_path_buf).or_else(Config::path);
    let mut config = path
        .as_deref()
        .map(Config::load_from)
        .unwrap_or_default();

    if !cmd.is_show() {
        let Some(target) = path.as_deref() else {
            return output.error("Could not determine config path", ExitCode::ConfigError);
        };

        if let Some(key) = cmd.api_key {
            config.tmdb_api_key = Some(key);
        }
        if let Some(size) = cmd.poster_size {
            config.poster_size = Some(size);
        }
        if let Some(secs) = cmd.timeout_secs {
            config.timeout_secs = Some(secs);
        }

        if let Err(e) = config.save_to(target) {
            return output.error(format!("Failed to save config: {:#}", e), ExitCode::ConfigError);
        }
        tracing::info!(path = %target.display(), "config saved");
    }

    let report = ConfigReport::new(&config, path);
    let text = report.text();
    if let Err(e) = output.print(&report, text) {
        return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
    }
    ExitCode::Success
}

// =============================================================================
// Tests
// =============================================================================
