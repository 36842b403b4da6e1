//! CLI - Command Line Interface for cinefetch
//!
//! Every command is scriptable; `--json` (or a non-TTY stdout) switches
//! output to a JSON envelope.
//!
//! # Examples
//!
//! ```bash
//! # Movie details as text or JSON
//! cinefetch info 438631
//! cinefetch info 438631 --json
//!
//! # Poster link
//! cinefetch poster 438631 --size original
//!
//! # Interactive detail screens (Esc walks back through them)
//! cinefetch view 603 438631
//! ```

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::fmt;
use std::io::IsTerminal;
use std::path::PathBuf;

// =============================================================================
// Exit Codes
// =============================================================================

/// Exit codes for CLI operations (semantic for scripting)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success
    Success = 0,
    /// General error
    Error = 1,
    /// Invalid arguments
    InvalidArgs = 2,
    /// Network error
    NetworkError = 3,
    /// Movie not found
    NotFound = 4,
    /// Missing or unusable configuration
    ConfigError = 5,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> std::process::ExitCode {
        std::process::ExitCode::from(code as u8)
    }
}

// =============================================================================
// Main CLI Structure
// =============================================================================

/// cinefetch - movie details in your terminal
#[derive(Parser, Debug)]
#[command(
    name = "cinefetch",
    version,
    about = "Movie details in your terminal, backed by TMDB",
    after_help = "EXAMPLES:\n\
                  cinefetch info 438631             Print movie details\n\
                  cinefetch poster 438631           Print the poster URL\n\
                  cinefetch view 603 438631         Browse details interactively"
)]
pub struct Cli {
    /// Output format as JSON (default for non-TTY)
    #[arg(long, short = 'j', global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Path to config file
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Check if JSON output should be used
    pub fn should_json(&self) -> bool {
        self.json || !std::io::stdout().is_terminal()
    }

    /// Whether this invocation takes over the terminal
    pub fn is_tui_mode(&self) -> bool {
        matches!(self.command, Command::View(_))
    }
}

// =============================================================================
// Subcommands
// =============================================================================

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print details for a movie
    #[command(visible_alias = "i")]
    Info(InfoCmd),

    /// Print the poster URL for a movie
    #[command(visible_alias = "p")]
    Poster(PosterCmd),

    /// Open interactive detail screens
    #[command(visible_alias = "v")]
    View(ViewCmd),

    /// Show or update the config file
    Config(ConfigCmd),
}

/// Get detailed information about a movie
#[derive(Args, Debug)]
pub struct InfoCmd {
    /// TMDB movie ID (e.g., 438631)
    #[arg(required = true)]
    pub id: String,
}

/// Get the poster URL for a movie
#[derive(Args, Debug)]
pub struct PosterCmd {
    /// TMDB movie ID (e.g., 438631)
    #[arg(required = true)]
    pub id: String,

    /// Poster width (w92, w154, w185, w342, w500, w780, original)
    #[arg(long, short = 's')]
    pub size: Option<String>,
}

/// Browse one or more movies; the last ID is shown first
#[derive(Args, Debug)]
pub struct ViewCmd {
    /// TMDB movie IDs
    #[arg(required = true, num_args = 1..)]
    pub ids: Vec<String>,
}

/// Show or update the config file
#[derive(Args, Debug)]
pub struct ConfigCmd {
    /// Store a TMDB API read token
    #[arg(long)]
    pub api_key: Option<String>,

    /// Store a default poster width
    #[arg(long)]
    pub poster_size: Option<String>,

    /// Store a request timeout in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,
}

impl ConfigCmd {
    /// True when no field is being changed (just print the config)
    pub fn is_show(&self) -> bool {
        self.api_key.is_none() && self.poster_size.is_none() && self.timeout_secs.is_none()
    }
}

// =============================================================================
// JSON Output Types
// =============================================================================

/// Envelope for every JSON response
#[derive(Debug, Serialize)]
pub struct JsonOutput<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "is_zero")]
    pub exit_code: i32,
}

fn is_zero(n: &i32) -> bool {
    *n == 0
}

impl<T: Serialize> JsonOutput<T> {
    /// Create success output with data
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            exit_code: 0,
        }
    }
}

impl JsonOutput<()> {
    /// Create error output (no data)
    pub fn error_msg(msg: impl Into<String>, code: ExitCode) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(msg.into()),
            exit_code: code.into(),
        }
    }
}

/// Poster command response
#[derive(Debug, Serialize)]
pub struct PosterResponse {
    pub id: String,
    pub url: Option<String>,
}

// =============================================================================
// Output Helpers
// =============================================================================

/// Output handler for consistent formatting
pub struct Output {
    pub json: bool,
    pub quiet: bool,
}

impl Output {
    pub fn new(cli: &Cli) -> Self {
        Self {
            json: cli.should_json(),
            quiet: cli.quiet,
        }
    }

    /// Print `data` as JSON, or `text` for humans
    pub fn print<T: Serialize>(&self, data: T, text: impl fmt::Display) -> anyhow::Result<()> {
        if self.json {
            let output = JsonOutput::success(data);
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            println!("{}", text);
        }
        Ok(())
    }

    /// Print error and return exit code
    pub fn error(&self, msg: impl Into<String>, code: ExitCode) -> ExitCode {
        let msg = msg.into();
        tracing::debug!(code = i32::from(code), "{}", msg);
        if self.json {
            let output = JsonOutput::error_msg(&msg, code);
            if let Ok(json) = serde_json::to_string_pretty(&output) {
                eprintln!("{}", json);
            }
        } else if !self.quiet {
            eprintln!("Error: {}", msg);
        }
        code
    }

    /// Print info message (suppressed in quiet mode)
    pub fn info(&self, msg: impl fmt::Display) {
        if !self.quiet && !self.json {
            eprintln!("{}", msg);
        }
    }
}

// =============================================================================
// Movie ID Validation
// =============================================================================

/// Validate a TMDB movie ID (ASCII digits only)
pub fn validate_movie_id(id: &str) -> Result<&str, &'static str> {
    let id = id.trim();
    if !id.is_empty() && id.chars().all(|c| c.is_ascii_digit()) {
        Ok(id)
    } else {
        Err("Invalid TMDB movie ID (expected digits, e.g. 438631)")
    }
}

// =============================================================================
// Tests
// =============================================================================
