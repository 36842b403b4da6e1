//! Tracing setup
//!
//! The TUI owns stdout, so interactive mode only logs when `CINEFETCH_LOG`
//! names a file. CLI commands log to stderr. `RUST_LOG` picks the level
//! (default `info`, or `warn` with `--quiet`).

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable naming the TUI log file
pub const LOG_FILE_ENV: &str = "CINEFETCH_LOG";

fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Log to stderr for one-shot CLI commands
pub fn init_cli(quiet: bool) {
    let filter = env_filter(if quiet { "warn" } else { "info" });

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time(),
        )
        .try_init();
}

/// Log to the file named by `CINEFETCH_LOG`, or not at all
pub fn init_tui() {
    let Some(path) = std::env::var_os(LOG_FILE_ENV) else {
        return;
    };

    let file = match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
    {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Warning: cannot open log file {:?}: {}", path, e);
            return;
        }
    };

    let _ = tracing_subscriber::registry()
        .with(env_filter("info"))
        .with(
            fmt::layer()
                .with_writer(std::sync::Mutex::new(file))
                .with_ansi(false)
                .with_target(true),
        )
        .try_init();

    tracing::info!("Initialized logs");
}
