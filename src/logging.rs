//! Tracing subscriber setup for the `looporder` binary.
//!
//! Events always go to stderr so stdout only carries the report. The filter
//! comes from `RUST_LOG` when set, otherwise from the verbosity chosen on the
//! command line. `LOOPORDER_LOG_FORMAT` selects `pretty`, `compact` (the
//! default) or `json`.

use std::io::IsTerminal;

use anyhow::Result;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Compact,
    Json,
}

impl LogFormat {
    /// Unknown names fall back to compact.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "pretty" => LogFormat::Pretty,
            "json" => LogFormat::Json,
            _ => LogFormat::Compact,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LogConfig {
    pub format: LogFormat,
    /// Filter directive, e.g. `looporder=debug`.
    pub filter: String,
    pub with_ansi: bool,
}

impl LogConfig {
    /// `verbosity` is the number of `-v` flags minus the number of `-q`
    /// flags; 0 means info.
    pub fn from_env(verbosity: i8) -> Self {
        let format = std::env::var("LOOPORDER_LOG_FORMAT")
            .map(|s| LogFormat::parse(&s))
            .unwrap_or(LogFormat::Compact);

        let filter = std::env::var("RUST_LOG")
            .unwrap_or_else(|_| format!("looporder={}", level_for(verbosity)));

        Self {
            format,
            filter,
            with_ansi: use_ansi(
                std::io::stderr().is_terminal(),
                std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty()),
            ),
        }
    }
}

/// Colour only when stderr is a terminal and `NO_COLOR` isn't set.
fn use_ansi(stderr_is_terminal: bool, no_color: bool) -> bool {
    stderr_is_terminal && !no_color
}

fn level_for(verbosity: i8) -> &'static str {
    match verbosity {
        i8::MIN..=-2 => "error",
        -1 => "warn",
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}

/// Install the global subscriber. Call once, at startup.
pub fn init(config: &LogConfig) -> Result<()> {
    let filter = EnvFilter::try_new(&config.filter)?;

    let layer = match config.format {
        LogFormat::Pretty => fmt::layer()
            .pretty()
            .with_writer(std::io::stderr)
            .with_ansi(config.with_ansi)
            .with_filter(filter)
            .boxed(),
        LogFormat::Compact => fmt::layer()
            .compact()
            .with_writer(std::io::stderr)
            .with_ansi(config.with_ansi)
            .with_target(false)
            .with_filter(filter)
            .boxed(),
        LogFormat::Json => fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_filter(filter)
            .boxed(),
    };

    tracing_subscriber::registry().with(layer).try_init()?;
    Ok(())
}
