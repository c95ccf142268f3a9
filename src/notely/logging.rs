//! Tracing subscriber setup for the `notely` binary.
//!
//! # Filter priority (highest to lowest)
//!
//! 1. `NOTELY_LOG` env var (e.g. `notely=debug,warn`)
//! 2. `RUST_LOG`
//! 3. `--verbose` flag (debug for this crate)
//! 4. Default: `warn`
//!
//! One-shot commands log to stderr. The terminal UI owns the screen, so it
//! logs to a file instead.

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use crate::error::Result;

pub const LOG_ENV: &str = "NOTELY_LOG";
pub const LOG_FILENAME: &str = "notely.log";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Normal,
    Verbose,
}

impl Verbosity {
    pub fn from_flag(verbose: bool) -> Self {
        if verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Normal
        }
    }

    fn default_directive(self) -> &'static str {
        match self {
            Verbosity::Normal => "warn",
            Verbosity::Verbose => "notely=debug,warn",
        }
    }
}

/// Build the filter: `NOTELY_LOG` > `RUST_LOG` > verbosity default.
/// Unparseable env values fall through rather than failing.
pub fn build_env_filter(verbosity: Verbosity) -> EnvFilter {
    if let Ok(directives) = std::env::var(LOG_ENV) {
        if let Ok(filter) = EnvFilter::try_new(&directives) {
            return filter;
        }
    }
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    EnvFilter::new(verbosity.default_directive())
}

/// Compact stderr logging for one-shot commands.
pub fn init_stderr(verbosity: Verbosity) {
    let use_ansi = std::io::IsTerminal::is_terminal(&std::io::stderr());
    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(use_ansi)
        .with_target(verbosity == Verbosity::Verbose)
        .without_time()
        .compact();

    // Ignore double-init: tests and embedding callers may have set one already.
    let _ = tracing_subscriber::registry()
        .with(build_env_filter(verbosity))
        .with(layer)
        .try_init();
}

/// File logging for the terminal UI. Returns the log path. The file is
/// truncated at each start.
pub fn init_file(verbosity: Verbosity, dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(LOG_FILENAME);
    let file: File = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&path)?;

    let layer = fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .with_timer(fmt::time::uptime());

    let _ = tracing_subscriber::registry()
        .with(build_env_filter(verbosity))
        .with(layer)
        .try_init();
    Ok(path)
}
