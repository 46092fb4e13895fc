//! Structured logging setup
//!
//! Log lines go to stderr so that command output on stdout stays parseable.
//! `RUST_LOG` adds directives on top of the configured level; without it,
//! the HTTP stack is held at `warn`.

use std::env;
use std::sync::Once;
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static INIT: Once = Once::new();

/// Configuration for logging initialization
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Minimum level for this crate's own events
    pub level: Level,

    /// Include the module target (e.g. `larder::core::pantry`)
    pub include_target: bool,

    /// Include file and line number information
    pub include_location: bool,
}

impl Default for LoggingConfig {
    /// WARN level, targets shown, locations hidden
    fn default() -> Self {
        Self {
            level: Level::WARN,
            include_target: true,
            include_location: false,
        }
    }
}

impl LoggingConfig {
    pub fn with_level(level: Level) -> Self {
        Self {
            level,
            ..Default::default()
        }
    }

    /// Level from the CLI flags: each `-v` raises it one step, `--quiet`
    /// drops to errors only, otherwise `configured` or WARN
    pub fn from_flags(verbose: u8, quiet: bool, configured: Option<&str>) -> Self {
        let level = if quiet {
            Level::ERROR
        } else {
            match verbose {
                0 => configured.map(parse_level).unwrap_or(Level::WARN),
                1 => Level::INFO,
                2 => Level::DEBUG,
                _ => Level::TRACE,
            }
        };
        Self {
            level,
            include_location: !quiet && verbose > 2,
            ..Default::default()
        }
    }
}

/// Parse a level name, case-insensitive; unknown names mean WARN
pub fn parse_level(level: &str) -> Level {
    match level.trim().to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" | "warning" => Level::WARN,
        "error" => Level::ERROR,
        other => {
            eprintln!(
                "Invalid log level '{}', defaulting to WARN. Valid levels: trace, debug, info, warn, error",
                other
            );
            Level::WARN
        }
    }
}

fn build_filter(config: &LoggingConfig) -> EnvFilter {
    let mut filter = EnvFilter::from_default_env();
    if let Ok(directive) = format!("larder={}", config.level).parse() {
        filter = filter.add_directive(directive);
    }

    if env::var("RUST_LOG").is_err() {
        for quiet in ["h2=warn", "hyper=warn", "hyper_util=warn", "reqwest=warn"] {
            if let Ok(directive) = quiet.parse() {
                filter = filter.add_directive(directive);
            }
        }
    }
    filter
}

/// Install the global subscriber; later calls are ignored
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        tracing_subscriber::registry()
            .with(build_filter(&config))
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(config.include_target)
                    .with_file(config.include_location)
                    .with_line_number(config.include_location),
            )
            .init();
    });
}
