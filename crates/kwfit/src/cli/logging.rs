//! Tracing subscriber setup.
//!
//! Logs go to stderr so they never mix with command output. `KWFIT_LOG` takes an
//! `EnvFilter` directive string; without it the level comes from `-v`. Setting
//! `KWFIT_LOG_FORMAT=json` switches to one JSON object per event.

use std::{env, io};

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Filter directive variable.
pub const LOG_ENV: &str = "KWFIT_LOG";

/// Output format variable.
pub const LOG_FORMAT_ENV: &str = "KWFIT_LOG_FORMAT";

/// Maps the `-v` count to a default level.
pub fn level_for(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Builds the event filter, preferring `KWFIT_LOG` over the verbosity default.
fn filter(verbose: u8) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(level_for(verbose).into())
        .with_env_var(LOG_ENV)
        .from_env_lossy()
}

/// Installs the global subscriber. Safe to call once per process.
pub fn init(verbose: u8) {
    let use_json = env::var(LOG_FORMAT_ENV).is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    let installed = if use_json {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_writer(io::stderr),
            )
            .with(filter(verbose))
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer().with_target(false).with_writer(io::stderr))
            .with(filter(verbose))
            .try_init()
    };

    if let Err(e) = installed {
        eprintln!("warning: could not install logger: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_levels() {
        assert_eq!(level_for(0), LevelFilter::WARN);
        assert_eq!(level_for(1), LevelFilter::INFO);
        assert_eq!(level_for(2), LevelFilter::DEBUG);
        assert_eq!(level_for(9), LevelFilter::TRACE);
    }
}
