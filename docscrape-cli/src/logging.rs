//! Tracing setup for the command-line front end.
//!
//! `DOCSCRAPE_LOG` takes `EnvFilter` directives (e.g. `DOCSCRAPE_LOG=docscrape=debug`)
//! and wins over `-v`. Logs go to stderr so stdout stays free for the summary.

use tracing_subscriber::EnvFilter;

/// Environment variable holding filter directives.
pub const LOG_ENV: &str = "DOCSCRAPE_LOG";

/// Level used when `DOCSCRAPE_LOG` is not set.
#[must_use]
pub fn default_directive(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

fn build_filter(verbose: u8) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)))
}

/// Install the global subscriber. Later calls are no-ops.
pub fn init(verbose: u8) {
    // Err only means a subscriber is already installed.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(build_filter(verbose))
        .with_writer(std::io::stderr)
        .with_target(verbose >= 2)
        .try_init();
}
