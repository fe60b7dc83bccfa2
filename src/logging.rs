use std::io::{self, IsTerminal};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable holding a tracing filter directive.
pub const LOG_ENV: &str = "RIGUP_LOG";

/// Install the global subscriber. `RIGUP_LOG` wins over `--verbose`.
pub fn init(verbose: bool) {
    let layer = fmt::layer()
        .compact()
        .with_target(false)
        .without_time()
        .with_ansi(io::stderr().is_terminal())
        .with_writer(io::stderr);

    tracing_subscriber::registry()
        .with(layer)
        .with(filter(verbose))
        .init();
}

fn filter(verbose: bool) -> EnvFilter {
    let fallback = if verbose { "debug" } else { "info" };
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(fallback))
}
