//! Tracing initialization.

use tracing_subscriber::{EnvFilter, prelude::*};

/// Environment variable holding the log filter directives.
pub const LOG_ENV: &str = "NAME_LAUNCH_LOG";

const QUIET_FILTER: &str = "name_launch=warn";
const VERBOSE_FILTER: &str = "name_launch=info";

/// Filter directives used when `NAME_LAUNCH_LOG` is unset or invalid.
pub fn default_filter(verbose: bool) -> &'static str {
    if verbose { VERBOSE_FILTER } else { QUIET_FILTER }
}

/// Initialize tracing to stderr. Call once at process startup.
pub fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(false),
        )
        .try_init();
}
