//! Tracing setup: subscriber installation and span definitions.

pub mod spans;

use tracing_subscriber::EnvFilter;

use aurora_core::config::ObservabilityConfig;

/// Environment variable holding an `EnvFilter` directive. Wins over config.
pub const ENV_LOG_FILTER: &str = "AURORA_LOG";

/// Install the global subscriber.
///
/// The filter comes from `AURORA_LOG` when set and valid, otherwise from
/// `config.log_level`. Returns `false` if a subscriber was already installed.
pub fn init_tracing(config: &ObservabilityConfig) -> bool {
    let filter = EnvFilter::try_from_env(ENV_LOG_FILTER)
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true);

    if config.json {
        builder
            .json()
            .with_file(true)
            .with_line_number(true)
            .try_init()
            .is_ok()
    } else {
        builder.try_init().is_ok()
    }
}
