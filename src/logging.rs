use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

pub const LOG_ENV: &str = "BUSY_SCHEDULE_LOG";

// Aggregation warnings already reach stderr through the CLI.
const DEFAULT_FILTER: &str = "error";

/// Install a stderr subscriber. `BUSY_SCHEDULE_LOG` takes the usual `EnvFilter` directives.
pub fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let format = fmt::format().compact().without_time().with_target(false);

    // a second init (tests, embedding) keeps the first subscriber
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().event_format(format).with_writer(std::io::stderr))
        .with(filter)
        .try_init();
}
