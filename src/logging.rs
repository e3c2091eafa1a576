use tracing::level_filters::LevelFilter;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Default filter level: `debug` with --verbose, `warn` otherwise
pub fn default_level(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    }
}

/// Install the global subscriber, writing to stderr so stdout stays clean
/// for tables and TSV. `RUST_LOG` directives take precedence over the
/// default level.
pub fn init_logging(verbose: bool) {
    let filter = EnvFilter::builder()
        .with_default_directive(default_level(verbose).into())
        .parse_lossy(std::env::var("RUST_LOG").unwrap_or_default());

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(filter);

    // A second init (tests, embedding) keeps the first subscriber
    let _ = tracing_subscriber::registry().with(stderr_layer).try_init();
}
