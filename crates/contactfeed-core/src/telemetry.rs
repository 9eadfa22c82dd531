use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing with an env-based filter.
///
/// - Reads `RUST_LOG` for level directives (e.g., "info", "debug,contactfeed_core=trace").
/// - `verbose` raises the default level from `info` to `debug`.
/// - Writes to stderr; stdout carries the rendered results.
///
/// Safe to call multiple times; subsequent calls are no-ops.
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let fmt_layer = fmt::layer()
        .with_target(true)
        .with_writer(std::io::stderr)
        .compact();

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
