//! Logging setup
//!
//! Results print to stdout; diagnostics go to stderr so the two can be
//! redirected independently. The `RUST_LOG` environment variable overrides
//! the `--log-level` flag.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub fn init_logging(level: &str) -> color_eyre::Result<()> {
    let default_filter = format!("fincast={level},fincast_core=warn");
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(false),
        )
        .try_init()?;

    Ok(())
}
