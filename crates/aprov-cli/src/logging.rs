use aprov_core::config::LogLevel;
use tracing_subscriber::EnvFilter;

/// Installs the stderr subscriber. `APROV_LOG` overrides the configured level.
pub fn init(level: LogLevel) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_env("APROV_LOG")
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,aprov={}", level.as_filter())));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {}", e))
}
