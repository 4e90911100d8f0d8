use tracing_subscriber::{filter::LevelFilter, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log target of the `send-tips` binary.
const BIN_TARGET: &str = "send_tips";

/// Directives used when `RUST_LOG` is unset: dependencies log at `info`,
/// this crate and its binary at `log_level`.
fn default_directives(log_level: LevelFilter) -> String {
    let crate_name = env!("CARGO_CRATE_NAME");
    format!("info,{crate_name}={log_level},{BIN_TARGET}={log_level}")
}

/// Install the global subscriber. `RUST_LOG` takes precedence over
/// `log_level`.
pub fn init_logging(log_level: LevelFilter) -> anyhow::Result<()> {
    let filter = if std::env::var(EnvFilter::DEFAULT_ENV).is_ok() {
        EnvFilter::builder().from_env_lossy()
    } else {
        default_directives(log_level).parse()?
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(filter)
        .init();

    Ok(())
}
