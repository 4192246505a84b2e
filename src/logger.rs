use crate::config::Config;
use anyhow::Context;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    filter::{
        EnvFilter,
        LevelFilter,
    },
    layer::SubscriberExt,
};

/// Set up the logger.
///
/// Logs go to the stderr and to a daily log file in the log file dir.
/// `RUST_LOG` overrides the default `info` level.
/// The returned guard must be held until shutdown, or buffered file logs may be lost.
pub fn setup(config: &Config) -> anyhow::Result<WorkerGuard> {
    let file_appender = tracing_appender::rolling::daily(config.log_file_dir(), "jackal.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env()
        .context("invalid RUST_LOG")?;
    let stderr_formatting_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
    let file_formatting_layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_writer(file_writer);

    let subscriber = tracing_subscriber::Registry::default()
        .with(env_filter)
        .with(file_formatting_layer)
        .with(stderr_formatting_layer);

    tracing::subscriber::set_global_default(subscriber).context("failed to set subscriber")?;

    Ok(guard)
}
