//! Logging setup: colored stderr, plus a JSON rolling log file when
//! `LOG_FILE_PATH` is set.

use anyhow::Result;
use std::ffi::OsStr;
use std::path::Path;
use tracing::level_filters::LevelFilter;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// Installs the global subscriber. Keep the returned guard alive until exit
/// so buffered file output is flushed.
pub fn init() -> Result<Option<WorkerGuard>> {
    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(env_filter("RUST_LOG", LevelFilter::INFO)?);

    let (json_layer, guard) = match std::env::var("LOG_FILE_PATH") {
        Ok(log_file_path) if !log_file_path.is_empty() => {
            let path = Path::new(&log_file_path);
            let log_dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or(Path::new("logs"));
            let log_file_name = path
                .file_name()
                .unwrap_or(OsStr::new("feed_checker.log"));

            let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
            let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

            let layer = fmt::layer()
                .json()
                .with_current_span(true)
                .with_span_list(true)
                .with_writer(non_blocking_file)
                .with_filter(env_filter("RUST_LOG_JSON", LevelFilter::DEBUG)?);
            (Some(layer), Some(guard))
        }
        _ => (None, None),
    };

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    Ok(guard)
}

/// Filter from the `var` environment variable, or `default` when it is unset.
fn env_filter(var: &str, default: LevelFilter) -> Result<EnvFilter> {
    directives_filter(std::env::var(var).ok().as_deref(), default)
}

fn directives_filter(directives: Option<&str>, default: LevelFilter) -> Result<EnvFilter> {
    Ok(EnvFilter::builder()
        .with_default_directive(default.into())
        .parse(directives.unwrap_or_default())?)
}
