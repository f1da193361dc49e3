use time::{UtcOffset, format_description::well_known::Rfc3339};
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan, time::OffsetTime},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use crate::logger::{LoggerFormat, config::LoggerConfig, error::LoggerError};

/// Build the subscriber for `cfg.format` and install it globally.
pub(crate) fn install(cfg: &LoggerConfig) -> Result<(), LoggerError> {
    let filter = mk_filter(&cfg.level)?;
    let registry = tracing_subscriber::registry().with(filter);

    match cfg.format {
        LoggerFormat::Text => registry
            .with(
                fmt::layer()
                    .with_ansi(cfg.use_color)
                    .with_target(cfg.with_targets)
                    .with_span_events(span_events(cfg))
                    .with_timer(mk_timer()),
            )
            .try_init()
            .map_err(as_error),
        LoggerFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_ansi(false)
                    .with_target(cfg.with_targets)
                    .with_current_span(true)
                    .with_span_events(span_events(cfg))
                    .with_timer(mk_timer()),
            )
            .try_init()
            .map_err(as_error),
        LoggerFormat::Journald => install_journald(registry),
    }
}

/// `RUST_LOG` wins over the configured level when set.
pub(crate) fn mk_filter(level: &str) -> Result<EnvFilter, LoggerError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(level).map_err(|e| LoggerError::InvalidLevel {
        level: level.to_string(),
        reason: e.to_string(),
    })
}

fn span_events(cfg: &LoggerConfig) -> FmtSpan {
    if cfg.span_timings {
        FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    }
}

fn mk_timer() -> OffsetTime<Rfc3339> {
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    OffsetTime::new(offset, Rfc3339)
}

fn as_error(e: impl std::fmt::Display) -> LoggerError {
    let s = e.to_string();
    if s.contains("SetGlobalDefaultError") || s.contains("global default") {
        LoggerError::AlreadyInitialized
    } else {
        LoggerError::Init(s)
    }
}

#[cfg(all(target_os = "linux", feature = "journald"))]
fn install_journald<S>(registry: S) -> Result<(), LoggerError>
where
    S: tracing::Subscriber
        + for<'a> tracing_subscriber::registry::LookupSpan<'a>
        + Send
        + Sync
        + 'static,
{
    let journald = tracing_journald::layer()
        .map_err(|e| LoggerError::Init(format!("journald: {e}")))?;
    registry.with(journald).try_init().map_err(as_error)
}

#[cfg(not(all(target_os = "linux", feature = "journald")))]
fn install_journald<S>(_registry: S) -> Result<(), LoggerError> {
    Err(LoggerError::JournaldUnavailable)
}
