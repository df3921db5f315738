//! Logging setup and timing helpers.
//!
//! The library only emits `tracing` events. Binaries and test harnesses that
//! want to see them call [`init_logging`] once.

use std::time::Instant;
use tracing_subscriber::{fmt, EnvFilter};

/// Default directive when neither an explicit filter nor `RUST_LOG` is set.
pub const DEFAULT_FILTER: &str = "warn,dataio=info";

/// Output format of the subscriber.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human readable lines.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

/// Installs a global `fmt` subscriber.
///
/// `filter` takes precedence over `RUST_LOG`. Returns `false` if a
/// subscriber was already installed.
pub fn init_logging(filter: Option<&str>, format: LogFormat) -> bool {
    let filter = match filter {
        Some(directives) => EnvFilter::new(directives),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
    };

    let builder = fmt().with_env_filter(filter).with_target(true);
    match format {
        LogFormat::Text => builder.try_init().is_ok(),
        LogFormat::Json => builder.json().try_init().is_ok(),
    }
}

/// Measures one pipeline step.
#[derive(Debug)]
pub struct StepTimer {
    start: Instant,
    name: &'static str,
}

impl StepTimer {
    /// Starts timing `name`.
    #[must_use]
    pub fn start(name: &'static str) -> Self {
        Self {
            start: Instant::now(),
            name,
        }
    }

    /// Step name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Elapsed milliseconds.
    #[must_use]
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_rejected() {
        init_logging(Some("debug"), LogFormat::Text);
        assert!(!init_logging(None, LogFormat::Json));
    }

    #[test]
    fn test_step_timer() {
        let timer = StepTimer::start("export");
        assert_eq!(timer.name(), "export");
        assert!(timer.elapsed_ms() >= 0.0);
    }
}
