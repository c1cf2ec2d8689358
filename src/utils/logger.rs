use crate::domain::model::{StatusLevel, StatusReport};
use crate::domain::ports::EventSink;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub fn init_cli_logger(verbose: bool, json: bool) {
    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("wirenode=debug,info"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("wirenode=info"))
    };

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        // JSON lines for embedded hosts that collect stderr.
        registry
            .with(tracing_subscriber::fmt::layer().with_target(false).json())
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false)
                    .compact(),
            )
            .init();
    }
}

/// Default event sink: warnings, structured error entries and status
/// changes all land on the tracing pipeline.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEvents;

impl EventSink for TracingEvents {
    fn warn(&self, message: &str) {
        tracing::warn!("{message}");
    }

    fn log_error(&self, component: &str, address: &str, message: &str) {
        tracing::error!(component, address, "{message}");
    }

    fn status(&self, status: &StatusReport) {
        match status.level {
            StatusLevel::Error => tracing::warn!(status = %status.text, "device status"),
            _ => tracing::debug!(status = %status.text, "device status"),
        }
    }
}
