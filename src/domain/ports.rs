use crate::domain::model::StatusReport;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Byte-file I/O over a 1-Wire bus tree. Paths are relative to the bus
/// root, `<sn>/<leaf>` with leaf one of `temperature`, `state`, `output`.
#[async_trait]
pub trait WireBus: Send + Sync {
    async fn read_bytes(&self, path: &str) -> Result<Vec<u8>>;
    async fn write_bytes(&self, path: &str, data: &[u8]) -> Result<()>;
}

/// Observability capabilities injected into the engine so the core stays
/// testable without a live host runtime.
pub trait EventSink: Send + Sync {
    /// Host-visible warning, one per failed attempt.
    fn warn(&self, message: &str);
    /// Structured error-log entry: component, device address, message.
    fn log_error(&self, component: &str, address: &str, message: &str);
    /// Status display update.
    fn status(&self, status: &StatusReport);
}

/// Per-node settings consumed by the engine.
pub trait SettingsProvider: Send + Sync {
    /// Device address override; when set it wins over the request topic.
    fn identifier(&self) -> Option<&str>;
    /// Settle delay after a write, also the inter-attempt retry delay.
    fn write_delay(&self) -> Duration;
    /// Force Celsius regardless of the request's unit preference.
    fn force_celsius(&self) -> bool;
}
