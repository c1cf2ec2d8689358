pub mod file;
pub mod sysfs;

use crate::domain::ports::SettingsProvider;
use std::time::Duration;

#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{validate_address, validate_path, validate_range, Validate};
#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "wirenode")]
#[command(about = "1-Wire device protocol engine over a byte-file bus")]
pub struct CliConfig {
    /// Root of the 1-Wire device tree.
    #[arg(long, default_value = "/sys/bus/w1/devices")]
    pub bus_root: String,

    /// Device address; overrides the request topic when set.
    #[arg(long)]
    pub identifier: Option<String>,

    /// Read-after-write settle delay and retry backoff, in milliseconds.
    #[arg(long, default_value = "1000")]
    pub delay_ms: u64,

    /// Always report Celsius regardless of request flags.
    #[arg(long)]
    pub celsius: bool,

    /// Optional TOML file with engine and per-device settings.
    #[arg(long)]
    pub config: Option<String>,

    /// Process one JSON request and exit instead of reading stdin lines.
    #[arg(long)]
    pub request: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    /// Emit logs as JSON lines.
    #[arg(long)]
    pub log_json: bool,
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_path("bus_root", &self.bus_root)?;
        validate_range("delay_ms", self.delay_ms, 0, 60_000)?;
        if let Some(identifier) = &self.identifier {
            validate_address("identifier", &identifier.trim().to_lowercase())?;
        }
        if let Some(path) = &self.config {
            validate_path("config", path)?;
        }
        Ok(())
    }
}

#[cfg(feature = "cli")]
impl SettingsProvider for CliConfig {
    fn identifier(&self) -> Option<&str> {
        self.identifier.as_deref()
    }

    fn write_delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    fn force_celsius(&self) -> bool {
        self.celsius
    }
}

/// Flattened per-invocation settings, merged from the CLI, an optional
/// config file entry and the request itself.
#[derive(Debug, Clone, Default)]
pub struct ResolvedSettings {
    pub identifier: Option<String>,
    pub delay: Duration,
    pub celsius: bool,
}

impl SettingsProvider for ResolvedSettings {
    fn identifier(&self) -> Option<&str> {
        self.identifier.as_deref()
    }

    fn write_delay(&self) -> Duration {
        self.delay
    }

    fn force_celsius(&self) -> bool {
        self.celsius
    }
}
