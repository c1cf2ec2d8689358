use crate::utils::error::Result;
use crate::utils::validation::{validate_address, validate_non_empty_string, validate_range, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// TOML settings file: one `[engine]` section plus any number of
/// `[[devices]]` entries mapping flow topics onto bus addresses.
///
/// ```toml
/// [engine]
/// bus_root = "/sys/bus/w1/devices"
/// delay_ms = 1000
///
/// [[devices]]
/// identifier = "28-0000075a2b1c"
/// label = "attic"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub engine: EngineSection,
    #[serde(default)]
    pub devices: Vec<DeviceEntry>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineSection {
    pub bus_root: Option<String>,
    pub delay_ms: Option<u64>,
    pub celsius: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceEntry {
    pub identifier: String,
    pub label: Option<String>,
    pub celsius: Option<bool>,
}

impl FileConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: FileConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Find the device entry a request addresses, by label or identifier.
    pub fn device_for(&self, topic: &str) -> Option<&DeviceEntry> {
        let topic = topic.trim().to_lowercase();
        self.devices.iter().find(|d| {
            d.identifier.eq_ignore_ascii_case(&topic)
                || d.label
                    .as_deref()
                    .is_some_and(|label| label.eq_ignore_ascii_case(&topic))
        })
    }
}

impl Validate for FileConfig {
    fn validate(&self) -> Result<()> {
        if let Some(delay_ms) = self.engine.delay_ms {
            validate_range("engine.delay_ms", delay_ms, 0, 60_000)?;
        }
        for device in &self.devices {
            validate_address("devices.identifier", &device.identifier)?;
            if let Some(label) = &device.label {
                validate_non_empty_string("devices.label", label)?;
            }
        }
        Ok(())
    }
}
