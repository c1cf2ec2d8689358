use crate::domain::ports::WireBus;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::fs;
use std::path::Path;

/// Bus adapter over the kernel's 1-Wire sysfs tree. Reads and writes the
/// per-device leaf files; the driver does the actual bus signalling.
/// Writing requires the output files to be writable by this process.
#[derive(Debug, Clone)]
pub struct SysfsBus {
    base_path: String,
}

impl SysfsBus {
    pub fn new(base_path: impl Into<String>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }
}

#[async_trait]
impl WireBus for SysfsBus {
    async fn read_bytes(&self, path: &str) -> Result<Vec<u8>> {
        let full_path = Path::new(&self.base_path).join(path);
        let data = fs::read(full_path)?;
        Ok(data)
    }

    async fn write_bytes(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = Path::new(&self.base_path).join(path);
        fs::write(full_path, data)?;
        Ok(())
    }
}
