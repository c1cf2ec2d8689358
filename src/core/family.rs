/// Leaf file exposing a temperature reading, milli-degrees as ASCII.
pub const TEMPERATURE_LEAF: &str = "temperature";
/// Leaf file exposing the current port status byte.
pub const STATE_LEAF: &str = "state";
/// Leaf file accepting the port output byte; must be process-writable.
pub const OUTPUT_LEAF: &str = "output";

/// Closed set of supported device families. Adding hardware support means
/// adding a variant here and a handler module, nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
    Temperature,
    Port2,
    Port8,
    Unknown,
}

impl Family {
    /// Classify a normalized (lowercase) device address by its two-character
    /// family code prefix.
    pub fn classify(sn: &str) -> Family {
        match sn.get(0..2).unwrap_or("") {
            "10" | "22" | "28" | "3b" | "42" => Family::Temperature,
            "3a" => Family::Port2,
            "29" => Family::Port8,
            _ => Family::Unknown,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Family::Temperature => "DS18x20-class temperature sensor",
            Family::Port2 => "DS2413 (0x3A) 2-bit I/O port",
            Family::Port8 => "DS2408 (0x29) 8-bit I/O port",
            Family::Unknown => "unsupported device family",
        }
    }
}

/// Address plus output topic for one invocation; builds the relative bus
/// paths for the device's leaf files.
#[derive(Debug, Clone)]
pub struct DeviceLink {
    pub sn: String,
    pub topic: String,
}

impl DeviceLink {
    pub fn leaf(&self, leaf: &str) -> String {
        format!("{}/{}", self.sn, leaf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_temperature_codes() {
        for code in ["10", "22", "28", "3b", "42"] {
            let sn = format!("{code}-0000075a2b1c");
            assert_eq!(Family::classify(&sn), Family::Temperature, "{code}");
        }
    }

    #[test]
    fn test_classify_ports() {
        assert_eq!(Family::classify("3a-0000075a2b1c"), Family::Port2);
        assert_eq!(Family::classify("29-0000075a2b1c"), Family::Port8);
    }

    #[test]
    fn test_classify_defaults_to_unknown() {
        assert_eq!(Family::classify("ff-0000075a2b1c"), Family::Unknown);
        assert_eq!(Family::classify(""), Family::Unknown);
        assert_eq!(Family::classify("2"), Family::Unknown);
        // Classification expects an already-lowercased address.
        assert_eq!(Family::classify("3A-0000075A2B1C"), Family::Unknown);
    }

    #[test]
    fn test_device_link_paths() {
        let link = DeviceLink {
            sn: "28-0000075a2b1c".to_string(),
            topic: "attic".to_string(),
        };
        assert_eq!(link.leaf(TEMPERATURE_LEAF), "28-0000075a2b1c/temperature");
        assert_eq!(link.leaf(STATE_LEAF), "28-0000075a2b1c/state");
        assert_eq!(link.leaf(OUTPUT_LEAF), "28-0000075a2b1c/output");
    }
}
