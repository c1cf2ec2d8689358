use crate::utils::error::{Result, WireError};
use regex::Regex;
use std::sync::OnceLock;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// 1-Wire serial numbers as the kernel tree names them: two hex family
/// digits, a dash, twelve hex serial digits, all lowercase.
pub fn validate_address(field_name: &str, address: &str) -> Result<()> {
    static ADDRESS_RE: OnceLock<Regex> = OnceLock::new();
    let re = ADDRESS_RE.get_or_init(|| Regex::new(r"^[0-9a-f]{2}-[0-9a-f]{12}$").unwrap());

    if address.is_empty() {
        return Err(WireError::InvalidConfigValue {
            field: field_name.to_string(),
            value: address.to_string(),
            reason: "address cannot be empty".to_string(),
        });
    }

    if !re.is_match(address) {
        return Err(WireError::InvalidConfigValue {
            field: field_name.to_string(),
            value: address.to_string(),
            reason: "expected a lowercase 1-Wire serial like 28-0000075a2b1c".to_string(),
        });
    }

    Ok(())
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(WireError::InvalidConfigValue {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(WireError::InvalidConfigValue {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(WireError::InvalidConfigValue {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(WireError::InvalidConfigValue {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_address() {
        assert!(validate_address("identifier", "28-0000075a2b1c").is_ok());
        assert!(validate_address("identifier", "3a-00000013f2d5").is_ok());
        assert!(validate_address("identifier", "").is_err());
        assert!(validate_address("identifier", "28-0000075A2B1C").is_err());
        assert!(validate_address("identifier", "280000075a2b1c").is_err());
        assert!(validate_address("identifier", "28-075a2b1c").is_err());
        assert!(validate_address("identifier", "w1_bus_master1").is_err());
    }

    #[test]
    fn test_validate_path() {
        assert!(validate_path("bus_root", "/sys/bus/w1/devices").is_ok());
        assert!(validate_path("bus_root", "").is_err());
        assert!(validate_path("bus_root", "bad\0path").is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("delay_ms", 1000u64, 0, 60_000).is_ok());
        assert!(validate_range("delay_ms", 90_000u64, 0, 60_000).is_err());
    }

    #[test]
    fn test_validate_non_empty_string() {
        assert!(validate_non_empty_string("label", "attic").is_ok());
        assert!(validate_non_empty_string("label", "   ").is_err());
    }
}
