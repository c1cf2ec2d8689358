use crate::domain::model::{Port2State, Port8State, SwitchState};
use serde_json::Value;

/// DS2413 status bytes carry the low nibble complemented into the high
/// nibble. A byte that breaks the rule must not be decoded.
pub fn check_complement(byte: u8) -> bool {
    ((!byte & 0xF0) >> 4) == (byte & 0x0F)
}

/// Decode a DS2413 status byte: bit 0 = PIO-A sense, bit 1 = latch A,
/// bit 2 = PIO-B sense, bit 3 = latch B.
pub fn decode2(byte: u8) -> Port2State {
    Port2State {
        port: byte,
        latch_b: (byte >> 3) & 1,
        pio_b: (byte >> 2) & 1,
        latch_a: (byte >> 1) & 1,
        pio_a: byte & 1,
        hex: format!("0x{:X}", byte),
        state: if byte & 0x4 != 0 {
            SwitchState::On
        } else {
            SwitchState::Off
        },
    }
}

/// Build a DS2413 output byte from the two latch bits: bit 0 = A, bit 1 = B.
pub fn encode2(a: u8, b: u8) -> u8 {
    ((((b as u16) << 1) | a as u16) & 0xFF) as u8
}

/// Decode a DS2408 status byte. `bits` is most-significant first; the
/// named fields run a = bit 0 (LSB) through h = bit 7 (MSB).
pub fn decode8(byte: u8) -> Port8State {
    let mut bits = [0u8; 8];
    for (i, slot) in bits.iter_mut().enumerate() {
        *slot = (byte >> (7 - i)) & 1;
    }
    Port8State {
        decimal: byte,
        hex: format!("0x{:02X}", byte),
        binary: format!("0b{:08b}", byte),
        bits,
        a: byte & 1,
        b: (byte >> 1) & 1,
        c: (byte >> 2) & 1,
        d: (byte >> 3) & 1,
        e: (byte >> 4) & 1,
        f: (byte >> 5) & 1,
        g: (byte >> 6) & 1,
        h: (byte >> 7) & 1,
    }
}

/// Named DS2408 fields in wire order, most-significant bit first.
pub const PORT8_FIELDS: [char; 8] = ['h', 'g', 'f', 'e', 'd', 'c', 'b', 'a'];

/// Compute a DS2408 output byte from a write payload:
/// - a number or numeric string is taken literally (low 8 bits),
/// - a sequence is consumed in order, most-significant bit first,
/// - a map supplies named fields, missing ones fall back to `current`,
/// - anything else leaves the register as it is.
pub fn encode8(payload: &Value, current: &Port8State) -> u8 {
    match payload {
        Value::Number(n) => n.as_u64().map(|v| (v & 0xFF) as u8).unwrap_or(0),
        Value::String(s) => match s.trim().parse::<u64>() {
            Ok(v) => (v & 0xFF) as u8,
            Err(_) => current.decimal,
        },
        Value::Array(items) => {
            let mut byte: u16 = 0;
            for item in items {
                byte = (byte << 1) | as_bit(item).unwrap_or(0) as u16;
            }
            (byte & 0xFF) as u8
        }
        Value::Object(map) => {
            let mut byte: u8 = 0;
            for name in PORT8_FIELDS {
                let bit = first_valid([
                    map.get(name.to_string().as_str()).and_then(as_bit),
                    current.field(name),
                ])
                .unwrap_or(0);
                byte = (byte << 1) | bit;
            }
            byte
        }
        _ => current.decimal,
    }
}

/// Coerce a JSON value to a single port bit.
pub fn as_bit(value: &Value) -> Option<u8> {
    match value {
        Value::Bool(b) => Some(*b as u8),
        Value::Number(n) => n.as_f64().map(|f| (f != 0.0) as u8),
        Value::String(s) => match s.trim() {
            "0" => Some(0),
            "1" => Some(1),
            _ => None,
        },
        _ => None,
    }
}

/// Ordered-option resolver: the first present value wins. Keeps the
/// "explicit value, else current latch" fallback chains flat and testable.
pub fn first_valid<T, I>(options: I) -> Option<T>
where
    I: IntoIterator<Item = Option<T>>,
{
    options.into_iter().flatten().next()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_complement_check_holds_for_exactly_16_bytes() {
        let valid = (0u16..=255).filter(|b| check_complement(*b as u8)).count();
        assert_eq!(valid, 16);
        // Every valid byte has its low nibble complemented in the high one.
        for low in 0u8..16 {
            let byte = ((!low & 0x0F) << 4) | low;
            assert!(check_complement(byte), "0x{:02X} should pass", byte);
        }
    }

    #[test]
    fn test_complement_check_rejects_plain_bytes() {
        assert!(!check_complement(0x12));
        assert!(!check_complement(0xFF));
        assert!(!check_complement(0x00));
        assert!(check_complement(0xF0));
        assert!(check_complement(0x0F));
    }

    #[test]
    fn test_decode2_fields() {
        let port = decode2(0x0F);
        assert_eq!(port.latch_b, 1);
        assert_eq!(port.pio_b, 1);
        assert_eq!(port.latch_a, 1);
        assert_eq!(port.pio_a, 1);
        assert_eq!(port.state, SwitchState::On);
        assert_eq!(port.hex, "0xF");

        let port = decode2(0x0B);
        assert_eq!(port.pio_b, 0);
        assert_eq!(port.state, SwitchState::Off);
        assert_eq!(port.hex, "0xB");
    }

    #[test]
    fn test_encode2() {
        assert_eq!(encode2(0, 0), 0);
        assert_eq!(encode2(1, 0), 1);
        assert_eq!(encode2(0, 1), 2);
        assert_eq!(encode2(1, 1), 3);
    }

    #[test]
    fn test_encode2_recovers_latch_pair_from_any_status_byte() {
        // Re-encoding the decoded latches reconstructs the output register
        // image, the write that leaves the port unchanged.
        for b in 0u16..=255 {
            let port = decode2(b as u8);
            let expected = (((b >> 3) & 1) << 1) | ((b >> 1) & 1);
            assert_eq!(encode2(port.latch_a, port.latch_b) as u16, expected);
        }
    }

    #[test]
    fn test_decode8_bit_order() {
        let port = decode8(0x01);
        assert_eq!(port.a, 1);
        assert_eq!(port.h, 0);
        assert_eq!(port.bits, [0, 0, 0, 0, 0, 0, 0, 1]);
        assert_eq!(port.hex, "0x01");
        assert_eq!(port.binary, "0b00000001");

        let port = decode8(0x80);
        assert_eq!(port.a, 0);
        assert_eq!(port.h, 1);
        assert_eq!(port.bits, [1, 0, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_decode8_encode8_round_trips_all_bytes() {
        for b in 0u16..=255 {
            let port = decode8(b as u8);
            // An empty map falls back to the current value for every field.
            assert_eq!(encode8(&json!({}), &port), b as u8);
            // A fully explicit map reproduces the byte too.
            let full = json!({
                "a": port.a, "b": port.b, "c": port.c, "d": port.d,
                "e": port.e, "f": port.f, "g": port.g, "h": port.h,
            });
            assert_eq!(encode8(&full, &port), b as u8);
        }
    }

    #[test]
    fn test_encode8_numeric_forms() {
        let zero = decode8(0);
        assert_eq!(encode8(&json!(1), &zero), 1);
        assert_eq!(encode8(&json!(170), &zero), 0xAA);
        // Values past a byte keep only the low 8 bits.
        assert_eq!(encode8(&json!(300), &zero), 44);
        assert_eq!(encode8(&json!("11"), &zero), 11);
        assert_eq!(encode8(&json!(" 7 "), &zero), 7);
    }

    #[test]
    fn test_encode8_junk_leaves_register_unchanged() {
        let current = decode8(0x5A);
        assert_eq!(encode8(&json!("full"), &current), 0x5A);
        assert_eq!(encode8(&json!(true), &current), 0x5A);
        assert_eq!(encode8(&json!(-3), &current), 0);
    }

    #[test]
    fn test_encode8_sequence_is_msb_first() {
        let zero = decode8(0);
        assert_eq!(encode8(&json!([0, 0, 0, 0, 0, 0, 0, 1]), &zero), 1);
        assert_eq!(encode8(&json!([1, 0, 1, 0, 1, 0, 1, 0]), &zero), 0xAA);
        assert_eq!(
            encode8(&json!(["1", "0", "1", "0", "1", "0", "1", "0"]), &zero),
            0xAA
        );
    }

    #[test]
    fn test_encode8_named_fields_with_fallback() {
        assert_eq!(encode8(&json!({"a": 1}), &decode8(0x00)), 0x01);
        assert_eq!(encode8(&json!({"h": 1}), &decode8(0x00)), 0x80);
        assert_eq!(encode8(&json!({"c": 0}), &decode8(0xFF)), 0xFB);
        assert_eq!(encode8(&json!({"a": 0, "b": 1}), &decode8(0x01)), 0x02);
    }

    #[test]
    fn test_as_bit() {
        assert_eq!(as_bit(&json!(1)), Some(1));
        assert_eq!(as_bit(&json!(0)), Some(0));
        assert_eq!(as_bit(&json!(5)), Some(1));
        assert_eq!(as_bit(&json!(true)), Some(1));
        assert_eq!(as_bit(&json!(false)), Some(0));
        assert_eq!(as_bit(&json!("1")), Some(1));
        assert_eq!(as_bit(&json!("0")), Some(0));
        assert_eq!(as_bit(&json!("x")), None);
        assert_eq!(as_bit(&json!(null)), None);
    }

    #[test]
    fn test_first_valid() {
        assert_eq!(first_valid([None, Some(2), Some(3)]), Some(2));
        assert_eq!(first_valid([Some(1), None]), Some(1));
        assert_eq!(first_valid::<u8, _>([None, None]), None);
        assert_eq!(first_valid::<u8, _>([]), None);
    }
}
