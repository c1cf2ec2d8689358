use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Inbound message handed to the engine by the host flow.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Request {
    /// Device address, unless the engine is configured with an identifier.
    pub topic: Option<String>,
    /// Output topic override; defaults to the normalized address.
    pub label: Option<String>,
    pub payload: Option<Value>,
    /// Temperature family only: report Fahrenheit instead of Celsius.
    #[serde(default)]
    pub fahrenheit: bool,
}

/// Requested action, as far as it can be told before family dispatch.
/// Family handlers may still downgrade a `Write` carrying a read-like
/// value (timestamp, "status", no-op state token) to a pure read.
#[derive(Debug, Clone)]
pub enum Command {
    Read,
    Write(Value),
}

impl Command {
    pub fn from_payload(payload: Option<Value>) -> Self {
        match payload {
            None | Some(Value::Null) => Command::Read,
            Some(v) => Command::Write(v),
        }
    }
}

/// Truthiness of a JSON payload, matching the host flow's conventions:
/// null, false, 0 and "" all read as empty.
pub fn value_is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SwitchState {
    #[serde(rename = "ON")]
    On,
    #[serde(rename = "OFF")]
    Off,
}

impl SwitchState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SwitchState::On => "ON",
            SwitchState::Off => "OFF",
        }
    }
}

impl std::fmt::Display for SwitchState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decoded DS2413-class status register. Bit fields are kept as 0/1 so the
/// serialized message matches what downstream flows expect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Port2State {
    /// Raw status byte.
    pub port: u8,
    pub latch_b: u8,
    pub pio_b: u8,
    pub latch_a: u8,
    pub pio_a: u8,
    pub hex: String,
    /// Derived actuator state: ON iff the PIO-B sense bit is set.
    pub state: SwitchState,
}

/// Decoded DS2408-class status register. `bits` runs most-significant
/// first; the named fields map a..h onto bits 0..7 (a is the LSB).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Port8State {
    pub decimal: u8,
    pub hex: String,
    pub binary: String,
    pub bits: [u8; 8],
    pub a: u8,
    pub b: u8,
    pub c: u8,
    pub d: u8,
    pub e: u8,
    pub f: u8,
    pub g: u8,
    pub h: u8,
}

impl Port8State {
    /// Named-field lookup in wire order, used for per-bit write fallbacks.
    pub fn field(&self, name: char) -> Option<u8> {
        match name {
            'a' => Some(self.a),
            'b' => Some(self.b),
            'c' => Some(self.c),
            'd' => Some(self.d),
            'e' => Some(self.e),
            'f' => Some(self.f),
            'g' => Some(self.g),
            'h' => Some(self.h),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Celsius,
    Fahrenheit,
}

impl Unit {
    pub fn symbol(&self) -> &'static str {
        match self {
            Unit::Celsius => "C",
            Unit::Fahrenheit => "F",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Unit::Celsius => "Celsius",
            Unit::Fahrenheit => "Fahrenheit",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusLevel {
    Idle,
    Ok,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusShape {
    Ring,
    Dot,
}

/// Human-readable outcome summary pushed to the host display, independent
/// of the returned message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusReport {
    pub level: StatusLevel,
    pub shape: StatusShape,
    pub text: String,
}

impl StatusReport {
    pub fn idle(text: impl Into<String>) -> Self {
        StatusReport {
            level: StatusLevel::Idle,
            shape: StatusShape::Ring,
            text: text.into(),
        }
    }

    pub fn ok(text: impl Into<String>) -> Self {
        StatusReport {
            level: StatusLevel::Ok,
            shape: StatusShape::Ring,
            text: text.into(),
        }
    }

    /// Default failure form shown while a device is not answering.
    pub fn unavailable(sn: &str) -> Self {
        StatusReport {
            level: StatusLevel::Error,
            shape: StatusShape::Ring,
            text: format!("{sn}: NA"),
        }
    }
}

/// Family-specific tail of an output message.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum MessageDetail {
    Temperature {
        format: &'static str,
        units: &'static str,
    },
    Port2 {
        port: Port2State,
    },
    Port8 {
        port: Port8State,
        #[serde(skip_serializing_if = "Option::is_none")]
        data: Option<u8>,
    },
    Plain {},
}

/// Message emitted per successful (or placeholder) invocation.
#[derive(Debug, Clone, Serialize)]
pub struct OutputMessage {
    pub topic: String,
    pub payload: Value,
    pub sn: String,
    /// Milliseconds since the Unix epoch.
    pub time: i64,
    #[serde(flatten)]
    pub detail: MessageDetail,
}

#[derive(Debug)]
pub enum Outcome {
    Success(OutputMessage),
    /// Family not handled; placeholder message, no bus I/O performed.
    Unsupported(OutputMessage),
    Exhausted(crate::utils::error::WireError),
}

/// What the engine hands back to the host per invocation.
#[derive(Debug)]
pub struct Reply {
    pub outcome: Outcome,
    pub status: StatusReport,
}

impl Reply {
    pub fn message(&self) -> Option<&OutputMessage> {
        match &self.outcome {
            Outcome::Success(m) | Outcome::Unsupported(m) => Some(m),
            Outcome::Exhausted(_) => None,
        }
    }
}
