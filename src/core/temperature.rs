use crate::core::engine::now_ms;
use crate::core::family::{DeviceLink, TEMPERATURE_LEAF};
use crate::core::retry::{run_with_retries, RetryPolicy};
use crate::domain::model::{MessageDetail, Outcome, OutputMessage, Reply, StatusReport, Unit};
use crate::domain::ports::{EventSink, WireBus};
use crate::utils::error::{Result, WireError};
use serde_json::json;

/// DS18x20-class sensors are read-only: fetch the milli-degree reading,
/// convert per the unit preference. An empty or unparseable file is the
/// driver's way of reporting a failed CRC, so it retries like an I/O error.
pub async fn handle<B: WireBus>(
    bus: &B,
    events: &dyn EventSink,
    policy: &RetryPolicy,
    link: &DeviceLink,
    unit: Unit,
) -> Reply {
    let path = link.leaf(TEMPERATURE_LEAF);
    let reading = run_with_retries(policy, events, &link.sn, "temperature read", || {
        read_milli_degrees(bus, &path)
    })
    .await;

    match reading {
        Ok(milli) => {
            let celsius = milli / 1000.0;
            let value = match unit {
                Unit::Celsius => celsius,
                Unit::Fahrenheit => celsius * 9.0 / 5.0 + 32.0,
            };
            let status = StatusReport::idle(format!("{}: {:.3}", link.sn, value));
            let message = OutputMessage {
                topic: link.topic.clone(),
                payload: json!(value),
                sn: link.sn.clone(),
                time: now_ms(),
                detail: MessageDetail::Temperature {
                    format: unit.name(),
                    units: unit.symbol(),
                },
            };
            Reply {
                outcome: Outcome::Success(message),
                status,
            }
        }
        Err(e) => Reply {
            outcome: Outcome::Exhausted(e),
            status: StatusReport::unavailable(&link.sn),
        },
    }
}

async fn read_milli_degrees<B: WireBus + ?Sized>(bus: &B, path: &str) -> Result<f64> {
    let bytes = bus.read_bytes(path).await?;
    let text = String::from_utf8_lossy(&bytes);
    let text = text.trim();
    if text.is_empty() {
        return Err(WireError::corrupt("bad CRC, empty temperature read"));
    }
    text.parse::<f64>()
        .map_err(|_| WireError::corrupt(format!("unreadable temperature value '{text}'")))
}
