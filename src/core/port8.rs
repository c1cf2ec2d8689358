use crate::core::codec::{decode8, encode8};
use crate::core::engine::now_ms;
use crate::core::family::{DeviceLink, OUTPUT_LEAF, STATE_LEAF};
use crate::core::retry::{run_with_retries, RetryPolicy};
use crate::domain::model::{
    value_is_falsy, Command, MessageDetail, Outcome, OutputMessage, Port8State, Reply,
    StatusReport,
};
use crate::domain::ports::{EventSink, WireBus};
use crate::utils::error::{Result, WireError};
use serde_json::{json, Value};

/// DS2408-class 8-bit port. The status byte carries no redundancy nibble,
/// so the raw read is trusted and only I/O failures retry.
pub async fn handle<B: WireBus>(
    bus: &B,
    events: &dyn EventSink,
    policy: &RetryPolicy,
    link: &DeviceLink,
    command: &Command,
) -> Reply {
    let state_path = link.leaf(STATE_LEAF);

    let port = match run_with_retries(policy, events, &link.sn, "port read", || {
        read_state(bus, &state_path)
    })
    .await
    {
        Ok(port) => port,
        Err(e) => return exhausted(e, &link.sn),
    };

    let payload = match command {
        Command::Read => None,
        Command::Write(v) => Some(v),
    };

    if wants_read(payload) {
        let status = StatusReport::idle(format!("{}: {}", link.sn, port.hex));
        return Reply {
            outcome: Outcome::Success(reply_message(link, port, None)),
            status,
        };
    }

    // payload is present past this point; wants_read covered the None arm
    let byte = payload.map(|v| encode8(v, &port)).unwrap_or(port.decimal);
    let output_path = link.leaf(OUTPUT_LEAF);

    let reread = run_with_retries(policy, events, &link.sn, "port write", || {
        write_and_reread(bus, &output_path, byte, policy.delay, &state_path)
    })
    .await;

    match reread {
        Ok(port) => {
            let status = StatusReport::ok(format!("{}: {}", link.sn, port.hex));
            Reply {
                outcome: Outcome::Success(reply_message(link, port, Some(byte))),
                status,
            }
        }
        Err(e) => exhausted(e, &link.sn),
    }
}

/// One full write attempt: issue the byte, wait for the device to settle,
/// then re-read the state. No validation exists for this family.
async fn write_and_reread<B: WireBus + ?Sized>(
    bus: &B,
    output_path: &str,
    byte: u8,
    settle: std::time::Duration,
    state_path: &str,
) -> Result<Port8State> {
    bus.write_bytes(output_path, &[byte]).await?;
    tokio::time::sleep(settle).await;
    read_state(bus, state_path).await
}

async fn read_state<B: WireBus + ?Sized>(bus: &B, path: &str) -> Result<Port8State> {
    let bytes = bus.read_bytes(path).await?;
    let byte = *bytes
        .first()
        .ok_or_else(|| WireError::corrupt("empty state read"))?;
    Ok(decode8(byte))
}

/// Numbers past the byte range are inbound timestamps; they and empty
/// payloads mean "just read".
fn wants_read(payload: Option<&Value>) -> bool {
    match payload {
        None => true,
        Some(Value::Number(n)) => n.as_f64().map_or(true, |f| f > 255.0 || f == 0.0),
        Some(v) => value_is_falsy(v),
    }
}

fn reply_message(link: &DeviceLink, port: Port8State, written: Option<u8>) -> OutputMessage {
    OutputMessage {
        topic: link.topic.clone(),
        payload: json!(port.decimal),
        sn: link.sn.clone(),
        time: now_ms(),
        detail: MessageDetail::Port8 {
            port,
            data: written,
        },
    }
}

fn exhausted(e: WireError, sn: &str) -> Reply {
    Reply {
        outcome: Outcome::Exhausted(e),
        status: StatusReport::unavailable(sn),
    }
}
