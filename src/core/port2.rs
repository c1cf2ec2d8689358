use crate::core::codec::{as_bit, check_complement, decode2, encode2, first_valid};
use crate::core::engine::now_ms;
use crate::core::family::{DeviceLink, OUTPUT_LEAF, STATE_LEAF};
use crate::core::retry::{run_with_retries, RetryPolicy};
use crate::domain::model::{
    value_is_falsy, Command, MessageDetail, Outcome, OutputMessage, Port2State, Reply,
    StatusReport,
};
use crate::domain::ports::{EventSink, WireBus};
use crate::utils::error::{Result, WireError};
use serde_json::{json, Value};

/// DS2413-class 2-bit port. Channel A drives an actuator, channel B senses
/// its feedback, so a string token commands the pair as one switch:
/// "on" energizes A, anything else releases it, and a token matching the
/// current state is a no-op read.
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
    let special = matches!(payload, Some(Value::String(_)));

    if wants_read(payload, &port) {
        let status = StatusReport::idle(format!("{}: {} ({})", link.sn, port.hex, port.state));
        return Reply {
            outcome: Outcome::Success(reply_message(link, &port, special)),
            status,
        };
    }

    // payload is present past this point; wants_read covered the None arm
    let target = payload.map(|v| resolve_pair(v, &port)).unwrap_or_default();
    let byte = encode2(target.0, target.1);
    let output_path = link.leaf(OUTPUT_LEAF);

    let verified = run_with_retries(policy, events, &link.sn, "port write", || {
        write_and_verify(bus, &output_path, byte, policy.delay, &state_path)
    })
    .await;

    match verified {
        Ok(port) => {
            let suffix = if special {
                format!(" ({})", port.state)
            } else {
                String::new()
            };
            let status = StatusReport::ok(format!("{}: {}{}", link.sn, port.hex, suffix));
            Reply {
                outcome: Outcome::Success(reply_message(link, &port, special)),
                status,
            }
        }
        Err(e) => exhausted(e, &link.sn),
    }
}

/// One full write attempt: issue the output byte, wait for the device to
/// settle, then prove the write by re-reading and re-validating the state.
async fn write_and_verify<B: WireBus + ?Sized>(
    bus: &B,
    output_path: &str,
    byte: u8,
    settle: std::time::Duration,
    state_path: &str,
) -> Result<Port2State> {
    bus.write_bytes(output_path, &[byte]).await?;
    tokio::time::sleep(settle).await;
    read_state(bus, state_path).await
}

async fn read_state<B: WireBus + ?Sized>(bus: &B, path: &str) -> Result<Port2State> {
    let bytes = bus.read_bytes(path).await?;
    let byte = *bytes
        .first()
        .ok_or_else(|| WireError::corrupt("empty state read"))?;
    if !check_complement(byte) {
        return Err(WireError::corrupt("Bad Port Read"));
    }
    Ok(decode2(byte))
}

/// A command is a pure read when there is nothing to change: no payload,
/// a number (inbound timestamps land here), an empty/falsy value, an
/// explicit "status" query, or a state token matching the decoded state.
fn wants_read(payload: Option<&Value>, current: &Port2State) -> bool {
    match payload {
        None => true,
        Some(Value::Number(_)) => true,
        Some(Value::String(s)) => {
            s.eq_ignore_ascii_case("status")
                || s.eq_ignore_ascii_case(current.state.as_str())
                || s.is_empty()
        }
        Some(v) => value_is_falsy(v),
    }
}

/// Target latch pair for a write. String tokens use the fixed actuator
/// mapping; pairs and maps fall back per-bit to the current latch.
fn resolve_pair(payload: &Value, current: &Port2State) -> (u8, u8) {
    match payload {
        Value::String(s) => {
            if s.eq_ignore_ascii_case("on") {
                (0, 1)
            } else {
                (1, 1)
            }
        }
        Value::Array(items) => (
            items.first().and_then(as_bit).unwrap_or(current.latch_a),
            items.get(1).and_then(as_bit).unwrap_or(current.latch_b),
        ),
        Value::Object(map) => (
            first_valid([map.get("a").and_then(as_bit), map.get("A").and_then(as_bit)])
                .unwrap_or(current.latch_a),
            first_valid([map.get("b").and_then(as_bit), map.get("B").and_then(as_bit)])
                .unwrap_or(current.latch_b),
        ),
        _ => (current.latch_a, current.latch_b),
    }
}

fn reply_message(link: &DeviceLink, port: &Port2State, special: bool) -> OutputMessage {
    let payload = if special {
        json!(port.state)
    } else {
        json!(port.port)
    };
    OutputMessage {
        topic: link.topic.clone(),
        payload,
        sn: link.sn.clone(),
        time: now_ms(),
        detail: MessageDetail::Port2 { port: port.clone() },
    }
}

fn exhausted(e: WireError, sn: &str) -> Reply {
    Reply {
        outcome: Outcome::Exhausted(e),
        status: StatusReport::unavailable(sn),
    }
}
