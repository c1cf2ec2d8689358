use crate::core::family::{DeviceLink, Family};
use crate::core::retry::RetryPolicy;
use crate::core::{port2, port8, temperature};
use crate::domain::model::{
    Command, MessageDetail, Outcome, OutputMessage, Reply, Request, StatusReport, Unit,
};
use crate::domain::ports::{EventSink, SettingsProvider, WireBus};
use serde_json::json;

/// Attempts per invocation; the inter-attempt delay comes from settings.
pub const RETRY_ATTEMPTS: u32 = 3;

pub(crate) fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Top-level protocol engine: one inbound request in, one reply out.
/// Collaborators are injected so the core runs against any bus or host.
pub struct Engine<B: WireBus, C: SettingsProvider, E: EventSink> {
    bus: B,
    settings: C,
    events: E,
}

impl<B: WireBus, C: SettingsProvider, E: EventSink> Engine<B, C, E> {
    pub fn new(bus: B, settings: C, events: E) -> Self {
        Self {
            bus,
            settings,
            events,
        }
    }

    /// Process one request to completion: normalize the address, dispatch
    /// by family, and surface the final status to the host display.
    pub async fn run(&self, request: Request) -> Reply {
        let sn = self
            .settings
            .identifier()
            .filter(|id| !id.trim().is_empty())
            .map(str::to_string)
            .or_else(|| request.topic.clone())
            .unwrap_or_default()
            .trim()
            .to_lowercase();
        let topic = request
            .label
            .clone()
            .filter(|label| !label.is_empty())
            .unwrap_or_else(|| sn.clone());
        let link = DeviceLink { sn, topic };

        let family = Family::classify(&link.sn);
        tracing::debug!(sn = %link.sn, device = family.description(), "dispatching request");

        let policy = RetryPolicy::new(RETRY_ATTEMPTS, self.settings.write_delay());
        let command = Command::from_payload(request.payload.clone());

        let reply = match family {
            Family::Temperature => {
                let unit = if self.settings.force_celsius() || !request.fahrenheit {
                    Unit::Celsius
                } else {
                    Unit::Fahrenheit
                };
                temperature::handle(&self.bus, &self.events, &policy, &link, unit).await
            }
            Family::Port2 => port2::handle(&self.bus, &self.events, &policy, &link, &command).await,
            Family::Port8 => port8::handle(&self.bus, &self.events, &policy, &link, &command).await,
            Family::Unknown => unsupported(&link),
        };

        self.events.status(&reply.status);
        reply
    }
}

fn unsupported(link: &DeviceLink) -> Reply {
    let message = OutputMessage {
        topic: link.topic.clone(),
        payload: json!("not yet supported"),
        sn: link.sn.clone(),
        time: now_ms(),
        detail: MessageDetail::Plain {},
    };
    Reply {
        outcome: Outcome::Unsupported(message),
        status: StatusReport::unavailable(&link.sn),
    }
}
