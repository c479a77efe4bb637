//! Gateway envelope - the versioned wrapper around every gateway event.
//!
//! Wire form: `{"v":1,"t":"<event_type>","d":{...}}`.

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::trace;

/// The only protocol version this client understands.
pub const GATEWAY_PROTOCOL_VERSION: u8 = 1;

/// Largest accepted frame, in bytes of UTF-8.
pub const MAX_GATEWAY_EVENT_BYTES: usize = 64 * 1024;

/// Longest accepted event name.
pub const MAX_GATEWAY_EVENT_NAME_LEN: usize = 64;

/// An event name matching `^[A-Za-z0-9_]{1,64}$`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct GatewayEventName(String);

impl GatewayEventName {
    /// Validates an event name; returns `None` if it falls outside the pattern.
    pub fn parse(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        let valid = !name.is_empty()
            && name.len() <= MAX_GATEWAY_EVENT_NAME_LEN
            && name.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_');
        valid.then_some(Self(name))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for GatewayEventName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for GatewayEventName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A structurally valid gateway frame.
///
/// `d` is guaranteed to be a JSON object; its contents are checked later by
/// the decoder of the domain that owns `t`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GatewayEnvelope {
    /// Protocol version (always [`GATEWAY_PROTOCOL_VERSION`]).
    pub v: u8,

    /// Event type.
    pub t: GatewayEventName,

    /// Raw event payload.
    pub d: Value,
}

impl GatewayEnvelope {
    /// Creates an envelope for the current protocol version.
    pub fn new(t: GatewayEventName, d: Map<String, Value>) -> Self {
        Self {
            v: GATEWAY_PROTOCOL_VERSION,
            t,
            d: Value::Object(d),
        }
    }

    pub fn event_type(&self) -> &str {
        self.t.as_str()
    }

    pub fn payload(&self) -> &Value {
        &self.d
    }

    /// Serializes the envelope back into a text frame.
    pub fn to_frame(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Parses a raw text frame into an envelope.
///
/// Returns `None` on any violation: oversized input (checked before JSON
/// parsing), invalid JSON, a top level other than exactly `{v, t, d}`, a
/// version other than 1, a malformed event name, or a non-object payload.
pub fn parse_gateway_event_envelope(raw: &str) -> Option<GatewayEnvelope> {
    if raw.len() > MAX_GATEWAY_EVENT_BYTES {
        trace!(len = raw.len(), "Rejected oversized gateway frame");
        return None;
    }

    let Ok(value) = serde_json::from_str::<Value>(raw) else {
        return reject("invalid json");
    };
    let Value::Object(mut fields) = value else {
        return reject("top level is not an object");
    };
    if fields.len() != 3 {
        return reject("unexpected field count");
    }

    let (Some(v), Some(t), Some(d)) = (fields.remove("v"), fields.remove("t"), fields.remove("d"))
    else {
        return reject("missing envelope field");
    };

    if v.as_u64() != Some(u64::from(GATEWAY_PROTOCOL_VERSION)) {
        return reject("unsupported version");
    }

    let Value::String(t) = t else {
        return reject("event name is not a string");
    };
    let Some(t) = GatewayEventName::parse(t) else {
        return reject("malformed event name");
    };

    if !d.is_object() {
        return reject("payload is not an object");
    }

    Some(GatewayEnvelope {
        v: GATEWAY_PROTOCOL_VERSION,
        t,
        d,
    })
}

fn reject(reason: &'static str) -> Option<GatewayEnvelope> {
    trace!(reason, "Rejected gateway frame");
    None
}
