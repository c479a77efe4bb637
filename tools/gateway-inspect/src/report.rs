//! Per-frame classification.

use std::fmt;

use hearth_gateway::{
    decode_gateway_event, domain_for_event_type, parse_gateway_event_envelope, GatewayDomain,
    GatewayEvent,
};

/// What happened to one frame.
#[derive(Debug)]
pub enum FrameReport {
    /// Decoded by its owning domain.
    Ok(GatewayEvent),
    /// Owned by `domain`, but the payload failed validation.
    Invalid {
        domain: GatewayDomain,
        event_type: String,
    },
    /// No domain owns the event type.
    Unknown { event_type: String },
    /// The envelope itself was rejected.
    Rejected,
}

impl FrameReport {
    pub fn is_ok(&self) -> bool {
        matches!(self, FrameReport::Ok(_))
    }
}

impl fmt::Display for FrameReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameReport::Ok(event) => write!(f, "ok {} {}", event.domain(), event.event_type()),
            FrameReport::Invalid { domain, event_type } => {
                write!(f, "invalid {domain} {event_type}")
            }
            FrameReport::Unknown { event_type } => write!(f, "unknown {event_type}"),
            FrameReport::Rejected => f.write_str("rejected"),
        }
    }
}

/// Parses and decodes a single raw frame.
pub fn inspect_frame(raw: &str) -> FrameReport {
    let Some(envelope) = parse_gateway_event_envelope(raw) else {
        return FrameReport::Rejected;
    };
    let event_type = envelope.event_type();

    let Some(domain) = domain_for_event_type(event_type) else {
        return FrameReport::Unknown {
            event_type: event_type.to_string(),
        };
    };

    match decode_gateway_event(event_type, envelope.payload()) {
        Some(event) => FrameReport::Ok(event),
        None => FrameReport::Invalid {
            domain,
            event_type: event_type.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_frame() {
        let report =
            inspect_frame(r#"{"v":1,"t":"ready","d":{"user_id":"01HV4Z5PZQRVST1KVWB9YEMF6G"}}"#);
        assert!(report.is_ok());
        assert_eq!(report.to_string(), "ok session ready");
    }

    #[test]
    fn test_invalid_frame() {
        let report = inspect_frame(r#"{"v":1,"t":"ready","d":{}}"#);
        assert!(matches!(
            report,
            FrameReport::Invalid {
                domain: GatewayDomain::Session,
                ..
            }
        ));
        assert_eq!(report.to_string(), "invalid session ready");
    }

    #[test]
    fn test_unknown_frame() {
        let report = inspect_frame(r#"{"v":1,"t":"typing_start","d":{}}"#);
        assert_eq!(report.to_string(), "unknown typing_start");
        assert!(!report.is_ok());
    }

    #[test]
    fn test_rejected_frame() {
        assert_eq!(inspect_frame(r#"{"v":2,"t":"ready","d":{}}"#).to_string(), "rejected");
        assert_eq!(inspect_frame("").to_string(), "rejected");
    }
}
