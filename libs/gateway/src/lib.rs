//! # hearth-gateway
//!
//! Parsing, decoding, and dispatch of realtime gateway events.
//!
//! ## Pipeline
//!
//! 1. [`parse_gateway_event_envelope`] checks the frame: size, JSON shape,
//!    protocol version, event name, and that the payload is an object
//! 2. The registry finds the domain that owns the event type
//! 3. That domain decodes the payload into a typed event, or drops it
//! 4. The matching handler runs, only for a valid payload
//!
//! Unknown event types and invalid payloads never raise; the client keeps
//! running and the frame is logged at `debug`.

mod decode;

pub mod envelope;
pub mod message;
pub mod presence;
pub mod profile;
pub mod registry;
pub mod session;
pub mod voice_stream;
pub mod workspace;
pub mod workspace_role;
pub mod workspace_role_assignment;

pub use envelope::{
    parse_gateway_event_envelope, GatewayEnvelope, GatewayEventName, GATEWAY_PROTOCOL_VERSION,
    MAX_GATEWAY_EVENT_BYTES, MAX_GATEWAY_EVENT_NAME_LEN,
};
pub use registry::{
    all_gateway_event_types, decode_gateway_event, dispatch_envelope, dispatch_gateway_event,
    domain_for_event_type, duplicate_gateway_event_types, find_duplicate_event_types,
    GatewayDomain, GatewayEvent, GatewayEventHandlers,
};
