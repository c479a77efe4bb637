//! Shared payload decoding for every gateway domain.

use hearth_domain::DomainValidationError;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

/// Decodes a payload for a known event type, or drops it.
///
/// The payload must be a JSON object. Failures are logged with the event
/// type and the validation error, never the raw payload.
pub(crate) fn decode_payload<T: DeserializeOwned>(
    event_type: &'static str,
    payload: &Value,
) -> Option<T> {
    if !payload.is_object() {
        debug!(event_type, "Dropping gateway event with non-object payload");
        return None;
    }

    match <T as serde::Deserialize>::deserialize(payload) {
        Ok(decoded) => Some(decoded),
        Err(error) => {
            debug!(event_type, %error, "Dropping gateway event with invalid payload");
            None
        }
    }
}

/// Fails unless an update carries at least one field.
pub(crate) fn ensure_updated(present: &[bool]) -> Result<(), DomainValidationError> {
    if present.iter().any(|p| *p) {
        Ok(())
    } else {
        Err(DomainValidationError::EmptyUpdate {
            field: "updated_fields",
        })
    }
}

/// Fails unless two fields are either both present or both absent.
pub(crate) fn ensure_paired(
    a: bool,
    b: bool,
    reason: &'static str,
) -> Result<(), DomainValidationError> {
    if a == b {
        Ok(())
    } else {
        Err(DomainValidationError::Inconsistent {
            field: "updated_fields",
            reason,
        })
    }
}
