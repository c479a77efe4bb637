//! Inspector configuration read from the environment.
//!
//! Command-line flags are applied on top in `main`.

use anyhow::{bail, Result};

#[derive(Debug, Clone)]
pub struct InspectConfig {
    pub log_level: String,
    pub log_json: bool,
}

impl InspectConfig {
    pub fn from_env() -> Result<Self> {
        let log_level = std::env::var("HEARTH_LOG_LEVEL").unwrap_or_else(|_| "warn".to_string());

        let log_json = match std::env::var("HEARTH_LOG_JSON") {
            Ok(v) => parse_flag("HEARTH_LOG_JSON", &v)?,
            Err(_) => false,
        };

        Ok(Self {
            log_level,
            log_json,
        })
    }
}

/// Parses a boolean environment value, rejecting anything unrecognized.
fn parse_flag(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => bail!("{name} must be a boolean, got {other:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag_accepts_booleans() {
        assert!(parse_flag("HEARTH_LOG_JSON", "1").unwrap());
        assert!(parse_flag("HEARTH_LOG_JSON", "TRUE").unwrap());
        assert!(!parse_flag("HEARTH_LOG_JSON", "false").unwrap());
        assert!(!parse_flag("HEARTH_LOG_JSON", "").unwrap());
    }

    #[test]
    fn test_parse_flag_rejects_garbage() {
        let err = parse_flag("HEARTH_LOG_JSON", "maybe").unwrap_err();
        assert!(err.to_string().contains("HEARTH_LOG_JSON"));
    }
}
