//! Account and session credentials.

use hearth_id::UserId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::macros::{define_bounded_int, define_text};
use crate::text::{check_len, check_no_control, check_printable_ascii};
use crate::{id_from_input, DomainValidationError};

/// Username length bounds.
pub const USERNAME_MIN_LEN: usize = 3;
pub const USERNAME_MAX_LEN: usize = 32;

/// Password length bounds.
pub const PASSWORD_MIN_LEN: usize = 12;
pub const PASSWORD_MAX_LEN: usize = 128;

/// Access and refresh token length bounds.
pub const TOKEN_MIN_LEN: usize = 32;
pub const TOKEN_MAX_LEN: usize = 4096;

fn check_username(field: &'static str, s: &str) -> Result<(), DomainValidationError> {
    check_len(field, s, USERNAME_MIN_LEN, USERNAME_MAX_LEN)?;
    if !s
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'.')
    {
        return Err(DomainValidationError::InvalidFormat {
            field,
            reason: "may only contain letters, digits, '_' and '.'",
        });
    }
    Ok(())
}

fn check_password(field: &'static str, s: &str) -> Result<(), DomainValidationError> {
    check_len(field, s, PASSWORD_MIN_LEN, PASSWORD_MAX_LEN)?;
    check_no_control(field, s)
}

fn check_token(field: &'static str, s: &str) -> Result<(), DomainValidationError> {
    check_printable_ascii(field, s, TOKEN_MIN_LEN, TOKEN_MAX_LEN)
}

define_text!(
    /// Login name: 3-32 characters of `[A-Za-z0-9_.]`.
    Username,
    "username",
    check_username
);

define_text!(
    /// Account password as typed by the user.
    secret Password,
    "password",
    check_password
);

define_text!(
    /// Bearer token for API calls.
    secret AccessToken,
    "access_token",
    check_token
);

define_text!(
    /// Token exchanged for a fresh access token.
    secret RefreshToken,
    "refresh_token",
    check_token
);

define_bounded_int!(
    /// Access token lifetime in seconds.
    TokenLifetimeSecs,
    "expires_in_secs",
    1,
    86_400
);

pub fn username_from_input(raw: &str) -> Result<Username, DomainValidationError> {
    Username::parse(raw)
}

pub fn password_from_input(raw: &str) -> Result<Password, DomainValidationError> {
    Password::parse(raw)
}

pub fn access_token_from_input(raw: &str) -> Result<AccessToken, DomainValidationError> {
    AccessToken::parse(raw)
}

pub fn refresh_token_from_input(raw: &str) -> Result<RefreshToken, DomainValidationError> {
    RefreshToken::parse(raw)
}

pub fn user_id_from_input(raw: &str) -> Result<UserId, DomainValidationError> {
    id_from_input("user_id", raw)
}

/// Credentials issued by login and refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct AuthResponse {
    pub access_token: AccessToken,
    pub refresh_token: RefreshToken,
    pub expires_in_secs: TokenLifetimeSecs,
}

/// The authenticated account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct Me {
    pub user_id: UserId,
    pub username: Username,
}

pub fn auth_response_from_response(value: &Value) -> Result<AuthResponse, DomainValidationError> {
    crate::from_response("auth", value)
}

pub fn me_from_response(value: &Value) -> Result<Me, DomainValidationError> {
    crate::from_response("me", value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    const TOKEN: &str = "eyJhbGciOiJIUzI1NiJ9.abcdefghijklmnopqrstuvwx";

    #[test]
    fn test_username_bounds() {
        assert!(username_from_input("bob").is_ok());
        assert!(username_from_input("first.last_99").is_ok());
        assert!(username_from_input("ab").is_err());
        assert!(username_from_input(&"a".repeat(33)).is_err());
        assert!(username_from_input("has space").is_err());
        assert!(username_from_input("dash-name").is_err());
    }

    #[test]
    fn test_password_debug_is_redacted() {
        let password = password_from_input("correct horse battery").unwrap();
        assert_eq!(format!("{password:?}"), "Password([redacted])");
        assert!(password_from_input("short").is_err());
    }

    #[test]
    fn test_token_bounds() {
        assert!(access_token_from_input(TOKEN).is_ok());
        assert!(access_token_from_input("too-short").is_err());
        assert!(access_token_from_input(&format!("{TOKEN} x")).is_err());
        assert!(refresh_token_from_input(&"r".repeat(4096)).is_ok());
        assert!(refresh_token_from_input(&"r".repeat(4097)).is_err());
    }

    #[test]
    fn test_auth_response_from_response() {
        let value = json!({
            "access_token": TOKEN,
            "refresh_token": TOKEN,
            "expires_in_secs": 900
        });
        let auth = auth_response_from_response(&value).unwrap();
        assert_eq!(auth.expires_in_secs.get(), 900);
        assert_eq!(auth.access_token.as_str(), TOKEN);
    }

    #[test]
    fn test_auth_response_rejects_bad_lifetime() {
        let value = json!({
            "access_token": TOKEN,
            "refresh_token": TOKEN,
            "expires_in_secs": 0
        });
        let err = auth_response_from_response(&value).unwrap_err();
        assert_eq!(err.field(), "auth");
    }

    #[test]
    fn test_me_from_response() {
        let value = json!({"user_id": "01HV4Z2WQXKJNM8GPQY6VBKC3D", "username": "alice"});
        let me = me_from_response(&value).unwrap();
        assert_eq!(me.username.as_str(), "alice");

        let missing = json!({"username": "alice"});
        assert!(me_from_response(&missing).is_err());
    }

    #[test]
    fn test_me_serializes_camel_case() {
        let value = json!({"user_id": "01HV4Z2WQXKJNM8GPQY6VBKC3D", "username": "alice"});
        let me = me_from_response(&value).unwrap();
        let out = serde_json::to_value(&me).unwrap();
        assert_eq!(out["userId"], "01HV4Z2WQXKJNM8GPQY6VBKC3D");
    }

    proptest! {
        #[test]
        fn prop_valid_usernames_accepted(s in "[A-Za-z0-9_.]{3,32}") {
            prop_assert!(username_from_input(&s).is_ok());
        }
    }
}
