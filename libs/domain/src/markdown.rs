//! Pre-tokenized markdown, as rendered by the server.
//!
//! Clients never parse markdown themselves; they render this token stream.
//! Only the token kinds below are accepted and link targets are limited to
//! safe schemes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::bounded::BoundedVec;
use crate::closed_enum;
use crate::macros::define_text;
use crate::text::{check_len, check_printable_ascii};
use crate::DomainValidationError;

/// Maximum tokens in one rendered document.
pub const MAX_MARKDOWN_TOKENS: usize = 1024;

/// Maximum characters in a single text or code token.
pub const MAX_TOKEN_TEXT_LEN: usize = 4096;

const ALLOWED_LINK_SCHEMES: &[&str] = &["http://", "https://", "mailto:"];

fn check_href(field: &'static str, s: &str) -> Result<(), DomainValidationError> {
    check_printable_ascii(field, s, 1, 2048)?;
    let lower = s.to_ascii_lowercase();
    if !ALLOWED_LINK_SCHEMES
        .iter()
        .any(|scheme| lower.starts_with(scheme) && lower.len() > scheme.len())
    {
        return Err(DomainValidationError::InvalidFormat {
            field,
            reason: "must use http, https or mailto",
        });
    }
    Ok(())
}

fn check_token_text(field: &'static str, s: &str) -> Result<(), DomainValidationError> {
    check_len(field, s, 0, MAX_TOKEN_TEXT_LEN)
}

fn check_language(field: &'static str, s: &str) -> Result<(), DomainValidationError> {
    check_len(field, s, 1, 32)?;
    if !s
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'_' | b'+' | b'-' | b'.' | b'#'))
    {
        return Err(DomainValidationError::InvalidFormat {
            field,
            reason: "must be a plain language tag",
        });
    }
    Ok(())
}

define_text!(LinkHref, "href", check_href);
define_text!(TokenText, "text", check_token_text);
define_text!(CodeLanguage, "language", check_language);

closed_enum! {
    /// The kind tag of a markdown token.
    pub enum MarkdownTokenKind("markdown_token") {
        ParagraphStart => "paragraph_start",
        ParagraphEnd => "paragraph_end",
        EmphasisStart => "emphasis_start",
        EmphasisEnd => "emphasis_end",
        StrongStart => "strong_start",
        StrongEnd => "strong_end",
        ListStart => "list_start",
        ListEnd => "list_end",
        ListItemStart => "list_item_start",
        ListItemEnd => "list_item_end",
        LinkStart => "link_start",
        LinkEnd => "link_end",
        Text => "text",
        Code => "code",
        SoftBreak => "soft_break",
        HardBreak => "hard_break",
        FencedCode => "fenced_code",
    }
}

/// One rendered markdown token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MarkdownToken {
    ParagraphStart,
    ParagraphEnd,
    EmphasisStart,
    EmphasisEnd,
    StrongStart,
    StrongEnd,
    ListStart { ordered: bool },
    ListEnd,
    ListItemStart,
    ListItemEnd,
    LinkStart { href: LinkHref },
    LinkEnd,
    Text { text: TokenText },
    Code { code: TokenText },
    SoftBreak,
    HardBreak,
    FencedCode {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        language: Option<CodeLanguage>,
        code: TokenText,
    },
}

impl MarkdownToken {
    /// Returns the kind tag of this token.
    pub fn kind(&self) -> MarkdownTokenKind {
        match self {
            MarkdownToken::ParagraphStart => MarkdownTokenKind::ParagraphStart,
            MarkdownToken::ParagraphEnd => MarkdownTokenKind::ParagraphEnd,
            MarkdownToken::EmphasisStart => MarkdownTokenKind::EmphasisStart,
            MarkdownToken::EmphasisEnd => MarkdownTokenKind::EmphasisEnd,
            MarkdownToken::StrongStart => MarkdownTokenKind::StrongStart,
            MarkdownToken::StrongEnd => MarkdownTokenKind::StrongEnd,
            MarkdownToken::ListStart { .. } => MarkdownTokenKind::ListStart,
            MarkdownToken::ListEnd => MarkdownTokenKind::ListEnd,
            MarkdownToken::ListItemStart => MarkdownTokenKind::ListItemStart,
            MarkdownToken::ListItemEnd => MarkdownTokenKind::ListItemEnd,
            MarkdownToken::LinkStart { .. } => MarkdownTokenKind::LinkStart,
            MarkdownToken::LinkEnd => MarkdownTokenKind::LinkEnd,
            MarkdownToken::Text { .. } => MarkdownTokenKind::Text,
            MarkdownToken::Code { .. } => MarkdownTokenKind::Code,
            MarkdownToken::SoftBreak => MarkdownTokenKind::SoftBreak,
            MarkdownToken::HardBreak => MarkdownTokenKind::HardBreak,
            MarkdownToken::FencedCode { .. } => MarkdownTokenKind::FencedCode,
        }
    }
}

/// A bounded token stream.
pub type MarkdownTokens = BoundedVec<MarkdownToken, MAX_MARKDOWN_TOKENS>;

pub fn markdown_tokens_from_response(value: &Value) -> Result<MarkdownTokens, DomainValidationError> {
    crate::from_response("markdown_tokens", value)
}
