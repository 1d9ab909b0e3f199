//! Email parsing and normalization.
//!
//! Turns raw RFC 5322 message bytes into the handful of fields threading
//! needs. MIME parsing is done by the `mailparse` crate; dates go through
//! `dateparser`, which copes with the many Date header dialects seen in
//! real archives.
//!
//! # Threading Fields
//!
//! - **message_id**: the message's own identifier (optional; id-less
//!   messages can still be threaded, they just can't be replied to)
//! - **in_reply_to**: direct parent reference
//! - **references**: full reference chain from oldest to newest
//!
//! Identifiers are normalized the same way everywhere: the first `<...>`
//! token is taken when present (In-Reply-To often carries trailing
//! comments such as `<id> (Ada's message of ...)`), angle brackets and
//! whitespace are stripped, and an empty result counts as absent.
//!
//! # Error Handling
//!
//! A message without a usable Date cannot be ordered, so missing, invalid
//! and far-future dates are errors. Everything else degrades to defaults.

use std::sync::OnceLock;

use chrono::{DateTime, Duration, Utc};
use mailparse::{MailHeaderMap, parse_mail};
use regex::Regex;
use thiserror::Error;

/// Structured representation of a parsed email.
#[derive(Debug, Clone)]
pub struct ParsedEmail {
    pub message_id: Option<String>,
    pub subject: String,
    pub date: DateTime<Utc>,
    pub author_name: String,
    pub author_email: String,
    pub in_reply_to: Option<String>,
    pub references: Vec<String>,
}

/// Maximum tolerated clock skew for future-dated emails.
const MAX_FUTURE_SKEW: Duration = Duration::hours(24);

/// Errors that can be returned while parsing and validating an email.
#[derive(Debug, Error)]
pub enum ParseEmailError {
    #[error("failed to parse MIME structure: {0}")]
    MimeParse(#[from] mailparse::MailParseError),
    #[error("missing Date header for message {message}")]
    MissingDate { message: String },
    #[error("invalid Date header `{raw}` for message {message}: {error}")]
    InvalidDate {
        message: String,
        raw: String,
        error: String,
    },
    #[error("future Date header `{raw}` for message {message}")]
    FutureDate { message: String, raw: String },
}

static ANGLE_ID_REGEX: OnceLock<Regex> = OnceLock::new();

/// Matches a `<...>` token in a header value.
fn angle_id_regex() -> &'static Regex {
    ANGLE_ID_REGEX.get_or_init(|| Regex::new(r"<([^<>]*)>").expect("Invalid message id regex"))
}

/// Remove NUL bytes and surrounding whitespace
fn sanitize_text(text: &str) -> String {
    text.replace('\0', "").trim().to_string()
}

/// Clean and normalize a Message-ID style header value.
///
/// Blank values normalize to `None`. Also applied to JSON records.
pub(crate) fn normalize_message_id(raw: Option<String>) -> Option<String> {
    raw.and_then(|value| {
        let candidate = match angle_id_regex().captures(&value) {
            Some(caps) => caps.get(1).map_or("", |m| m.as_str()).to_string(),
            None => value.trim().trim_matches(&['<', '>'][..]).to_string(),
        };
        let cleaned = sanitize_text(&candidate);
        if cleaned.is_empty() { None } else { Some(cleaned) }
    })
}

/// Extract message IDs from a References header, oldest first.
///
/// Only bracketed tokens count when any are present, so comments between
/// ids are dropped.
fn extract_references(header_value: &str) -> Vec<String> {
    let ids: Vec<String> = if header_value.contains('<') {
        angle_id_regex()
            .captures_iter(header_value)
            .filter_map(|caps| caps.get(1))
            .map(|id| sanitize_text(id.as_str()))
            .collect()
    } else {
        header_value
            .split_whitespace()
            .map(|id| sanitize_text(id.trim_matches(&['<', '>'][..])))
            .collect()
    };
    ids.into_iter().filter(|id| !id.is_empty()).collect()
}

/// Parse an email from raw bytes into structured data.
///
/// # Defaults
///
/// - **Subject**: `"(No Subject)"`
/// - **Author**: empty name and address when From is missing or unparseable
/// - **Message-ID / In-Reply-To**: `None` when missing
/// - **References**: empty vector when missing
pub fn parse_email(raw: &[u8]) -> Result<ParsedEmail, ParseEmailError> {
    let parsed = parse_mail(raw).map_err(|e| {
        log::debug!("failed to parse MIME: {}", e);
        ParseEmailError::MimeParse(e)
    })?;

    let message_id = normalize_message_id(parsed.headers.get_first_value("Message-ID"));

    let subject = parsed
        .headers
        .get_first_value("Subject")
        .map(|s| sanitize_text(&s))
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "(No Subject)".to_string());

    let label = message_id
        .clone()
        .unwrap_or_else(|| format!("without Message-ID ({})", subject));

    let date = parse_email_date(parsed.headers.get_first_value("Date"), &label)?;

    let from_str = parsed.headers.get_first_value("From").unwrap_or_default();
    let (author_name, author_email) = match mailparse::addrparse(&from_str) {
        Ok(addrs) => match addrs.iter().next() {
            Some(mailparse::MailAddr::Single(info)) => (
                sanitize_text(info.display_name.as_deref().unwrap_or_default()),
                info.addr.to_lowercase(),
            ),
            _ => (String::new(), String::new()),
        },
        Err(_) => (String::new(), String::new()),
    };

    if author_email.is_empty() {
        log::debug!("email {} has no parseable From address", label);
    }

    let in_reply_to = normalize_message_id(parsed.headers.get_first_value("In-Reply-To"));

    let references = parsed
        .headers
        .get_first_value("References")
        .map(|v| extract_references(&v))
        .unwrap_or_default();

    log::trace!("parsed: {} - {}", label, subject);

    Ok(ParsedEmail {
        message_id,
        subject,
        date,
        author_name,
        author_email,
        in_reply_to,
        references,
    })
}

fn parse_email_date(raw_date: Option<String>, label: &str) -> Result<DateTime<Utc>, ParseEmailError> {
    let raw = raw_date.unwrap_or_default();
    if raw.trim().is_empty() {
        log::warn!("email {} missing Date header, skipping", label);
        return Err(ParseEmailError::MissingDate {
            message: label.to_string(),
        });
    }

    match dateparser::parse(&raw) {
        Ok(dt) => {
            let utc = dt.with_timezone(&Utc);
            if utc > Utc::now() + MAX_FUTURE_SKEW {
                log::warn!(
                    "email {} has future date `{}` (> {} hours ahead), skipping",
                    label,
                    raw,
                    MAX_FUTURE_SKEW.num_hours()
                );
                Err(ParseEmailError::FutureDate {
                    message: label.to_string(),
                    raw,
                })
            } else {
                Ok(utc)
            }
        }
        Err(source) => {
            log::warn!("email {} has invalid date `{}`, skipping: {}", label, raw, source);
            Err(ParseEmailError::InvalidDate {
                message: label.to_string(),
                raw,
                error: source.to_string(),
            })
        }
    }
}
