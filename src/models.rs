use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::import::parser::{ParsedEmail, normalize_message_id};
use crate::threading::{Threadable, Timestamped};

// ===== Message Model =====

/// A message as the driver hands it to the threading core.
///
/// Also the record format of JSON message lists (`[{"message_id": ...}, ...]`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    #[serde(default, deserialize_with = "deserialize_id")]
    pub message_id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_id")]
    pub in_reply_to: Option<String>,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub author: String,
    pub date: DateTime<Utc>,
}

/// Blank ids in JSON records mean "absent", same as for parsed mail.
fn deserialize_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(normalize_message_id)
}

impl Message {
    pub fn new(
        message_id: Option<String>,
        in_reply_to: Option<String>,
        subject: impl Into<String>,
        date: DateTime<Utc>,
    ) -> Self {
        Message {
            message_id,
            in_reply_to,
            subject: subject.into(),
            author: String::new(),
            date,
        }
    }
}

impl Threadable for Message {
    fn message_id(&self) -> Option<&str> {
        self.message_id.as_deref()
    }

    fn in_reply_to(&self) -> Option<&str> {
        self.in_reply_to.as_deref()
    }

    fn subject(&self) -> &str {
        &self.subject
    }
}

impl Timestamped for Message {
    fn timestamp(&self) -> DateTime<Utc> {
        self.date
    }
}

impl From<ParsedEmail> for Message {
    /// In-Reply-To wins; otherwise the newest entry of References names the parent.
    fn from(parsed: ParsedEmail) -> Self {
        let in_reply_to = parsed
            .in_reply_to
            .or_else(|| parsed.references.last().cloned());

        let author = match (parsed.author_name.is_empty(), parsed.author_email.is_empty()) {
            (false, false) => format!("{} <{}>", parsed.author_name, parsed.author_email),
            (true, false) => parsed.author_email,
            (false, true) => parsed.author_name,
            (true, true) => String::new(),
        };

        Message {
            message_id: parsed.message_id,
            in_reply_to,
            subject: parsed.subject,
            author,
            date: parsed.date,
        }
    }
}

// ===== Output Models =====

/// One line of rendered output: a message and its nesting depth.
#[derive(Debug, Clone, Serialize)]
pub struct RenderedEntry<'a> {
    pub depth: usize,
    pub message: &'a Message,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn parsed(in_reply_to: Option<&str>, references: &[&str]) -> ParsedEmail {
        ParsedEmail {
            message_id: Some("child@example.com".to_string()),
            subject: "Re: hello".to_string(),
            date: Utc.with_ymd_and_hms(2019, 2, 20, 8, 30, 0).unwrap(),
            author_name: "Ada".to_string(),
            author_email: "ada@example.com".to_string(),
            in_reply_to: in_reply_to.map(str::to_string),
            references: references.iter().map(|r| r.to_string()).collect(),
        }
    }

    #[test]
    fn test_in_reply_to_takes_precedence() {
        let message = Message::from(parsed(Some("direct@x"), &["old@x", "newest@x"]));
        assert_eq!(message.in_reply_to.as_deref(), Some("direct@x"));
        assert_eq!(message.author, "Ada <ada@example.com>");
    }

    #[test]
    fn test_references_fallback_uses_last_entry() {
        let message = Message::from(parsed(None, &["old@x", "newest@x"]));
        assert_eq!(message.in_reply_to.as_deref(), Some("newest@x"));
    }

    #[test]
    fn test_no_parent_headers_is_new_topic() {
        let message = Message::from(parsed(None, &[]));
        assert!(message.in_reply_to.is_none());
    }

    #[test]
    fn test_json_record_defaults() {
        let message: Message =
            serde_json::from_str(r#"{"message_id": "1", "date": "2019-02-20T08:30:00Z"}"#).unwrap();
        assert_eq!(message.message_id.as_deref(), Some("1"));
        assert!(message.in_reply_to.is_none());
        assert!(message.subject.is_empty());
    }

    #[test]
    fn test_json_blank_ids_are_absent() {
        let message: Message = serde_json::from_str(
            r#"{"message_id": "  ", "in_reply_to": "", "date": "2019-02-20T08:30:00Z"}"#,
        )
        .unwrap();
        assert!(message.message_id.is_none());
        assert!(message.in_reply_to.is_none());

        let bracketed: Message = serde_json::from_str(
            r#"{"message_id": "<a@x>", "in_reply_to": null, "date": "2019-02-20T08:30:00Z"}"#,
        )
        .unwrap();
        assert_eq!(bracketed.message_id.as_deref(), Some("a@x"));
        assert!(bracketed.in_reply_to.is_none());
    }
}
