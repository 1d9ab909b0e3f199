//! Accessor traits the threading core reads messages through.
//!
//! The tree never owns or inspects message content beyond these accessors,
//! so any record type (parsed emails, database rows, test fixtures) can be
//! threaded as long as it can answer "who am I" and "who do I reply to".

use chrono::{DateTime, Utc};

/// Identity and reply linkage of a message.
///
/// Both accessors return `None` for an absent value. An empty string is a
/// present value as far as the core is concerned; normalizing empty headers
/// to `None` is the job of the parsing layer.
pub trait Threadable {
    /// Message-ID of this message, if it has one.
    fn message_id(&self) -> Option<&str>;

    /// Message-ID this message replies to (`None` for a new topic).
    fn in_reply_to(&self) -> Option<&str>;

    /// Subject line, used only when summarizing threads.
    fn subject(&self) -> &str {
        ""
    }
}

/// Ordering key used by the ordered message sequence.
pub trait Timestamped {
    fn timestamp(&self) -> DateTime<Utc>;
}
