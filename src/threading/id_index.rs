//! Message-ID index
//!
//! Point lookups from a Message-ID string to the message carrying it. The
//! thread builder only uses it to answer "does anything with this id exist
//! at all", which lets it skip searching for parents that cannot be found.

use std::collections::BTreeMap;

use super::message::Threadable;

/// Ordered map from Message-ID to a borrowed message.
#[derive(Debug)]
pub struct MessageIndex<'a, M> {
    by_id: BTreeMap<String, &'a M>,
}

impl<'a, M> Default for MessageIndex<'a, M> {
    fn default() -> Self {
        Self {
            by_id: BTreeMap::new(),
        }
    }
}

impl<'a, M: Threadable> MessageIndex<'a, M> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index every message that carries a Message-ID.
    pub fn from_messages<I>(messages: I) -> Self
    where
        I: IntoIterator<Item = &'a M>,
    {
        let mut index = Self::new();
        for message in messages {
            if let Some(id) = message.message_id() {
                index.insert(id, message);
            }
        }
        index
    }

    /// Register `message` under `id`.
    ///
    /// Returns `false` if the id was already taken; the first message seen
    /// with a given id stays indexed.
    pub fn insert(&mut self, id: &str, message: &'a M) -> bool {
        if self.by_id.contains_key(id) {
            log::warn!("duplicate Message-ID {}, keeping first occurrence", id);
            return false;
        }
        self.by_id.insert(id.to_string(), message);
        true
    }

    pub fn lookup(&self, id: &str) -> Option<&'a M> {
        self.by_id.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

/// Whether the message `message` replies to is known to the index.
///
/// New topics (no In-Reply-To) have no reply target and return `false`.
pub fn exists_as_reply_target<M: Threadable>(index: &MessageIndex<'_, M>, message: &M) -> bool {
    message
        .in_reply_to()
        .is_some_and(|parent_id| index.contains(parent_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Msg {
        id: Option<&'static str>,
        reply_to: Option<&'static str>,
    }

    impl Threadable for Msg {
        fn message_id(&self) -> Option<&str> {
            self.id
        }

        fn in_reply_to(&self) -> Option<&str> {
            self.reply_to
        }
    }

    fn msg(id: Option<&'static str>, reply_to: Option<&'static str>) -> Msg {
        Msg { id, reply_to }
    }

    #[test]
    fn test_lookup_finds_indexed_messages() {
        let a = msg(Some("a@example.com"), None);
        let b = msg(Some("b@example.com"), Some("a@example.com"));
        let index = MessageIndex::from_messages([&a, &b]);

        assert_eq!(index.len(), 2);
        assert!(std::ptr::eq(index.lookup("b@example.com").unwrap(), &b));
        assert!(index.lookup("zzz@example.com").is_none());
    }

    #[test]
    fn test_messages_without_id_are_skipped() {
        let anonymous = msg(None, Some("a@example.com"));
        let index = MessageIndex::from_messages([&anonymous]);
        assert!(index.is_empty());
    }

    #[test]
    fn test_duplicate_id_keeps_first() {
        let first = msg(Some("dup"), None);
        let second = msg(Some("dup"), Some("other"));
        let mut index = MessageIndex::new();

        assert!(index.insert("dup", &first));
        assert!(!index.insert("dup", &second));
        assert!(std::ptr::eq(index.lookup("dup").unwrap(), &first));
    }

    #[test]
    fn test_exists_as_reply_target() {
        let root = msg(Some("1"), None);
        let reply = msg(Some("2"), Some("1"));
        let orphan = msg(Some("3"), Some("999"));
        let index = MessageIndex::from_messages([&root, &reply, &orphan]);

        assert!(exists_as_reply_target(&index, &reply));
        assert!(!exists_as_reply_target(&index, &orphan));
        assert!(!exists_as_reply_target(&index, &root));
    }
}
