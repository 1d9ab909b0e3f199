//! Time-ordered message sequence
//!
//! Holds borrowed messages sorted by timestamp and exposes a resettable
//! cursor over them. The thread builder pulls messages through the cursor,
//! so sibling order in the finished tree follows the order kept here.

use crate::error::ThreadingError;

use super::message::Timestamped;

/// Messages kept in non-decreasing timestamp order.
///
/// Messages with equal timestamps stay in the order they were inserted.
/// The list never owns message content.
#[derive(Debug)]
pub struct OrderedMessages<'a, M> {
    messages: Vec<&'a M>,
    cursor: usize,
}

impl<'a, M> Default for OrderedMessages<'a, M> {
    fn default() -> Self {
        Self {
            messages: Vec::new(),
            cursor: 0,
        }
    }
}

impl<'a, M: Timestamped> OrderedMessages<'a, M> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a message at its timestamp position.
    ///
    /// The new message lands after every message with an equal or earlier
    /// timestamp, which keeps ties in arrival order. Inserting does not move
    /// the cursor.
    pub fn insert(&mut self, message: &'a M) {
        let timestamp = message.timestamp();
        let position = self
            .messages
            .partition_point(|existing| existing.timestamp() <= timestamp);
        self.messages.insert(position, message);

        if position < self.cursor {
            self.cursor += 1;
        }
    }

    /// Check that timestamps never decrease along the list.
    pub fn is_ordered(&self) -> bool {
        self.messages
            .windows(2)
            .all(|pair| pair[0].timestamp() <= pair[1].timestamp())
    }

    /// Move the cursor back to the first message.
    pub fn reset(&mut self) {
        self.cursor = 0;
    }

    pub fn has_next(&self) -> bool {
        self.cursor < self.messages.len()
    }

    /// Return the message under the cursor and advance.
    pub fn next(&mut self) -> Result<&'a M, ThreadingError> {
        let message = self
            .messages
            .get(self.cursor)
            .copied()
            .ok_or(ThreadingError::EndOfSequence)?;
        self.cursor += 1;
        Ok(message)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Iterate over all messages in order, independent of the cursor.
    pub fn iter(&self) -> impl Iterator<Item = &'a M> + '_ {
        self.messages.iter().copied()
    }
}

impl<'a, M: Timestamped> FromIterator<&'a M> for OrderedMessages<'a, M> {
    fn from_iter<I: IntoIterator<Item = &'a M>>(iter: I) -> Self {
        let mut list = OrderedMessages::new();
        for message in iter {
            list.insert(message);
        }
        list
    }
}
