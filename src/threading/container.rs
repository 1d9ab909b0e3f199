//! Node storage for the thread tree
//!
//! Nodes live in an arena owned by the tree and refer to each other through
//! `NodeId` handles. Each node has exactly two outgoing links: the next node
//! on its own level and the head of its reply list.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Handle to a node inside one `ThreadTree` arena.
///
/// Handles are only meaningful for the tree that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// One message placed in the tree.
#[derive(Debug)]
pub struct ThreadNode<'a, M> {
    /// Borrowed message; the tree never drops message content.
    pub message: &'a M,

    /// Next node on the same level (same parent, or top level).
    pub next_sibling: Option<NodeId>,

    /// First node in this message's reply list.
    pub first_reply: Option<NodeId>,
}

impl<'a, M> ThreadNode<'a, M> {
    pub fn new(message: &'a M) -> Self {
        ThreadNode {
            message,
            next_sibling: None,
            first_reply: None,
        }
    }
}

/// Summary of one top-level thread after building
///
/// Mirrors what a caller needs to list or persist conversations without
/// walking the tree itself.
#[derive(Debug, Clone, Serialize)]
pub struct ThreadSummary {
    /// Message-ID of the top-level message (`None` if it has no id)
    pub root_message_id: Option<String>,

    /// Subject of the top-level message
    pub subject: String,

    /// Earliest date in the thread
    pub start_date: DateTime<Utc>,

    /// Latest date in the thread
    pub last_date: DateTime<Utc>,

    /// (arena index, depth) pairs for every message in render order
    pub members: Vec<(usize, usize)>,
}

impl ThreadSummary {
    pub fn new(root_message_id: Option<String>, subject: String, date: DateTime<Utc>) -> Self {
        ThreadSummary {
            root_message_id,
            subject,
            start_date: date,
            last_date: date,
            members: Vec::new(),
        }
    }

    pub fn message_count(&self) -> usize {
        self.members.len()
    }

    /// Record one member and widen the date range to include it.
    pub fn add_member(&mut self, node: usize, depth: usize, date: DateTime<Utc>) {
        self.members.push((node, depth));
        if date < self.start_date {
            self.start_date = date;
        }
        if date > self.last_date {
            self.last_date = date;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_summary_tracks_date_range() {
        let first = Utc.with_ymd_and_hms(2019, 2, 1, 10, 0, 0).unwrap();
        let earlier = Utc.with_ymd_and_hms(2019, 1, 30, 8, 0, 0).unwrap();
        let later = Utc.with_ymd_and_hms(2019, 2, 3, 9, 0, 0).unwrap();

        let mut summary = ThreadSummary::new(Some("root".to_string()), "Hello".to_string(), first);
        summary.add_member(0, 0, first);
        summary.add_member(3, 1, later);
        summary.add_member(5, 1, earlier);

        assert_eq!(summary.message_count(), 3);
        assert_eq!(summary.start_date, earlier);
        assert_eq!(summary.last_date, later);
        assert_eq!(summary.members[1], (3, 1));
    }

    #[test]
    fn test_new_node_has_no_links() {
        let message = "payload";
        let node = ThreadNode::new(&message);
        assert!(node.next_sibling.is_none());
        assert!(node.first_reply.is_none());
    }
}
