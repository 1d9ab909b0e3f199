//! Match rules for placing a new message relative to an existing node
//!
//! Every node visited by the placement search is classified against the
//! incoming message. Two outcomes end the search:
//!
//! - **Sibling**: both messages reply to the same thing (or both start new
//!   topics), so the new message joins the node's level.
//! - **Parent**: the node is the message being replied to, so the new
//!   message joins the node's reply list.
//!
//! The sibling rule is checked first. A node that satisfies both rules is a
//! sibling match.

use super::super::message::Threadable;

/// Outcome of comparing one tree node against the incoming message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeMatch {
    NoMatch,
    Sibling,
    Parent,
}

/// Classify `candidate` (already in the tree) against `incoming`.
pub fn classify<M: Threadable>(candidate: &M, incoming: &M) -> NodeMatch {
    if same_reply_target(candidate, incoming) {
        NodeMatch::Sibling
    } else if is_parent_of(candidate, incoming) {
        NodeMatch::Parent
    } else {
        NodeMatch::NoMatch
    }
}

/// Both messages reply to the same Message-ID, or both reply to nothing.
fn same_reply_target<M: Threadable>(candidate: &M, incoming: &M) -> bool {
    match (candidate.in_reply_to(), incoming.in_reply_to()) {
        (None, None) => true,
        (Some(left), Some(right)) => left == right,
        (Some(_), None) | (None, Some(_)) => false,
    }
}

/// `candidate` is the message `incoming` replies to.
///
/// An id-less candidate also counts as the parent of a new topic. The
/// sibling rule runs first, so this only fires when the candidate is itself
/// a reply, which happens when the first message of a batch is an orphan.
fn is_parent_of<M: Threadable>(candidate: &M, incoming: &M) -> bool {
    match (candidate.message_id(), incoming.in_reply_to()) {
        (Some(id), Some(parent_id)) => id == parent_id,
        (None, None) => true,
        (Some(_), None) | (None, Some(_)) => false,
    }
}
