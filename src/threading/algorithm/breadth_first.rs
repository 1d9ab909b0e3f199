//! Breadth-first search for the insertion point of a new message
//!
//! Starting at the head of the top level, nodes are visited through a FIFO
//! queue. After a node fails both match rules, its reply-list head and then
//! its next sibling are queued. The first node that matches decides the
//! placement; if the queue drains first, the message starts a new top-level
//! thread.
//!
//! The search only reads the arena. Linking the new node is left to the
//! caller, which keeps "find" and "mutate" as separate steps.

use super::super::container::{NodeId, ThreadNode};
use super::super::message::Threadable;
use super::matching::{NodeMatch, classify};
use super::traversal_queue::TraversalQueue;

/// Where a new message goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Append to the end of this node's sibling chain.
    Sibling(NodeId),
    /// Append to the end of this node's reply list.
    Parent(NodeId),
    /// No match anywhere; append to the end of the top level.
    TopLevel,
}

/// Find where `incoming` belongs in the tree rooted at `head`.
///
/// Each node is visited at most once, so the search is linear in the size
/// of the tree.
pub fn find_placement<M: Threadable>(
    nodes: &[ThreadNode<'_, M>],
    head: Option<NodeId>,
    incoming: &M,
) -> Placement {
    let mut queue = TraversalQueue::new();
    if let Some(head) = head {
        queue.enqueue(head);
    }

    while let Some(current) = queue.dequeue() {
        let node = &nodes[current.index()];

        match classify(node.message, incoming) {
            NodeMatch::Sibling => return Placement::Sibling(current),
            NodeMatch::Parent => return Placement::Parent(current),
            NodeMatch::NoMatch => {}
        }

        if let Some(reply) = node.first_reply {
            queue.enqueue(reply);
        }
        if let Some(sibling) = node.next_sibling {
            queue.enqueue(sibling);
        }
    }

    Placement::TopLevel
}
