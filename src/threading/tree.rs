//! Thread tree construction
//!
//! A `ThreadTree` is a forest of messages linked by "next sibling" and
//! "first reply" edges. It is built once from a time-ordered sequence by
//! inserting each message in turn; every insertion appends the message to
//! the tail of exactly one chain, so sibling order is arrival order.
//!
//! ## Insertion
//!
//! 1. **Search**: breadth-first over the existing tree for the first node
//!    that shares the new message's reply target (sibling) or is the
//!    message it replies to (parent).
//! 2. **Link**: append to that node's sibling chain or reply list.
//! 3. **Fallback**: with no match, append to the top level.
//!
//! Build the tree fully before reading it. `render()` borrows the tree, so
//! the borrow checker rules out interleaving traversal with insertion.

use crate::error::ThreadingError;

use super::algorithm::{NodeMatch, Placement, Render, SiblingChain, classify, find_placement};
use super::container::{NodeId, ThreadNode, ThreadSummary};
use super::id_index::{MessageIndex, exists_as_reply_target};
use super::message::{Threadable, Timestamped};
use super::ordered_list::OrderedMessages;
use super::stats::ThreadingStats;

/// Knobs for `ThreadTree::build_with_options`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildOptions {
    /// Place replies to ids missing from the index at the top level without
    /// searching. The result is the same as a full search.
    pub short_circuit_unknown_parents: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        BuildOptions {
            short_circuit_unknown_parents: true,
        }
    }
}

/// Reply hierarchy over borrowed messages.
#[derive(Debug)]
pub struct ThreadTree<'a, M> {
    nodes: Vec<ThreadNode<'a, M>>,
    head: Option<NodeId>,
    stats: ThreadingStats,
}

impl<'a, M> Default for ThreadTree<'a, M> {
    fn default() -> Self {
        ThreadTree {
            nodes: Vec::new(),
            head: None,
            stats: ThreadingStats::default(),
        }
    }
}

impl<'a, M: Threadable> ThreadTree<'a, M> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a tree from every message in `sequence`, in sequence order.
    ///
    /// The cursor of `sequence` is reset first and left exhausted.
    pub fn build_from_sequence(
        sequence: &mut OrderedMessages<'a, M>,
        index: &MessageIndex<'a, M>,
    ) -> Result<Self, ThreadingError>
    where
        M: Timestamped,
    {
        Self::build_with_options(sequence, index, BuildOptions::default())
    }

    pub fn build_with_options(
        sequence: &mut OrderedMessages<'a, M>,
        index: &MessageIndex<'a, M>,
        options: BuildOptions,
    ) -> Result<Self, ThreadingError>
    where
        M: Timestamped,
    {
        debug_assert!(sequence.is_ordered(), "message sequence is not time-ordered");

        sequence.reset();
        let first = sequence
            .next()
            .map_err(|_| ThreadingError::EmptySequence)?;

        let mut tree = ThreadTree::new();
        tree.seed(first);

        while sequence.has_next() {
            let message = sequence.next()?;
            if options.short_circuit_unknown_parents {
                tree.insert_with_index(message, index);
            } else {
                tree.insert(message);
            }
        }

        tree.stats.max_depth = tree.max_depth();
        log::info!(
            "threaded {} messages: {} top-level threads, {} parent and {} sibling placements, {} fallbacks, {} short-circuited, max depth {}",
            tree.stats.messages,
            tree.top_level().count(),
            tree.stats.parent_placements,
            tree.stats.sibling_placements,
            tree.stats.top_level_fallbacks,
            tree.stats.short_circuits,
            tree.stats.max_depth
        );

        Ok(tree)
    }

    /// Insert one message, searching the whole tree for its place.
    ///
    /// Never fails: a message with no match becomes a new top-level thread.
    /// Inserting into an empty tree makes the message the first top-level
    /// node.
    pub fn insert(&mut self, message: &'a M) -> NodeId {
        if self.head.is_none() {
            return self.seed(message);
        }

        let placement = find_placement(&self.nodes, self.head, message);
        self.place(message, placement)
    }

    /// Insert one message, consulting `index` before searching.
    ///
    /// A reply whose parent id is absent from the index cannot match any
    /// node as a parent, so it goes straight to the top level. Only the top
    /// level is scanned for an earlier orphan with the same reply target;
    /// such a match is recorded as a sibling placement, as the full search
    /// would record it.
    pub fn insert_with_index(&mut self, message: &'a M, index: &MessageIndex<'a, M>) -> NodeId {
        if self.head.is_some()
            && message.in_reply_to().is_some()
            && !exists_as_reply_target(index, message)
        {
            self.stats.short_circuits += 1;
            let placement = self
                .top_level()
                .find(|&id| classify(self.nodes[id.index()].message, message) == NodeMatch::Sibling)
                .map_or(Placement::TopLevel, Placement::Sibling);
            return self.place(message, placement);
        }

        self.insert(message)
    }

    fn seed(&mut self, message: &'a M) -> NodeId {
        let id = self.alloc(message);
        self.head = Some(id);
        self.stats.record_seed();
        log::trace!("seeded tree with {}", describe(message));
        id
    }

    fn place(&mut self, message: &'a M, placement: Placement) -> NodeId {
        let id = self.alloc(message);

        match placement {
            Placement::Sibling(anchor) => {
                log::trace!("{} placed as sibling", describe(message));
                self.append_sibling(anchor, id);
            }
            Placement::Parent(parent) => {
                log::trace!("{} placed as reply", describe(message));
                match self.nodes[parent.index()].first_reply {
                    Some(first) => self.append_sibling(first, id),
                    None => self.nodes[parent.index()].first_reply = Some(id),
                }
            }
            Placement::TopLevel => {
                log::trace!("{} placed at top level", describe(message));
                match self.head {
                    Some(head) => self.append_sibling(head, id),
                    None => self.head = Some(id),
                }
            }
        }

        self.stats.record(placement);
        id
    }

    fn alloc(&mut self, message: &'a M) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(ThreadNode::new(message));
        id
    }

    /// Link `new` after the last node of the chain containing `start`.
    fn append_sibling(&mut self, start: NodeId, new: NodeId) {
        let tail = SiblingChain::new(&self.nodes, Some(start))
            .last()
            .unwrap_or(start);
        self.nodes[tail.index()].next_sibling = Some(new);
    }
}

impl<'a, M> ThreadTree<'a, M> {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn head(&self) -> Option<NodeId> {
        self.head
    }

    pub fn node(&self, id: NodeId) -> &ThreadNode<'a, M> {
        &self.nodes[id.index()]
    }

    pub fn message(&self, id: NodeId) -> &'a M {
        self.nodes[id.index()].message
    }

    pub fn stats(&self) -> &ThreadingStats {
        &self.stats
    }

    /// Top-level nodes in arrival order.
    pub fn top_level(&self) -> SiblingChain<'_, 'a, M> {
        SiblingChain::new(&self.nodes, self.head)
    }

    /// Direct replies to `id` in arrival order.
    pub fn replies(&self, id: NodeId) -> SiblingChain<'_, 'a, M> {
        SiblingChain::new(&self.nodes, self.nodes[id.index()].first_reply)
    }

    /// Walk every message with its depth, depth-first.
    pub fn render(&self) -> Render<'_, 'a, M> {
        Render::new(&self.nodes, self.head)
    }

    fn max_depth(&self) -> usize {
        self.render().map(|entry| entry.depth).max().unwrap_or(0)
    }
}

impl<'a, M: Threadable + Timestamped> ThreadTree<'a, M> {
    /// One summary per top-level thread, in top-level order.
    pub fn threads(&self) -> Vec<ThreadSummary> {
        let mut summaries: Vec<ThreadSummary> = Vec::new();
        let mut walk = self.render();

        while let Some((id, depth)) = walk.next_node() {
            let message = self.message(id);
            if depth == 0 {
                summaries.push(ThreadSummary::new(
                    message.message_id().map(str::to_string),
                    message.subject().to_string(),
                    message.timestamp(),
                ));
            }
            if let Some(summary) = summaries.last_mut() {
                summary.add_member(id.index(), depth, message.timestamp());
            }
        }

        summaries
    }
}

fn describe<M: Threadable>(message: &M) -> String {
    match (message.message_id(), message.in_reply_to()) {
        (Some(id), Some(parent)) => format!("<{}> (reply to <{}>)", id, parent),
        (Some(id), None) => format!("<{}>", id),
        (None, Some(parent)) => format!("(no id, reply to <{}>)", parent),
        (None, None) => "(no id)".to_string(),
    }
}
