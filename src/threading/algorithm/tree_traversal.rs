//! Depth-first walk over a built thread tree
//!
//! Produces every message with its nesting depth: a node, then its whole
//! reply subtree, then its next sibling. The walk is iterative with an
//! explicit stack to avoid stack overflow on deeply nested threads.

use super::super::container::{NodeId, ThreadNode};

/// A message paired with its depth (0 for top-level messages).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderedMessage<'a, M> {
    pub depth: usize,
    pub message: &'a M,
}

/// Lazy depth-first iterator over a thread tree.
///
/// Each `Render` walks the tree once; call `ThreadTree::render` again for a
/// fresh walk.
pub struct Render<'t, 'a, M> {
    nodes: &'t [ThreadNode<'a, M>],
    stack: Vec<(NodeId, usize)>,
}

impl<'t, 'a, M> Render<'t, 'a, M> {
    pub(crate) fn new(nodes: &'t [ThreadNode<'a, M>], head: Option<NodeId>) -> Self {
        Render {
            nodes,
            stack: head.map(|head| (head, 0)).into_iter().collect(),
        }
    }

    /// Like `next`, but yields the arena handle alongside the depth.
    pub(crate) fn next_node(&mut self) -> Option<(NodeId, usize)> {
        let (current, depth) = self.stack.pop()?;
        let node = &self.nodes[current.index()];

        // Sibling is pushed first so the reply subtree comes out before it.
        if let Some(sibling) = node.next_sibling {
            self.stack.push((sibling, depth));
        }
        if let Some(reply) = node.first_reply {
            self.stack.push((reply, depth + 1));
        }

        Some((current, depth))
    }
}

impl<'t, 'a, M> Iterator for Render<'t, 'a, M> {
    type Item = RenderedMessage<'a, M>;

    fn next(&mut self) -> Option<Self::Item> {
        let (current, depth) = self.next_node()?;
        Some(RenderedMessage {
            depth,
            message: self.nodes[current.index()].message,
        })
    }
}

/// Iterator over one sibling chain, starting at `start`.
pub struct SiblingChain<'t, 'a, M> {
    nodes: &'t [ThreadNode<'a, M>],
    current: Option<NodeId>,
}

impl<'t, 'a, M> SiblingChain<'t, 'a, M> {
    pub(crate) fn new(nodes: &'t [ThreadNode<'a, M>], start: Option<NodeId>) -> Self {
        SiblingChain {
            nodes,
            current: start,
        }
    }
}

impl<'t, 'a, M> Iterator for SiblingChain<'t, 'a, M> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.current?;
        self.current = self.nodes[current.index()].next_sibling;
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linked(labels: &'static [&'static str]) -> Vec<ThreadNode<'static, &'static str>> {
        labels.iter().map(ThreadNode::new).collect()
    }

    #[test]
    fn test_render_visits_replies_before_next_sibling() {
        // a
        //   b
        //     d
        //   c
        // e
        let mut nodes = linked(&["a", "b", "c", "d", "e"]);
        nodes[0].first_reply = Some(NodeId(1));
        nodes[0].next_sibling = Some(NodeId(4));
        nodes[1].next_sibling = Some(NodeId(2));
        nodes[1].first_reply = Some(NodeId(3));

        let rendered: Vec<(usize, &str)> = Render::new(&nodes, Some(NodeId(0)))
            .map(|entry| (entry.depth, *entry.message))
            .collect();

        assert_eq!(
            rendered,
            vec![(0, "a"), (1, "b"), (2, "d"), (1, "c"), (0, "e")]
        );
    }

    #[test]
    fn test_render_empty() {
        let nodes = linked(&[]);
        assert_eq!(Render::new(&nodes, None).count(), 0);
    }

    #[test]
    fn test_sibling_chain() {
        let mut nodes = linked(&["a", "b", "c"]);
        nodes[0].next_sibling = Some(NodeId(2));

        let chain: Vec<NodeId> = SiblingChain::new(&nodes, Some(NodeId(0))).collect();
        assert_eq!(chain, vec![NodeId(0), NodeId(2)]);
    }
}
