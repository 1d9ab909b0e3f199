//! Threading statistics tracking.
//!
//! Counts how each message ended up in the tree during a build.

use serde::Serialize;

use super::algorithm::Placement;

/// Statistics for one thread tree build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ThreadingStats {
    /// Number of messages placed in the tree (including the seed)
    pub messages: usize,
    /// Messages appended next to a node with the same reply target
    pub sibling_placements: usize,
    /// Messages appended to their parent's reply list
    pub parent_placements: usize,
    /// Messages that matched nothing and started a new top-level thread
    pub top_level_fallbacks: usize,
    /// Replies to unknown ids placed without a tree search. Each is also
    /// counted as a sibling placement or fallback, exactly as a full search
    /// would count it.
    pub short_circuits: usize,
    /// Deepest nesting level seen (0 when every message is top level)
    pub max_depth: usize,
}

impl ThreadingStats {
    pub(crate) fn record_seed(&mut self) {
        self.messages += 1;
    }

    pub(crate) fn record(&mut self, placement: Placement) {
        self.messages += 1;
        match placement {
            Placement::Sibling(_) => self.sibling_placements += 1,
            Placement::Parent(_) => self.parent_placements += 1,
            Placement::TopLevel => self.top_level_fallbacks += 1,
        }
    }

    /// Merge another ThreadingStats into this one.
    ///
    /// Counts are summed; the maximum depth is the larger of the two.
    pub fn merge(&mut self, other: ThreadingStats) {
        self.messages += other.messages;
        self.sibling_placements += other.sibling_placements;
        self.parent_placements += other.parent_placements;
        self.top_level_fallbacks += other.top_level_fallbacks;
        self.short_circuits += other.short_circuits;
        self.max_depth = self.max_depth.max(other.max_depth);
    }
}
