//! Email threading module
//!
//! Organizes a time-ordered batch of messages into a reply hierarchy. Each
//! message either starts a new topic or is nested under the message named by
//! its In-Reply-To header; messages on the same level stay in arrival order.
//!
//! ## Threading Strategy
//!
//! Messages are inserted one at a time, oldest first. For each message a
//! breadth-first search over the tree built so far looks for:
//!
//! 1. **A sibling**: a node replying to the same Message-ID (or, for new
//!    topics, another new topic). The message joins the end of that level.
//! 2. **A parent**: the node whose Message-ID the message replies to. The
//!    message joins the end of that node's replies.
//!
//! The first node matching either rule wins, sibling checked first. If no node
//! matches, the message starts a new top-level thread, so insertion never
//! fails.
//!
//! ## Module Structure
//!
//! - `message`: Accessor traits the core reads messages through
//! - `ordered_list`: Timestamp-ordered input sequence
//! - `id_index`: Message-ID lookup index
//! - `container`: Arena nodes and thread summaries
//! - `algorithm`: Placement search and tree walk
//! - `tree`: The thread tree itself
//! - `stats`: Per-build placement counters

pub mod algorithm;
pub mod container;
pub mod id_index;
pub mod message;
pub mod ordered_list;
pub mod stats;
pub mod tree;

// Re-export main types and functions
pub use algorithm::{Placement, Render, RenderedMessage};
pub use container::{NodeId, ThreadNode, ThreadSummary};
pub use id_index::{MessageIndex, exists_as_reply_target};
pub use message::{Threadable, Timestamped};
pub use ordered_list::OrderedMessages;
pub use stats::ThreadingStats;
pub use tree::{BuildOptions, ThreadTree};
