//! Thread placement algorithm
//!
//! Implements the breadth-first placement search used when inserting a
//! message into a thread tree, plus the depth-first walk used to read the
//! finished tree back out.
//!
//! ## Main Entry Points
//!
//! - `find_placement()` decides where one message goes.
//! - `Render` walks a tree in display order.

mod breadth_first;
mod matching;
mod traversal_queue;
mod tree_traversal;

pub use breadth_first::{Placement, find_placement};
pub use matching::{NodeMatch, classify};
pub use traversal_queue::TraversalQueue;
pub use tree_traversal::{Render, RenderedMessage, SiblingChain};
