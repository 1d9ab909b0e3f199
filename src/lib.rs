//! Reply threading for email archives.
//!
//! Builds a reply hierarchy ("thread tree") from a batch of messages: every
//! message either starts a new topic or is nested under the message it
//! replies to, with siblings kept in timestamp order. The core lives in
//! [`threading`]; [`import`] and [`display`] are the loading and output
//! sides used by the `mail-threader` binary.

pub mod config;
pub mod display;
pub mod error;
pub mod import;
pub mod models;
pub mod threading;

use std::sync::Once;

use env_logger::Env;

use crate::error::ThreadingError;
use crate::models::Message;
use crate::threading::{BuildOptions, MessageIndex, OrderedMessages, ThreadTree};

static LOGGER: Once = Once::new();

/// Initialize `env_logger` once; `RUST_LOG` overrides the `info` default.
pub fn init_logger() {
    LOGGER.call_once(|| {
        env_logger::Builder::from_env(Env::default().default_filter_or("info"))
            .format_timestamp(None)
            .init();
    });
}

/// Thread a slice of messages in timestamp order.
///
/// Sorts the messages into an ordered sequence, indexes them by Message-ID
/// and builds the tree. The tree borrows from `messages`.
pub fn thread_messages(
    messages: &[Message],
    options: BuildOptions,
) -> Result<ThreadTree<'_, Message>, ThreadingError> {
    let mut sequence: OrderedMessages<'_, Message> = messages.iter().collect();
    let index = MessageIndex::from_messages(messages.iter());
    log::debug!(
        "threading {} messages ({} distinct Message-IDs)",
        sequence.len(),
        index.len()
    );
    ThreadTree::build_with_options(&mut sequence, &index, options)
}
