//! Message loading.
//!
//! Collects raw messages from the paths given on the command line and
//! parses them into [`Message`] records ready for threading.
//!
//! # Supported Inputs
//!
//! - **Message files**: one RFC 5322 message per file (`.eml` or anything else)
//! - **Directories**: every regular, non-hidden file directly inside
//! - **mbox files**: `.mbox` extension, or any file when `force_mbox` is set
//! - **JSON lists**: `.json` files holding an array of `Message` records
//!
//! # Data Flow
//!
//! 1. **Discovery**: expand directories and split mbox files into raw blobs
//! 2. **Parallel Parsing**: parse blobs on a Rayon pool (CPU-bound)
//! 3. **Collection**: keep successful parses, count and log failures
//!
//! I/O errors on an input path abort the load. A single message that fails
//! to parse does not.

pub mod parser;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;

use crate::config::ThreadingConfig;
use crate::error::LoadError;
use crate::models::Message;
use parser::parse_email;

/// Outcome of loading a set of input paths.
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Loaded messages, in discovery order (not yet time-ordered)
    pub messages: Vec<Message>,
    /// Raw messages parsed successfully
    pub parsed: usize,
    /// Raw messages rejected by the parser
    pub failed: usize,
    /// Messages read from JSON lists
    pub decoded: usize,
}

/// A raw message and where it came from, for log lines.
struct RawMessage {
    source: String,
    bytes: Vec<u8>,
}

/// Load every message reachable from `paths`.
pub fn load_paths(
    paths: &[PathBuf],
    force_mbox: bool,
    config: &ThreadingConfig,
) -> Result<LoadReport, LoadError> {
    let mut report = LoadReport::default();
    let mut raw = Vec::new();

    for path in paths {
        let metadata = fs::metadata(path).map_err(|e| LoadError::io(path, e))?;

        if metadata.is_dir() {
            collect_directory(path, &mut raw)?;
        } else if has_extension(path, "json") {
            let messages = read_json_list(path)?;
            report.decoded += messages.len();
            report.messages.extend(messages);
        } else if force_mbox || has_extension(path, "mbox") {
            collect_mbox(path, &mut raw)?;
        } else {
            let bytes = fs::read(path).map_err(|e| LoadError::io(path, e))?;
            raw.push(RawMessage {
                source: path.display().to_string(),
                bytes,
            });
        }
    }

    let (messages, parsed, failed) = parse_all_parallel(raw, config.parse_threads)?;
    report.messages.extend(messages);
    report.parsed = parsed;
    report.failed = failed;

    log::info!(
        "loaded {} messages ({} parsed, {} from JSON, {} rejected)",
        report.messages.len(),
        report.parsed,
        report.decoded,
        report.failed
    );

    Ok(report)
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
}

/// Queue every regular, non-hidden file in `dir`, sorted by name.
fn collect_directory(dir: &Path, raw: &mut Vec<RawMessage>) -> Result<(), LoadError> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| LoadError::io(dir, e))? {
        let entry = entry.map_err(|e| LoadError::io(dir, e))?;
        let path = entry.path();
        let hidden = entry.file_name().to_string_lossy().starts_with('.');
        if !hidden && path.is_file() {
            files.push(path);
        }
    }
    files.sort();

    log::debug!("found {} files in {}", files.len(), dir.display());

    for path in files {
        let bytes = fs::read(&path).map_err(|e| LoadError::io(&path, e))?;
        raw.push(RawMessage {
            source: path.display().to_string(),
            bytes,
        });
    }
    Ok(())
}

fn collect_mbox(path: &Path, raw: &mut Vec<RawMessage>) -> Result<(), LoadError> {
    let mbox = mbox_reader::MboxFile::from_file(path).map_err(|source| LoadError::Mbox {
        path: path.to_path_buf(),
        source,
    })?;

    let before = raw.len();
    for (position, entry) in mbox.iter().enumerate() {
        let Some(bytes) = entry.message() else {
            log::warn!("empty mbox entry {} in {}", position, path.display());
            continue;
        };
        raw.push(RawMessage {
            source: format!("{}#{}", path.display(), position),
            bytes: bytes.to_vec(),
        });
    }

    log::debug!("split {} messages out of {}", raw.len() - before, path.display());
    Ok(())
}

fn read_json_list(path: &Path) -> Result<Vec<Message>, LoadError> {
    let contents = fs::read(path).map_err(|e| LoadError::io(path, e))?;
    serde_json::from_slice(&contents).map_err(|source| LoadError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse raw messages in parallel on a dedicated Rayon pool.
///
/// Returns the parsed messages in input order with success and failure
/// counts. Individual parse failures are logged, not returned.
fn parse_all_parallel(
    raw: Vec<RawMessage>,
    threads: usize,
) -> Result<(Vec<Message>, usize, usize), LoadError> {
    if raw.is_empty() {
        return Ok((Vec::new(), 0, 0));
    }

    log::info!("parsing {} messages with {} threads", raw.len(), threads);

    let thread_pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads.max(1))
        .build()?;

    let parse_success = AtomicUsize::new(0);
    let parse_errors = AtomicUsize::new(0);

    let messages: Vec<Message> = thread_pool.install(|| {
        raw.par_iter()
            .filter_map(|item| match parse_email(&item.bytes) {
                Ok(email) => {
                    parse_success.fetch_add(1, Ordering::Relaxed);
                    Some(Message::from(email))
                }
                Err(e) => {
                    parse_errors.fetch_add(1, Ordering::Relaxed);
                    log::warn!("parse error for {}: {}", item.source, e);
                    None
                }
            })
            .collect()
    });

    let parsed = parse_success.load(Ordering::Relaxed);
    let failed = parse_errors.load(Ordering::Relaxed);
    log::info!("parsing complete: {} ok, {} errors", parsed, failed);

    Ok((messages, parsed, failed))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(source: &str, body: &str) -> RawMessage {
        RawMessage {
            source: source.to_string(),
            bytes: body.as_bytes().to_vec(),
        }
    }

    #[test]
    fn test_has_extension_is_case_insensitive() {
        assert!(has_extension(Path::new("list.JSON"), "json"));
        assert!(has_extension(Path::new("/tmp/archive.mbox"), "mbox"));
        assert!(!has_extension(Path::new("message.eml"), "mbox"));
        assert!(!has_extension(Path::new("noext"), "json"));
    }

    #[test]
    fn test_parse_all_parallel_keeps_order_and_counts_failures() {
        let items = vec![
            raw("a", "Message-ID: <a@x>\r\nDate: Mon, 4 Feb 2019 10:00:00 +0000\r\n\r\nA\r\n"),
            raw("bad", "Message-ID: <bad@x>\r\n\r\nno date\r\n"),
            raw("b", "Message-ID: <b@x>\r\nIn-Reply-To: <a@x>\r\nDate: Mon, 4 Feb 2019 11:00:00 +0000\r\n\r\nB\r\n"),
        ];

        let (messages, parsed, failed) = parse_all_parallel(items, 2).unwrap();
        assert_eq!(parsed, 2);
        assert_eq!(failed, 1);
        let ids: Vec<_> = messages.iter().map(|m| m.message_id.as_deref()).collect();
        assert_eq!(ids, vec![Some("a@x"), Some("b@x")]);
        assert_eq!(messages[1].in_reply_to.as_deref(), Some("a@x"));
    }

    #[test]
    fn test_parse_all_parallel_empty() {
        let (messages, parsed, failed) = parse_all_parallel(Vec::new(), 4).unwrap();
        assert!(messages.is_empty());
        assert_eq!((parsed, failed), (0, 0));
    }
}
