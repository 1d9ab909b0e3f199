use std::env;
use std::str::FromStr;

use crate::threading::BuildOptions;

/// Interpret a switch value. Unrecognized text yields `None`.
fn parse_switch(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn read_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn switch_from_env(key: &str, fallback: bool) -> bool {
    match read_var(key) {
        Some(raw) => parse_switch(&raw).unwrap_or_else(|| {
            log::warn!("ignoring {}={:?}: expected a yes/no switch", key, raw);
            fallback
        }),
        None => fallback,
    }
}

fn parsed_from_env<T: FromStr>(key: &str, fallback: T) -> T {
    match read_var(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            log::warn!("ignoring {}={:?}: not a valid value", key, raw);
            fallback
        }),
        None => fallback,
    }
}

/// Runtime configuration for loading and threading.
///
/// Read from `MAIL_THREADER_*` environment variables; command-line flags
/// override individual fields after loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadingConfig {
    /// Skip the tree search for replies whose parent id is unknown.
    pub short_circuit_unknown_parents: bool,
    /// Worker threads used to parse message files.
    pub parse_threads: usize,
    /// Spaces per nesting level in text output.
    pub indent: usize,
}

impl ThreadingConfig {
    pub fn from_env() -> Self {
        Self {
            short_circuit_unknown_parents: switch_from_env("MAIL_THREADER_SHORT_CIRCUIT", true),
            parse_threads: parsed_from_env("MAIL_THREADER_PARSE_THREADS", num_cpus::get()).max(1),
            indent: parsed_from_env("MAIL_THREADER_INDENT", 2),
        }
    }

    pub fn build_options(&self) -> BuildOptions {
        BuildOptions {
            short_circuit_unknown_parents: self.short_circuit_unknown_parents,
        }
    }
}

impl Default for ThreadingConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_variables_use_fallback() {
        assert!(switch_from_env("MAIL_THREADER_TEST_UNSET_SWITCH", true));
        assert!(!switch_from_env("MAIL_THREADER_TEST_UNSET_SWITCH", false));
        assert_eq!(parsed_from_env("MAIL_THREADER_TEST_UNSET_COUNT", 7usize), 7);
    }

    #[test]
    fn test_parse_switch_accepts_both_polarities() {
        for on in ["1", "true", "YES", " on "] {
            assert_eq!(parse_switch(on), Some(true), "{on}");
        }
        for off in ["0", "False", "no", "OFF"] {
            assert_eq!(parse_switch(off), Some(false), "{off}");
        }
        assert_eq!(parse_switch("maybe"), None);
        assert_eq!(parse_switch(""), None);
    }

    #[test]
    fn test_build_options_follow_config() {
        let config = ThreadingConfig {
            short_circuit_unknown_parents: false,
            parse_threads: 1,
            indent: 4,
        };
        assert!(!config.build_options().short_circuit_unknown_parents);
    }
}
