//! Engine warnings with colored terminal output.
//!
//! Provides deduplication so that a misbehaving caller that issues the same
//! bad request every frame only produces a single line on stderr. Used by the
//! geometry engine, the software renderer and the scene loader.

use std::collections::HashSet;
use std::sync::Mutex;

/// ANSI color codes for terminal output
const YELLOW: &str = "\x1b[33m";
const RESET: &str = "\x1b[0m";

/// Global set of warnings we've already printed (to deduplicate)
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

fn warning_key(component: &str, message: &str) -> String {
    format!("[{component}] {message}")
}

/// Warn about a recoverable problem (prints once per unique message).
///
/// # Example
/// ```ignore
/// warn_once("Geometry", "background fill area must not be the margin area");
/// ```
///
/// # Panics
/// Panics if the global warning set mutex is poisoned.
pub fn warn_once(component: &str, message: &str) {
    let should_print = WARNED
        .lock()
        .unwrap()
        .get_or_insert_with(HashSet::new)
        .insert(warning_key(component, message));

    if should_print {
        eprintln!("{YELLOW}[Tessera {component}] ⚠ {message}{RESET}");
    }
}

/// Whether `warn_once` has already reported this exact message.
///
/// # Panics
/// Panics if the global warning set mutex is poisoned.
#[must_use]
pub fn has_warned(component: &str, message: &str) -> bool {
    WARNED
        .lock()
        .unwrap()
        .as_ref()
        .is_some_and(|set| set.contains(&warning_key(component, message)))
}

/// Clear all recorded warnings (call when loading a new scene)
///
/// # Panics
/// Panics if the global warning set mutex is poisoned.
pub fn clear_warnings() {
    let mut guard = WARNED.lock().unwrap();
    if let Some(set) = guard.as_mut() {
        set.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warn_once_records_message() {
        assert!(!has_warned("Test", "recorded once"));
        warn_once("Test", "recorded once");
        assert!(has_warned("Test", "recorded once"));
        // A second call is silently deduplicated.
        warn_once("Test", "recorded once");
        assert!(has_warned("Test", "recorded once"));
    }

    #[test]
    fn test_component_is_part_of_key() {
        warn_once("Alpha", "same text");
        assert!(has_warned("Alpha", "same text"));
        assert!(!has_warned("Beta", "same text"));
    }
}
