//! Name-derived auto-discovery patterns
//!
//! Tried only after every configured candidate has failed. The patterns are
//! deliberately generic: the goal is to survive a UI shuffle long enough for
//! the discovered candidate to earn a real ranking.

/// Generic CSS patterns derived from substrings of the target name
pub(crate) fn discovery_patterns(name: &str) -> Vec<String> {
    let mut patterns = Vec::new();

    if name.contains("button") {
        patterns.extend([
            "button[type=\"submit\"]".to_string(),
            "[role=\"button\"]".to_string(),
            "button".to_string(),
        ]);
    }

    if name.contains("input") || name.contains("email") || name.contains("password") {
        patterns.extend([
            "input[type=\"text\"]".to_string(),
            "input[type=\"email\"]".to_string(),
            "input[type=\"password\"]".to_string(),
            "input".to_string(),
        ]);
    }

    if name.contains("composer") || name.contains("textbox") {
        patterns.extend([
            "[role=\"textbox\"]".to_string(),
            "[contenteditable=\"true\"]".to_string(),
            "textarea".to_string(),
        ]);
    }

    patterns
}
