//! Built-in target table
//!
//! Seed candidates for the UI targets the domain services touch most. Each
//! target lists a primary selector and progressively looser fallbacks; the
//! registry keeps refining the ranking from live success/failure counts.

use crate::types::{SelectorCandidate, SelectorKind};

/// Default named targets with their ranked candidate chains
pub fn default_targets() -> Vec<(&'static str, Vec<SelectorCandidate>)> {
    vec![
        (
            "login_email",
            vec![
                SelectorCandidate::new("input[name=\"email\"]", SelectorKind::Css, 1),
                SelectorCandidate::new("input[id=\"email\"]", SelectorKind::Css, 2),
                SelectorCandidate::new(
                    "//input[@type=\"text\" or @type=\"email\"]",
                    SelectorKind::XPath,
                    3,
                ),
            ],
        ),
        (
            "login_password",
            vec![
                SelectorCandidate::new("input[name=\"pass\"]", SelectorKind::Css, 1),
                SelectorCandidate::new("input[id=\"pass\"]", SelectorKind::Css, 2),
                SelectorCandidate::new("//input[@type=\"password\"]", SelectorKind::XPath, 3),
            ],
        ),
        (
            "login_button",
            vec![
                SelectorCandidate::new("button[name=\"login\"]", SelectorKind::Css, 1),
                SelectorCandidate::new("button[type=\"submit\"]", SelectorKind::Css, 2),
                SelectorCandidate::new(
                    "//button[contains(text(), \"Log in\")]",
                    SelectorKind::XPath,
                    3,
                ),
            ],
        ),
        (
            "post_composer",
            vec![
                SelectorCandidate::new(
                    "[role=\"textbox\"][contenteditable=\"true\"]",
                    SelectorKind::Css,
                    1,
                ),
                SelectorCandidate::new(
                    "div[data-testid=\"status-attachment-mentions-input\"]",
                    SelectorKind::Css,
                    2,
                ),
                SelectorCandidate::new("//div[@role=\"textbox\"]", SelectorKind::XPath, 3),
            ],
        ),
        (
            "post_submit",
            vec![
                SelectorCandidate::new("[aria-label=\"Post\"]", SelectorKind::Css, 1),
                SelectorCandidate::new(
                    "div[aria-label=\"Post\"][role=\"button\"]",
                    SelectorKind::Css,
                    2,
                ),
                SelectorCandidate::new(
                    "//div[@role=\"button\" and contains(text(), \"Post\")]",
                    SelectorKind::XPath,
                    3,
                ),
            ],
        ),
        (
            "friend_request_button",
            vec![
                SelectorCandidate::new("[aria-label=\"Add friend\"]", SelectorKind::Css, 1),
                SelectorCandidate::new(
                    "div[aria-label=\"Add friend\"][role=\"button\"]",
                    SelectorKind::Css,
                    2,
                ),
                SelectorCandidate::new(
                    "//div[contains(text(), \"Add friend\")]",
                    SelectorKind::XPath,
                    3,
                ),
            ],
        ),
        (
            "message_composer",
            vec![
                SelectorCandidate::new("[aria-label=\"Message\"]", SelectorKind::Css, 1),
                SelectorCandidate::new(
                    "div[contenteditable=\"true\"][role=\"textbox\"]",
                    SelectorKind::Css,
                    2,
                ),
                SelectorCandidate::new("//div[@role=\"textbox\"]", SelectorKind::XPath, 3),
            ],
        ),
        (
            "like_button",
            vec![
                SelectorCandidate::new("[aria-label=\"Like\"]", SelectorKind::Css, 1),
                SelectorCandidate::new(
                    "div[aria-label=\"Like\"][role=\"button\"]",
                    SelectorKind::Css,
                    2,
                ),
                SelectorCandidate::new("//div[@aria-label=\"Like\"]", SelectorKind::XPath, 3),
            ],
        ),
        (
            "comment_input",
            vec![
                SelectorCandidate::new("[aria-label=\"Write a comment\"]", SelectorKind::Css, 1),
                SelectorCandidate::new(
                    "div[contenteditable=\"true\"][aria-label*=\"comment\"]",
                    SelectorKind::Css,
                    2,
                ),
                SelectorCandidate::new(
                    "//div[contains(@aria-label, \"comment\")]",
                    SelectorKind::XPath,
                    3,
                ),
            ],
        ),
        (
            "share_button",
            vec![
                SelectorCandidate::new(
                    "[aria-label=\"Send this to friends or post it on your timeline.\"]",
                    SelectorKind::Css,
                    1,
                ),
                SelectorCandidate::new("[aria-label*=\"Share\"]", SelectorKind::Css, 2),
                SelectorCandidate::new(
                    "//div[contains(@aria-label, \"Share\")]",
                    SelectorKind::XPath,
                    3,
                ),
            ],
        ),
    ]
}
