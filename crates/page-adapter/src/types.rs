//! Core types for the browser-automation port

use std::fmt;

use serde::{Deserialize, Serialize};

/// Concrete element-location strategy
///
/// A closed set: the point where a locator is handed to the driver matches
/// exhaustively, so adding a strategy is a compile-visible change.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Locator {
    /// CSS selector
    Css(String),

    /// XPath expression
    XPath(String),

    /// Visible text content match
    Text(String),

    /// data-testid attribute value
    TestId(String),
}

impl Locator {
    /// Get strategy name as string
    pub fn kind_name(&self) -> &'static str {
        match self {
            Locator::Css(_) => "css",
            Locator::XPath(_) => "xpath",
            Locator::Text(_) => "text",
            Locator::TestId(_) => "testid",
        }
    }

    /// Get the raw selector value
    pub fn value(&self) -> &str {
        match self {
            Locator::Css(value)
            | Locator::XPath(value)
            | Locator::Text(value)
            | Locator::TestId(value) => value,
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind_name(), self.value())
    }
}

/// Element lifecycle state observed by waits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ElementState {
    /// Present in the DOM and rendered
    Visible,

    /// Present in the DOM, visibility not required
    Attached,

    /// Present but not rendered
    Hidden,
}

impl Default for ElementState {
    fn default() -> Self {
        ElementState::Visible
    }
}

/// Navigation settle condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NavWait {
    /// Load event fired
    Load,

    /// DOMContentLoaded fired
    DomContentLoaded,

    /// Network quiet after load
    NetworkIdle,
}

impl Default for NavWait {
    fn default() -> Self {
        NavWait::NetworkIdle
    }
}

/// Opaque handle to a live element owned by the driver
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementHandle {
    /// Driver-scoped element reference
    pub id: String,
}

impl ElementHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// Element bounding box in page coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    /// Center point of the box
    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}
