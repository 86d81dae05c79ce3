//! Human-pacing plan
//!
//! Randomized delay bounds inserted around every interaction so the traffic
//! shape stays irregular. All bounds are configuration; the defaults mirror
//! observed human interaction tempo.

use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Uniform delay range in milliseconds, sampled as `[min_ms, max_ms)`
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DelayRange {
    pub min_ms: u64,
    pub max_ms: u64,
}

impl DelayRange {
    pub const fn new(min_ms: u64, max_ms: u64) -> Self {
        Self { min_ms, max_ms }
    }

    /// Draw a delay from the range
    pub fn sample(&self) -> Duration {
        if self.max_ms <= self.min_ms {
            return Duration::from_millis(self.min_ms);
        }
        let ms = rand::thread_rng().gen_range(self.min_ms..self.max_ms);
        Duration::from_millis(ms)
    }
}

/// Delay bounds for every pacing primitive
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PacingPlan {
    /// Delay before each action attempt
    #[serde(default = "PacingPlan::default_pre_action")]
    pub pre_action: DelayRange,

    /// Delay between typed characters
    #[serde(default = "PacingPlan::default_per_char")]
    pub per_char: DelayRange,

    /// Delay before and after a click
    #[serde(default = "PacingPlan::default_around_click")]
    pub around_click: DelayRange,

    /// Settle after a pointer move, before the click lands
    #[serde(default = "PacingPlan::default_pointer_settle")]
    pub pointer_settle: DelayRange,

    /// Pause between scroll steps
    #[serde(default = "PacingPlan::default_scroll_pause")]
    pub scroll_pause: DelayRange,

    /// Scroll step count bounds (inclusive)
    #[serde(default = "PacingPlan::default_scroll_steps_min")]
    pub scroll_steps_min: u32,

    #[serde(default = "PacingPlan::default_scroll_steps_max")]
    pub scroll_steps_max: u32,

    /// Settle after a successful navigation
    #[serde(default = "PacingPlan::default_post_nav")]
    pub post_nav: DelayRange,
}

impl PacingPlan {
    fn default_pre_action() -> DelayRange {
        DelayRange::new(500, 2000)
    }

    fn default_per_char() -> DelayRange {
        DelayRange::new(50, 150)
    }

    fn default_around_click() -> DelayRange {
        DelayRange::new(100, 300)
    }

    fn default_pointer_settle() -> DelayRange {
        DelayRange::new(50, 150)
    }

    fn default_scroll_pause() -> DelayRange {
        DelayRange::new(100, 300)
    }

    fn default_scroll_steps_min() -> u32 {
        3
    }

    fn default_scroll_steps_max() -> u32 {
        6
    }

    fn default_post_nav() -> DelayRange {
        DelayRange::new(1000, 3000)
    }

    /// Draw a scroll step count
    pub fn scroll_steps(&self) -> u32 {
        let min = self.scroll_steps_min.max(1);
        let max = self.scroll_steps_max.max(min);
        rand::thread_rng().gen_range(min..=max)
    }
}

impl Default for PacingPlan {
    fn default() -> Self {
        Self {
            pre_action: Self::default_pre_action(),
            per_char: Self::default_per_char(),
            around_click: Self::default_around_click(),
            pointer_settle: Self::default_pointer_settle(),
            scroll_pause: Self::default_scroll_pause(),
            scroll_steps_min: Self::default_scroll_steps_min(),
            scroll_steps_max: Self::default_scroll_steps_max(),
            post_nav: Self::default_post_nav(),
        }
    }
}
