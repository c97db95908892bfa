use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{feedback, loader, runtime, visibility};
use crate::error::{FeedError, Result};

/// Knobs for a feed session. Defaults match the compiled constants.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct FeedTuning {
    /// Scenes requested per fetch.
    pub page_size: usize,
    /// How close to the end of the window the active index may get before
    /// the next page is requested.
    pub prefetch_margin: usize,
    /// Visible fraction an item needs to count as on screen.
    pub visibility_threshold: f32,
    pub tap_feedback_ms: u64,
    /// Buffered notices per subscriber before slow subscribers lag.
    pub notice_capacity: usize,
    /// Initial session mute preference. Browsers only autoplay muted media.
    pub start_muted: bool,
}

impl Default for FeedTuning {
    fn default() -> Self {
        Self {
            page_size: loader::PAGE_SIZE,
            prefetch_margin: loader::PREFETCH_MARGIN,
            visibility_threshold: visibility::THRESHOLD,
            tap_feedback_ms: feedback::TAP_FEEDBACK.as_millis() as u64,
            notice_capacity: runtime::NOTICE_CAPACITY,
            start_muted: true,
        }
    }
}

impl FeedTuning {
    pub fn tap_feedback(&self) -> Duration {
        Duration::from_millis(self.tap_feedback_ms)
    }

    /// Reject values the session cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(FeedError::InvalidTuning(
                "page_size must be greater than zero".into(),
            ));
        }
        let threshold = self.visibility_threshold;
        if !(threshold > 0.0 && threshold <= 1.0) {
            return Err(FeedError::InvalidTuning(format!(
                "visibility_threshold must be in (0, 1], got {threshold}"
            )));
        }
        Ok(())
    }
}
