use std::fmt;

use stashtv_core::FeedError;
use thiserror::Error;

use crate::models::FeedConfig;

#[derive(Debug, Error)]
pub enum ConfigGuardRailError {
    #[error(transparent)]
    Tuning(#[from] FeedError),
    #[error("maximumScenes must be greater than zero")]
    ZeroSceneCap,
}

/// A setting the feed can run with, but badly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigWarning {
    /// Every activation sits inside the prefetch margin.
    MarginCoversPage { margin: usize, page_size: usize },
    /// The scene cap is reached within the first page.
    CapBelowPage { cap: usize, page_size: usize },
    TapFeedbackDisabled,
    ZeroNoticeCapacity,
    BlankSubtitleLanguage,
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MarginCoversPage { margin, page_size } => write!(
                f,
                "prefetch_margin ({margin}) is not smaller than page_size ({page_size}); every activation requests a page"
            ),
            Self::CapBelowPage { cap, page_size } => write!(
                f,
                "maximumScenes ({cap}) is below page_size ({page_size}); only one short page will load"
            ),
            Self::TapFeedbackDisabled => f.write_str(
                "tap_feedback_ms is 0; the play/pause indicator will never show",
            ),
            Self::ZeroNoticeCapacity => f.write_str(
                "notice_capacity is 0; a capacity of 1 is used and slow subscribers will lag",
            ),
            Self::BlankSubtitleLanguage => f.write_str(
                "subtitleLanguage is blank; the first caption track is used",
            ),
        }
    }
}

/// Reject configurations a session cannot start with and collect warnings
/// for ones that will run poorly.
pub fn apply_guard_rails(
    config: &FeedConfig,
) -> Result<Vec<ConfigWarning>, ConfigGuardRailError> {
    let tuning = &config.tuning;
    tuning.validate()?;
    if config.plugin.maximum_scenes == Some(0) {
        return Err(ConfigGuardRailError::ZeroSceneCap);
    }

    let mut warnings = Vec::new();
    if tuning.prefetch_margin >= tuning.page_size {
        warnings.push(ConfigWarning::MarginCoversPage {
            margin: tuning.prefetch_margin,
            page_size: tuning.page_size,
        });
    }
    if let Some(cap) = config.plugin.maximum_scenes
        && cap < tuning.page_size
    {
        warnings.push(ConfigWarning::CapBelowPage {
            cap,
            page_size: tuning.page_size,
        });
    }
    if tuning.tap_feedback_ms == 0 {
        warnings.push(ConfigWarning::TapFeedbackDisabled);
    }
    if tuning.notice_capacity == 0 {
        warnings.push(ConfigWarning::ZeroNoticeCapacity);
    }
    if config
        .plugin
        .subtitle_language
        .as_deref()
        .is_some_and(|lang| lang.trim().is_empty())
    {
        warnings.push(ConfigWarning::BlankSubtitleLanguage);
    }

    for warning in &warnings {
        tracing::warn!("{warning}");
    }
    Ok(warnings)
}
