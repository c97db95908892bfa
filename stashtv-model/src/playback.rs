#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Per-item playback state kept for the lifetime of a feed session.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlaybackState {
    pub current_time_seconds: f64,
    pub paused: bool,
    pub muted: bool,
    pub loop_on_end: bool,
    pub subtitles_on: bool,
    pub ui_visible: bool,
    /// Scene info panel. Never survives a deactivation.
    pub scene_info_open: bool,
}

impl PlaybackState {
    /// First-access state for an item, seeded from the session mute preference.
    pub fn initial(muted: bool) -> Self {
        Self {
            current_time_seconds: 0.0,
            paused: false,
            muted,
            loop_on_end: false,
            subtitles_on: true,
            ui_visible: true,
            scene_info_open: false,
        }
    }

    pub fn apply(&mut self, patch: &PlaybackPatch) {
        if let Some(t) = patch.current_time_seconds {
            self.current_time_seconds = t.max(0.0);
        }
        if let Some(v) = patch.paused {
            self.paused = v;
        }
        if let Some(v) = patch.muted {
            self.muted = v;
        }
        if let Some(v) = patch.loop_on_end {
            self.loop_on_end = v;
        }
        if let Some(v) = patch.subtitles_on {
            self.subtitles_on = v;
        }
        if let Some(v) = patch.ui_visible {
            self.ui_visible = v;
        }
        if let Some(v) = patch.scene_info_open {
            self.scene_info_open = v;
        }
    }
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self::initial(false)
    }
}

/// Partial update to a [`PlaybackState`]. `None` leaves a field untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlaybackPatch {
    pub current_time_seconds: Option<f64>,
    pub paused: Option<bool>,
    pub muted: Option<bool>,
    pub loop_on_end: Option<bool>,
    pub subtitles_on: Option<bool>,
    pub ui_visible: Option<bool>,
    pub scene_info_open: Option<bool>,
}

impl PlaybackPatch {
    pub fn position(seconds: f64) -> Self {
        Self {
            current_time_seconds: Some(seconds),
            ..Self::default()
        }
    }

    pub fn paused(paused: bool) -> Self {
        Self {
            paused: Some(paused),
            ..Self::default()
        }
    }

    pub fn muted(muted: bool) -> Self {
        Self {
            muted: Some(muted),
            ..Self::default()
        }
    }
}
