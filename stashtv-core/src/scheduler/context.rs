//! Read-only view of the session's active player.

use stashtv_contracts::player::PlayerAdapter;
use stashtv_model::PlaybackState;

use super::phase::ItemPhase;

/// Borrowed view of whatever is currently the playback target.
///
/// Helpers that need "the current player" resolve it through the scheduler
/// instead of a process-wide global.
#[derive(Debug, Clone, Copy)]
pub struct ActivePlayer<'a> {
    pub(super) index: usize,
    pub(super) state: PlaybackState,
    pub(super) player: Option<&'a dyn PlayerAdapter>,
}

impl ActivePlayer<'_> {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn phase(&self) -> ItemPhase {
        if self.state.paused {
            ItemPhase::ActivePaused
        } else {
            ItemPhase::ActivePlaying
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn has_live_player(&self) -> bool {
        self.player.is_some()
    }

    /// Live position when a player is attached, stored position otherwise.
    pub fn current_time(&self) -> f64 {
        self.player
            .map(|p| p.current_time())
            .unwrap_or(self.state.current_time_seconds)
    }
}
