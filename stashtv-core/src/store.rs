//! Per-item playback state, keyed by window index.

use std::collections::HashMap;

use stashtv_model::{PlaybackPatch, PlaybackState};

#[derive(Debug, Default)]
pub struct PlaybackStore {
    entries: HashMap<usize, PlaybackState>,
    /// Session mute preference; seeds entries created after it changes.
    global_muted: bool,
}

impl PlaybackStore {
    pub fn new(global_muted: bool) -> Self {
        Self {
            entries: HashMap::new(),
            global_muted,
        }
    }

    /// Stored state, or the first-access default when `index` was never seen.
    pub fn get(&self, index: usize) -> PlaybackState {
        self.entries
            .get(&index)
            .copied()
            .unwrap_or_else(|| PlaybackState::initial(self.global_muted))
    }

    /// Apply a partial update, creating the entry if needed.
    pub fn set(&mut self, index: usize, patch: &PlaybackPatch) -> PlaybackState {
        let entry = self.entry(index);
        entry.apply(patch);
        *entry
    }

    pub fn entry(&mut self, index: usize) -> &mut PlaybackState {
        let muted = self.global_muted;
        self.entries
            .entry(index)
            .or_insert_with(|| PlaybackState::initial(muted))
    }

    pub fn contains(&self, index: usize) -> bool {
        self.entries.contains_key(&index)
    }

    pub fn global_muted(&self) -> bool {
        self.global_muted
    }

    pub fn set_global_muted(&mut self, muted: bool) {
        self.global_muted = muted;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
