//! Append-only, index-stable scene window.

use std::ops::Range;

use stashtv_model::SceneRecord;

/// Ordered scenes materialized for the current session.
///
/// Once a scene lands at index `i` it stays there: playback state and the
/// scheduler key everything by index.
#[derive(Debug, Default)]
pub struct FeedWindow {
    scenes: Vec<SceneRecord>,
}

impl FeedWindow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a normalized batch, returning the indices it now occupies.
    pub fn append_batch(&mut self, batch: Vec<SceneRecord>) -> Range<usize> {
        let start = self.scenes.len();
        self.scenes.extend(batch);
        start..self.scenes.len()
    }

    pub fn get(&self, index: usize) -> Option<&SceneRecord> {
        self.scenes.get(index)
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SceneRecord> {
        self.scenes.iter()
    }
}
