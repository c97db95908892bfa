//! In-memory scene provider.

use async_trait::async_trait;
use stashtv_contracts::source::{SceneSource, SourceError};
use stashtv_model::RawScene;

/// Serves pages out of a fixed list of raw scenes. Used by the CLI simulator
/// and by hosts that already hold the whole result set.
#[derive(Debug, Clone, Default)]
pub struct VecSceneSource {
    scenes: Vec<RawScene>,
}

impl VecSceneSource {
    pub fn new(scenes: Vec<RawScene>) -> Self {
        Self { scenes }
    }

    /// Parse a JSON array of scenes in the server's shape.
    pub fn from_json(json: &str) -> Result<Self, SourceError> {
        serde_json::from_str(json)
            .map(Self::new)
            .map_err(|err| SourceError::Decode(err.to_string()))
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }
}

#[async_trait]
impl SceneSource for VecSceneSource {
    async fn fetch_batch(
        &self,
        offset: usize,
        count: usize,
    ) -> Result<Vec<RawScene>, SourceError> {
        let start = offset.min(self.scenes.len());
        let end = offset.saturating_add(count).min(self.scenes.len());
        Ok(self.scenes[start..end].to_vec())
    }
}
