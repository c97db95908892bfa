use async_trait::async_trait;
use stashtv_model::RawScene;

/// Failure reported by a backing scene provider.
///
/// The feed treats every variant the same way (no records this round, retry on
/// the next qualifying scroll); the split only exists for logging.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SourceError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("failed to decode provider response: {0}")]
    Decode(String),

    #[error("provider error: {0}")]
    Provider(String),
}

/// Pages raw scene records out of the backing store.
///
/// Implementations own query construction, filtering and transport. An empty
/// `Ok` batch means the store has nothing past `offset` and the feed is
/// exhausted.
#[async_trait]
pub trait SceneSource: Send + Sync {
    async fn fetch_batch(
        &self,
        offset: usize,
        count: usize,
    ) -> Result<Vec<RawScene>, SourceError>;
}
