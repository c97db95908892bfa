use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FeedError {
    #[error("feed runtime has shut down")]
    Closed,

    #[error("invalid feed tuning: {0}")]
    InvalidTuning(String),

    #[error("invalid plugin settings: {0}")]
    InvalidSettings(String),
}

pub type Result<T> = std::result::Result<T, FeedError>;
