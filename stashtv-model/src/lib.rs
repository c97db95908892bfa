//! Core data model definitions shared across stashtv crates.
#![allow(missing_docs)]

pub use ::chrono;

pub mod error;
pub mod ids;
pub mod playback;
pub mod raw;
pub mod scene;
pub mod settings;

// Intentionally curated re-exports for downstream consumers.
pub use error::{ModelError, Result as ModelResult};
pub use ids::SceneId;
pub use playback::{PlaybackPatch, PlaybackState};
pub use raw::{
    RawCaption, RawPerformer, RawScene, RawScenePaths, RawStudio, RawVideoFile,
};
pub use scene::{Caption, Gender, Performer, SceneRecord};
pub use settings::PluginSettings;
