//! Scene records exactly as the backing store returns them.
//!
//! Every field is optional because the server is free to send `null` for any
//! of them. The normalizer in `stashtv-core` turns these into
//! [`SceneRecord`](crate::SceneRecord)s and drops the ones that cannot play.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct RawScene {
    pub id: Option<String>,
    pub title: Option<String>,
    pub date: Option<String>,
    pub files: Vec<RawVideoFile>,
    pub paths: Option<RawScenePaths>,
    pub captions: Option<Vec<RawCaption>>,
    pub performers: Vec<RawPerformer>,
    pub studio: Option<RawStudio>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RawVideoFile {
    pub format: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RawScenePaths {
    pub stream: Option<String>,
    /// Base URI for caption downloads; tracks are addressed by query string.
    pub caption: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RawCaption {
    pub language_code: Option<String>,
    pub caption_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RawPerformer {
    pub name: Option<String>,
    pub gender: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RawStudio {
    pub name: Option<String>,
    pub parent_studio: Option<Box<RawStudio>>,
}
