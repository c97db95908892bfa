use std::str::FromStr;

use chrono::NaiveDate;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::ids::SceneId;

/// Performer gender as reported by Stash.
///
/// The feed only uses this to order performer credits, so the declaration
/// order below doubles as the display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum Gender {
    Female,
    TransgenderFemale,
    NonBinary,
    Intersex,
    TransgenderMale,
    Male,
    #[cfg_attr(feature = "serde", serde(other))]
    Unknown,
}

impl Gender {
    /// Sort rank, lower sorts first.
    pub fn rank(self) -> u8 {
        self as u8
    }
}

impl FromStr for Gender {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "FEMALE" => Ok(Gender::Female),
            "TRANSGENDER_FEMALE" => Ok(Gender::TransgenderFemale),
            "NON_BINARY" => Ok(Gender::NonBinary),
            "INTERSEX" => Ok(Gender::Intersex),
            "TRANSGENDER_MALE" => Ok(Gender::TransgenderMale),
            "MALE" => Ok(Gender::Male),
            "" | "UNKNOWN" => Ok(Gender::Unknown),
            other => Err(ModelError::UnknownGender(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Performer {
    pub name: String,
    pub gender: Gender,
}

/// A single subtitle track attached to a scene.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Caption {
    /// Track format tag, e.g. `vtt` or `srt`.
    pub format: String,
    /// Language code as reported by the server.
    pub lang: String,
    /// Fully resolved URI the player loads the track from.
    pub source: String,
}

/// Canonical, immutable scene shape consumed by the feed core.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SceneRecord {
    pub id: SceneId,
    /// Container/codec tag of the primary file.
    pub format: String,
    /// Absolute stream URI.
    pub path: String,
    pub title: Option<String>,
    pub date: Option<NaiveDate>,
    pub studio: Option<String>,
    pub parent_studio: Option<String>,
    pub performers: Vec<Performer>,
    pub captions: Vec<Caption>,
}

impl SceneRecord {
    /// Pick the caption track for a viewer language preference.
    ///
    /// An exact language match wins; otherwise the first track is used so a
    /// scene with subtitles never renders without them when they are enabled.
    pub fn caption_for(&self, lang: Option<&str>) -> Option<&Caption> {
        if let Some(lang) = lang
            && let Some(hit) = self
                .captions
                .iter()
                .find(|c| c.lang.eq_ignore_ascii_case(lang))
        {
            return Some(hit);
        }
        self.captions.first()
    }

    /// Title for display, falling back to the scene id.
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(self.id.as_str())
    }
}
