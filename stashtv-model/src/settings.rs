#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Persisted plugin configuration handed over by the host shell.
///
/// Keys mirror the host's camelCase configuration store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct PluginSettings {
    #[cfg_attr(
        feature = "serde",
        serde(rename = "defaultFilterID", alias = "default_filter_id")
    )]
    pub default_filter_id: Option<String>,
    #[cfg_attr(feature = "serde", serde(alias = "hide_nav_button"))]
    pub hide_nav_button: Option<bool>,
    /// Upper bound on how many scenes a session materializes.
    #[cfg_attr(feature = "serde", serde(alias = "maximum_scenes"))]
    pub maximum_scenes: Option<usize>,
    /// Preferred caption language code.
    #[cfg_attr(feature = "serde", serde(alias = "subtitle_language"))]
    pub subtitle_language: Option<String>,
}
