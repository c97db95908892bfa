use anyhow::{Context, anyhow};
use serde::{Deserialize, Serialize};
use stashtv_core::FeedTuning;
use stashtv_model::PluginSettings;
use std::{
    env, fs,
    path::{Path, PathBuf},
};

/// Path to a TOML or JSON config file.
pub const CONFIG_PATH_ENV: &str = "STASHTV_CONFIG_PATH";
/// Inline JSON config.
pub const CONFIG_JSON_ENV: &str = "STASHTV_CONFIG_JSON";

const DEFAULT_FILES: &[&str] =
    &["stashtv.toml", "stashtv.json", "config/stashtv.toml"];

/// Where the active configuration came from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FeedConfigSource {
    #[default]
    Default,
    EnvPath(PathBuf),
    EnvInline,
    File(PathBuf),
}

impl std::fmt::Display for FeedConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Default => f.write_str("built-in defaults"),
            Self::EnvPath(path) => {
                write!(f, "${CONFIG_PATH_ENV} ({})", path.display())
            }
            Self::EnvInline => write!(f, "${CONFIG_JSON_ENV}"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Everything a feed session is built from.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Host plugin settings. Accepts the host's camelCase keys
    /// (`maximumScenes`, `subtitleLanguage`, ...).
    pub plugin: PluginSettings,
    /// Paging, visibility and feedback knobs.
    pub tuning: FeedTuning,
}

impl FeedConfig {
    /// Load configuration using environment variables.
    /// Evaluation order:
    /// 1) `$STASHTV_CONFIG_PATH` (TOML or JSON file),
    /// 2) `$STASHTV_CONFIG_JSON` (inline JSON),
    /// 3) the first default file found in the working directory,
    /// 4) defaults.
    pub fn load_from_env() -> anyhow::Result<(Self, FeedConfigSource)> {
        Self::resolve(|key| env::var(key).ok(), Path::new("."))
    }

    /// [`FeedConfig::load_from_env`] against an arbitrary variable lookup and
    /// base directory.
    pub fn resolve(
        lookup: impl Fn(&str) -> Option<String>,
        base_dir: &Path,
    ) -> anyhow::Result<(Self, FeedConfigSource)> {
        if let Some(path_str) = lookup(CONFIG_PATH_ENV)
            && !path_str.trim().is_empty()
        {
            let path = PathBuf::from(path_str);
            let config = Self::load_from_file(&path)?;
            return Ok((config, FeedConfigSource::EnvPath(path)));
        }

        if let Some(raw) = lookup(CONFIG_JSON_ENV)
            && !raw.trim().is_empty()
        {
            let parsed = Self::parse_json(&raw)
                .with_context(|| format!("failed to parse {CONFIG_JSON_ENV}"))?;
            return Ok((parsed, FeedConfigSource::EnvInline));
        }

        if let Some(path) = Self::find_default_file(base_dir) {
            let config = Self::load_from_file(&path)?;
            return Ok((config, FeedConfigSource::File(path)));
        }

        Ok((Self::default(), FeedConfigSource::Default))
    }

    /// Read a config file. `.json` files are JSON, anything else is TOML.
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path).with_context(|| {
            format!("failed to read feed config from {}", path.display())
        })?;
        let is_json = path.extension().is_some_and(|ext| ext == "json");
        let parsed = if is_json {
            Self::parse_json(&contents)
        } else {
            Self::parse_toml(&contents)
        };
        parsed.with_context(|| format!("invalid feed config {}", path.display()))
    }

    pub fn parse_toml(raw: &str) -> anyhow::Result<Self> {
        toml::from_str(raw).map_err(|err| anyhow!("invalid feed config toml: {err}"))
    }

    pub fn parse_json(raw: &str) -> anyhow::Result<Self> {
        serde_json::from_str(raw)
            .map_err(|err| anyhow!("invalid feed config json: {err}"))
    }

    fn find_default_file(base_dir: &Path) -> Option<PathBuf> {
        DEFAULT_FILES
            .iter()
            .map(|name| base_dir.join(name))
            .find(|path| path.exists())
    }
}
