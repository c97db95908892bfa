use std::collections::HashMap;
use std::fs;

use stashtv_config::{
    ConfigGuardRailError, ConfigWarning, FeedConfig, FeedConfigSource,
    apply_guard_rails,
};

fn lookup(vars: &[(&str, String)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect();
    move |key| vars.get(key).cloned()
}

#[test]
fn falls_back_to_defaults_without_any_source() {
    let dir = tempfile::tempdir().unwrap();
    let (config, source) = FeedConfig::resolve(lookup(&[]), dir.path()).unwrap();
    assert_eq!(source, FeedConfigSource::Default);
    assert_eq!(config, FeedConfig::default());
}

#[test]
fn env_path_wins_over_inline_json_and_default_files() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("stashtv.toml"), "[tuning]\npage_size = 7\n")
        .unwrap();
    let explicit = dir.path().join("feed.toml");
    fs::write(
        &explicit,
        r#"
[plugin]
maximumScenes = 60
subtitleLanguage = "de"

[tuning]
page_size = 10
prefetch_margin = 3
"#,
    )
    .unwrap();

    let (config, source) = FeedConfig::resolve(
        lookup(&[
            ("STASHTV_CONFIG_PATH", explicit.display().to_string()),
            ("STASHTV_CONFIG_JSON", r#"{"tuning": {"page_size": 3}}"#.into()),
        ]),
        dir.path(),
    )
    .unwrap();

    assert_eq!(source, FeedConfigSource::EnvPath(explicit));
    assert_eq!(config.tuning.page_size, 10);
    assert_eq!(config.tuning.prefetch_margin, 3);
    assert_eq!(config.tuning.visibility_threshold, 0.8);
    assert_eq!(config.plugin.maximum_scenes, Some(60));
    assert_eq!(config.plugin.subtitle_language.as_deref(), Some("de"));
}

#[test]
fn inline_json_is_used_when_no_path_is_set() {
    let dir = tempfile::tempdir().unwrap();
    let (config, source) = FeedConfig::resolve(
        lookup(&[
            ("STASHTV_CONFIG_PATH", "   ".into()),
            (
                "STASHTV_CONFIG_JSON",
                r#"{"plugin": {"hideNavButton": true}}"#.into(),
            ),
        ]),
        dir.path(),
    )
    .unwrap();
    assert_eq!(source, FeedConfigSource::EnvInline);
    assert_eq!(config.plugin.hide_nav_button, Some(true));
}

#[test]
fn default_file_is_discovered_in_the_base_dir() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("config")).unwrap();
    let path = dir.path().join("config/stashtv.toml");
    fs::write(&path, "[tuning]\ntap_feedback_ms = 800\n").unwrap();

    let (config, source) = FeedConfig::resolve(lookup(&[]), dir.path()).unwrap();
    assert_eq!(source, FeedConfigSource::File(path));
    assert_eq!(config.tuning.tap_feedback_ms, 800);
}

#[test]
fn broken_inline_json_is_an_error_with_context() {
    let dir = tempfile::tempdir().unwrap();
    let err = FeedConfig::resolve(
        lookup(&[("STASHTV_CONFIG_JSON", "{not json".into())]),
        dir.path(),
    )
    .unwrap_err();
    assert!(format!("{err:#}").contains("STASHTV_CONFIG_JSON"));
}

#[test]
fn json_file_is_parsed_by_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("feed.json");
    fs::write(&path, r#"{"tuning": {"page_size": 12}}"#).unwrap();
    let config = FeedConfig::load_from_file(&path).unwrap();
    assert_eq!(config.tuning.page_size, 12);

    let toml_named = dir.path().join("feed.conf");
    fs::write(&toml_named, r#"{"tuning": {"page_size": 12}}"#).unwrap();
    assert!(FeedConfig::load_from_file(&toml_named).is_err());
}

#[test]
fn missing_file_reports_its_path() {
    let err = FeedConfig::load_from_file(std::path::Path::new(
        "/nonexistent/stashtv.toml",
    ))
    .unwrap_err();
    assert!(err.to_string().contains("/nonexistent/stashtv.toml"));
}

#[test]
fn guard_rails_reject_unusable_values() {
    let mut config = FeedConfig::default();
    config.tuning.page_size = 0;
    assert!(matches!(
        apply_guard_rails(&config),
        Err(ConfigGuardRailError::Tuning(_))
    ));

    let mut config = FeedConfig::default();
    config.tuning.visibility_threshold = 1.2;
    assert!(apply_guard_rails(&config).is_err());

    let mut config = FeedConfig::default();
    config.plugin.maximum_scenes = Some(0);
    assert!(matches!(
        apply_guard_rails(&config),
        Err(ConfigGuardRailError::ZeroSceneCap)
    ));
}

#[test]
fn guard_rails_warn_about_wide_margins() {
    assert!(apply_guard_rails(&FeedConfig::default()).unwrap().is_empty());

    let mut config = FeedConfig::default();
    config.tuning.page_size = 4;
    config.tuning.prefetch_margin = 4;
    config.plugin.maximum_scenes = Some(2);
    let warnings = apply_guard_rails(&config).unwrap();
    assert_eq!(
        warnings,
        vec![
            ConfigWarning::MarginCoversPage {
                margin: 4,
                page_size: 4
            },
            ConfigWarning::CapBelowPage {
                cap: 2,
                page_size: 4
            },
        ]
    );
    assert!(warnings[1].to_string().starts_with("maximumScenes (2)"));
}
