//! Raw backing-store records to canonical [`SceneRecord`]s.

use chrono::NaiveDate;
use stashtv_model::{
    Caption, Gender, Performer, RawCaption, RawScene, SceneId, SceneRecord,
};
use url::Url;

use crate::constants::normalize::{DATE_FORMAT, DEFAULT_FORMAT};

/// Normalize one raw record. `None` means the record cannot be played and is
/// dropped from the feed.
pub fn normalize_scene(raw: RawScene) -> Option<SceneRecord> {
    let Some(id) = raw.id.as_deref().and_then(|id| SceneId::new(id).ok())
    else {
        tracing::debug!("dropping scene without id");
        return None;
    };

    let paths = raw.paths.unwrap_or_default();
    let Some(path) = paths.stream.as_deref().and_then(usable_uri) else {
        tracing::debug!(scene = %id, "dropping scene without usable stream path");
        return None;
    };

    let format = raw
        .files
        .iter()
        .find_map(|f| non_blank(f.format.as_deref()))
        .unwrap_or_else(|| DEFAULT_FORMAT.to_string());

    let date = non_blank(raw.date.as_deref()).and_then(|d| {
        NaiveDate::parse_from_str(&d, DATE_FORMAT)
            .map_err(|err| {
                tracing::trace!(scene = %id, date = %d, "unparseable date: {err}");
            })
            .ok()
    });

    let (studio, parent_studio) = match raw.studio {
        Some(studio) => (
            non_blank(studio.name.as_deref()),
            studio
                .parent_studio
                .and_then(|parent| non_blank(parent.name.as_deref())),
        ),
        None => (None, None),
    };

    let mut performers: Vec<Performer> = raw
        .performers
        .into_iter()
        .filter_map(|p| {
            let name = non_blank(p.name.as_deref())?;
            let gender = p
                .gender
                .as_deref()
                .map(|g| g.parse().unwrap_or(Gender::Unknown))
                .unwrap_or(Gender::Unknown);
            Some(Performer { name, gender })
        })
        .collect();
    // Stable: credits keep server order inside a gender rank.
    performers.sort_by_key(|p| p.gender.rank());

    let captions = match paths.caption.as_deref().and_then(usable_uri) {
        Some(base) => raw
            .captions
            .unwrap_or_default()
            .iter()
            .filter_map(|c| caption_from(&base, c))
            .collect(),
        None => Vec::new(),
    };

    Some(SceneRecord {
        id,
        format,
        path,
        title: non_blank(raw.title.as_deref()),
        date,
        studio,
        parent_studio,
        performers,
        captions,
    })
}

/// Normalize a whole provider batch, preserving order.
pub fn normalize_batch(batch: Vec<RawScene>) -> Vec<SceneRecord> {
    let requested = batch.len();
    let scenes: Vec<SceneRecord> =
        batch.into_iter().filter_map(normalize_scene).collect();
    let dropped = requested - scenes.len();
    if dropped > 0 {
        tracing::debug!(requested, dropped, "dropped invalid scene records");
    }
    scenes
}

fn caption_from(base: &str, raw: &RawCaption) -> Option<Caption> {
    let lang = non_blank(raw.language_code.as_deref())?;
    let format = non_blank(raw.caption_type.as_deref())?;
    let mut source = Url::parse(base).ok()?;
    source
        .query_pairs_mut()
        .append_pair("lang", &lang)
        .append_pair("type", &format);
    Some(Caption {
        format,
        lang,
        source: source.into(),
    })
}

fn usable_uri(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Url::parse(trimmed).ok().map(|_| trimmed.to_string())
}

fn non_blank(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
