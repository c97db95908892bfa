#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use async_trait::async_trait;
use stashtv_core::contracts::player::PlayerAdapter;
use stashtv_core::contracts::source::{SceneSource, SourceError};
use stashtv_core::model::{Caption, PluginSettings, RawScene, RawScenePaths};
use stashtv_core::{
    FeedCommand, FeedSession, FeedTuning, ManualVisibility, SessionOutput,
};

#[derive(Debug, Clone, PartialEq)]
pub enum PlayerCall {
    Play,
    Pause,
    Seek(f64),
    Muted(bool),
    Looping(bool),
    Caption(Option<String>),
}

/// Player fake that records every control call. Clones share the log, so a
/// test keeps one copy while the session owns the boxed other.
#[derive(Debug, Clone, Default)]
pub struct RecordingPlayer {
    calls: Arc<Mutex<Vec<PlayerCall>>>,
    time: Arc<Mutex<f64>>,
}

impl RecordingPlayer {
    pub fn boxed(&self) -> Box<dyn PlayerAdapter> {
        Box::new(self.clone())
    }

    pub fn take_calls(&self) -> Vec<PlayerCall> {
        std::mem::take(&mut *self.calls.lock().unwrap())
    }

    /// Simulate the media element advancing on its own.
    pub fn advance_to(&self, seconds: f64) {
        *self.time.lock().unwrap() = seconds;
    }

    fn record(&self, call: PlayerCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl PlayerAdapter for RecordingPlayer {
    fn play(&mut self) {
        self.record(PlayerCall::Play);
    }

    fn pause(&mut self) {
        self.record(PlayerCall::Pause);
    }

    fn seek(&mut self, seconds: f64) {
        *self.time.lock().unwrap() = seconds;
        self.record(PlayerCall::Seek(seconds));
    }

    fn current_time(&self) -> f64 {
        *self.time.lock().unwrap()
    }

    fn set_muted(&mut self, muted: bool) {
        self.record(PlayerCall::Muted(muted));
    }

    fn set_looping(&mut self, looping: bool) {
        self.record(PlayerCall::Looping(looping));
    }

    fn set_caption(&mut self, caption: Option<&Caption>) {
        self.record(PlayerCall::Caption(caption.map(|c| c.lang.clone())));
    }
}

/// Provider that answers each call with the next scripted page.
#[derive(Debug, Default)]
pub struct ScriptedSource {
    pages: Mutex<VecDeque<Result<Vec<RawScene>, SourceError>>>,
    requests: Mutex<Vec<(usize, usize)>>,
}

impl ScriptedSource {
    pub fn new(
        pages: impl IntoIterator<Item = Result<Vec<RawScene>, SourceError>>,
    ) -> Self {
        Self {
            pages: Mutex::new(pages.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<(usize, usize)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl SceneSource for ScriptedSource {
    async fn fetch_batch(
        &self,
        offset: usize,
        count: usize,
    ) -> Result<Vec<RawScene>, SourceError> {
        self.requests.lock().unwrap().push((offset, count));
        self.pages
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

pub fn raw_scene(id: usize) -> RawScene {
    RawScene {
        id: Some(id.to_string()),
        paths: Some(RawScenePaths {
            stream: Some(format!("http://stash.local/scene/{id}/stream")),
            caption: None,
        }),
        ..RawScene::default()
    }
}

pub fn page(ids: std::ops::Range<usize>) -> Vec<RawScene> {
    ids.map(raw_scene).collect()
}

pub fn tuning(page_size: usize, start_muted: bool) -> FeedTuning {
    FeedTuning {
        page_size,
        prefetch_margin: 2,
        start_muted,
        ..FeedTuning::default()
    }
}

pub fn session(page_size: usize) -> FeedSession<ManualVisibility> {
    FeedSession::new(
        ManualVisibility,
        tuning(page_size, false),
        &PluginSettings::default(),
    )
    .unwrap()
}

/// Session with `count` scenes already loaded and a recording player
/// attached to every index.
pub fn loaded_session(
    page_size: usize,
    count: usize,
) -> (FeedSession<ManualVisibility>, Vec<RecordingPlayer>) {
    let mut s = session(page_size);
    let request = s.start().unwrap();
    s.complete_fetch(request.id, Ok(page(0..count)));

    let now = Instant::now();
    let players: Vec<RecordingPlayer> =
        (0..count).map(|_| RecordingPlayer::default()).collect();
    for (index, player) in players.iter().enumerate() {
        s.handle(
            FeedCommand::Register {
                index,
                handle: Some(()),
            },
            now,
        );
        s.handle(
            FeedCommand::AttachPlayer {
                index,
                player: player.boxed(),
            },
            now,
        );
        player.take_calls();
    }
    (s, players)
}

pub fn show(
    s: &mut FeedSession<ManualVisibility>,
    index: usize,
) -> SessionOutput {
    s.handle(FeedCommand::Visibility { index, ratio: 1.0 }, Instant::now())
}

pub fn hide(
    s: &mut FeedSession<ManualVisibility>,
    index: usize,
) -> SessionOutput {
    s.handle(FeedCommand::Visibility { index, ratio: 0.1 }, Instant::now())
}

pub fn send(
    s: &mut FeedSession<ManualVisibility>,
    command: FeedCommand,
) -> SessionOutput {
    s.handle(command, Instant::now())
}
