//! One feed session: tracker, scheduler and loader behind a single command
//! entry point.
//!
//! [`FeedSession`] is synchronous and does no I/O. Commands go in through
//! [`FeedSession::handle`], fetch answers through
//! [`FeedSession::complete_fetch`], and both return a [`SessionOutput`] with
//! the page to request next (if any) and the notices to publish. The
//! [`crate::runtime`] module drives it from a tokio task.

use std::time::Instant;

use serde::Serialize;
use stashtv_contracts::player::PlayerAdapter;
use stashtv_contracts::source::SourceError;
use stashtv_contracts::visibility::VisibilitySource;
use stashtv_model::{PlaybackState, PluginSettings, RawScene, SceneId};

use crate::error::{FeedError, Result};
use crate::events::FeedNotice;
use crate::loader::{BatchOutcome, FetchCursor, FetchRequest, WindowedFeedLoader};
use crate::scheduler::{
    ActivePlayer, DisplayFlags, ItemPhase, Scheduler, TapFeedback, Transition,
};
use crate::tracker::IntersectionTracker;
use crate::tuning::FeedTuning;
use crate::window::FeedWindow;

/// Discrete intents from the platform and the rendering layer.
#[derive(Debug)]
pub enum FeedCommand<H = ()> {
    Register { index: usize, handle: Option<H> },
    Unregister { index: usize },
    /// Raw visible fraction for an observed item.
    Visibility { index: usize, ratio: f32 },
    AttachPlayer {
        index: usize,
        player: Box<dyn PlayerAdapter>,
    },
    DetachPlayer { index: usize },
    Tap { index: usize },
    ToggleMute { index: usize },
    ToggleSubtitles { index: usize },
    ToggleLoop { index: usize },
    ToggleUi { index: usize },
    ToggleSceneInfo { index: usize },
    Scrub { index: usize, seconds: f64 },
    /// Position report from the item's player.
    TimeUpdate { index: usize, seconds: f64 },
    ToggleFullscreen,
    ToggleLetterbox,
    OpenSettings,
    CloseSettings,
    ExpireTapFeedback { id: u64 },
}

/// What the driver has to do after a command or completion.
#[derive(Debug, Default)]
pub struct SessionOutput {
    pub fetch: Option<FetchRequest>,
    pub notices: Vec<FeedNotice>,
}

impl SessionOutput {
    fn push(&mut self, notice: FeedNotice) {
        self.notices.push(notice);
    }

    fn transition(&mut self, transition: Transition) {
        if transition.is_change() {
            self.push(FeedNotice::ActiveChanged {
                previous: transition.previous,
                current: transition.current,
            });
        }
    }

    fn item(&mut self, index: usize, state: PlaybackState) {
        self.push(FeedNotice::ItemUpdated { index, state });
    }
}

/// Render-facing view of one window item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemSnapshot {
    pub index: usize,
    pub scene_id: SceneId,
    pub phase: ItemPhase,
    pub state: PlaybackState,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub active: Option<usize>,
    pub cursor: FetchCursor,
    pub exhausted: bool,
    pub display: DisplayFlags,
    pub settings_open: bool,
    pub items: Vec<ItemSnapshot>,
}

#[derive(Debug)]
pub struct FeedSession<S: VisibilitySource> {
    tracker: IntersectionTracker<S>,
    scheduler: Scheduler,
    loader: WindowedFeedLoader,
    tuning: FeedTuning,
    exhaustion_reported: bool,
}

impl<S: VisibilitySource> FeedSession<S> {
    pub fn new(
        source: S,
        tuning: FeedTuning,
        settings: &PluginSettings,
    ) -> Result<Self> {
        tuning.validate()?;
        if settings.maximum_scenes == Some(0) {
            return Err(FeedError::InvalidSettings(
                "maximumScenes must be greater than zero".into(),
            ));
        }
        Ok(Self {
            tracker: IntersectionTracker::new(
                source,
                tuning.visibility_threshold,
            ),
            scheduler: Scheduler::new(
                tuning.start_muted,
                settings.subtitle_language.clone(),
            ),
            loader: WindowedFeedLoader::new(
                tuning.page_size,
                tuning.prefetch_margin,
                settings.maximum_scenes,
            ),
            tuning,
            exhaustion_reported: false,
        })
    }

    pub fn tuning(&self) -> &FeedTuning {
        &self.tuning
    }

    /// First page for an empty window.
    pub fn start(&mut self) -> Option<FetchRequest> {
        self.loader.prime()
    }

    pub fn handle(
        &mut self,
        command: FeedCommand<S::Handle>,
        now: Instant,
    ) -> SessionOutput {
        let mut out = SessionOutput::default();
        let window = self.loader.window();

        match command {
            FeedCommand::Register { index, handle } => {
                self.tracker.register(index, handle.as_ref());
            }
            FeedCommand::Unregister { index } => {
                self.tracker.unregister(index);
                self.scheduler.forget_visible(index);
            }
            FeedCommand::Visibility { index, ratio } => {
                if let Some(change) = self.tracker.report(index, ratio) {
                    let transition =
                        self.scheduler.on_visibility(change, window);
                    out.transition(transition);
                }
            }
            FeedCommand::AttachPlayer { index, player } => {
                self.scheduler.attach_player(index, player, window);
            }
            FeedCommand::DetachPlayer { index } => {
                // The host is tearing the element down; nothing to hand back.
                drop(self.scheduler.detach_player(index));
            }
            FeedCommand::Tap { index } => {
                if let Some(feedback) = self.scheduler.tap(index, now) {
                    out.item(index, self.scheduler.render_state(index));
                    out.push(FeedNotice::TapFeedbackShown(feedback));
                }
            }
            FeedCommand::ToggleMute { index } => {
                self.scheduler.toggle_mute(index);
                out.item(index, self.scheduler.render_state(index));
            }
            FeedCommand::ToggleSubtitles { index } => {
                self.scheduler.toggle_subtitles(index, window);
                out.item(index, self.scheduler.render_state(index));
            }
            FeedCommand::ToggleLoop { index } => {
                self.scheduler.toggle_loop(index);
                out.item(index, self.scheduler.render_state(index));
            }
            FeedCommand::ToggleUi { index } => {
                self.scheduler.toggle_ui(index);
                out.item(index, self.scheduler.render_state(index));
            }
            FeedCommand::ToggleSceneInfo { index } => {
                self.scheduler.toggle_scene_info(index);
                out.item(index, self.scheduler.render_state(index));
            }
            FeedCommand::Scrub { index, seconds } => {
                self.scheduler.scrub(index, seconds);
                out.item(index, self.scheduler.render_state(index));
            }
            FeedCommand::TimeUpdate { index, seconds } => {
                self.scheduler.time_update(index, seconds);
            }
            FeedCommand::ToggleFullscreen => {
                let flags = self.scheduler.toggle_fullscreen();
                out.push(FeedNotice::DisplayChanged(flags));
            }
            FeedCommand::ToggleLetterbox => {
                let flags = self.scheduler.toggle_letterbox();
                out.push(FeedNotice::DisplayChanged(flags));
            }
            FeedCommand::OpenSettings => {
                self.scheduler.open_settings();
                if let Some(index) = self.scheduler.active_index() {
                    out.item(index, self.scheduler.render_state(index));
                }
            }
            FeedCommand::CloseSettings => {
                let transition = self.scheduler.close_settings(window);
                out.transition(transition);
                if !transition.is_change()
                    && let Some(index) = transition.current
                {
                    out.item(index, self.scheduler.render_state(index));
                }
            }
            FeedCommand::ExpireTapFeedback { id } => {
                if let Some(feedback) = self.scheduler.expire_tap_feedback(id)
                {
                    out.push(FeedNotice::TapFeedbackHidden {
                        index: feedback.index,
                    });
                }
            }
        }

        self.check_prefetch(&mut out);
        out
    }

    /// Fold a provider answer for `request_id` into the window.
    pub fn complete_fetch(
        &mut self,
        request_id: u64,
        result: std::result::Result<Vec<RawScene>, SourceError>,
    ) -> SessionOutput {
        let mut out = SessionOutput::default();
        let offset = self
            .loader
            .in_flight()
            .filter(|pending| pending.id == request_id)
            .map(|pending| pending.offset);

        match self.loader.complete(request_id, result) {
            BatchOutcome::Appended { range, dropped } => {
                out.push(FeedNotice::WindowGrew { range, dropped });
                self.check_prefetch(&mut out);
            }
            BatchOutcome::Exhausted => self.check_exhausted(&mut out),
            BatchOutcome::Failed(err) => {
                out.push(FeedNotice::FetchFailed {
                    offset: offset.unwrap_or_default(),
                    message: err.to_string(),
                });
            }
            BatchOutcome::Stale => {}
        }
        out
    }

    /// Ask the loader whether the active index is close enough to the end.
    /// An empty window has nothing to activate, so it re-requests the first
    /// page instead, e.g. after a failed first fetch or a page of records
    /// that all failed to normalize.
    fn check_prefetch(&mut self, out: &mut SessionOutput) {
        if out.fetch.is_none() {
            out.fetch = match self.scheduler.active_index() {
                Some(active) => self.loader.append_if_needed(active),
                None => self.loader.prime(),
            };
        }
        self.check_exhausted(out);
    }

    fn check_exhausted(&mut self, out: &mut SessionOutput) {
        if self.loader.is_exhausted() && !self.exhaustion_reported {
            self.exhaustion_reported = true;
            out.push(FeedNotice::FeedExhausted {
                loaded: self.loader.window().len(),
            });
        }
    }

    /// Release every platform observation. The session keeps its window and
    /// playback state, but reports nothing further until items register again.
    pub fn shutdown(&mut self) {
        self.tracker.clear();
        tracing::debug!(
            loaded = self.loader.window().len(),
            "feed session shut down"
        );
    }

    pub fn phase(&self, index: usize) -> ItemPhase {
        self.scheduler.phase(index)
    }

    pub fn render_state(&self, index: usize) -> PlaybackState {
        self.scheduler.render_state(index)
    }

    pub fn active_index(&self) -> Option<usize> {
        self.scheduler.active_index()
    }

    pub fn active_player(&self) -> Option<ActivePlayer<'_>> {
        self.scheduler.active_player()
    }

    pub fn tap_feedback(&self) -> Option<TapFeedback> {
        self.scheduler.tap_feedback()
    }

    pub fn cursor(&self) -> FetchCursor {
        self.loader.cursor()
    }

    pub fn is_exhausted(&self) -> bool {
        self.loader.is_exhausted()
    }

    pub fn window(&self) -> &FeedWindow {
        self.loader.window()
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn tracker(&self) -> &IntersectionTracker<S> {
        &self.tracker
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let items = self
            .loader
            .window()
            .iter()
            .enumerate()
            .map(|(index, scene)| ItemSnapshot {
                index,
                scene_id: scene.id.clone(),
                phase: self.scheduler.phase(index),
                state: self.scheduler.render_state(index),
            })
            .collect();
        SessionSnapshot {
            active: self.scheduler.active_index(),
            cursor: self.loader.cursor(),
            exhausted: self.loader.is_exhausted(),
            display: self.scheduler.display(),
            settings_open: self.scheduler.overlay_open(),
            items,
        }
    }
}
