//! Single-active-item playback scheduler.
//!
//! Exactly one feed item is the playback target at a time. Visibility
//! crossings, taps and the settings overlay drive the transitions; every
//! transition persists the outgoing item into the [`PlaybackStore`] before the
//! incoming item is restored onto its live player.

pub mod context;
pub mod feedback;
pub mod phase;

use std::collections::HashMap;
use std::time::Instant;

use stashtv_contracts::player::PlayerAdapter;
use stashtv_model::{Caption, PlaybackPatch, PlaybackState};

use crate::store::PlaybackStore;
use crate::tracker::VisibilityChanged;
use crate::window::FeedWindow;

pub use context::ActivePlayer;
pub use feedback::{TapFeedback, TapFeedbackKind};
pub use phase::{DisplayFlags, ItemPhase, Transition};

#[derive(Debug)]
pub struct Scheduler {
    store: PlaybackStore,
    players: HashMap<usize, Box<dyn PlayerAdapter>>,
    active: Option<usize>,
    /// Items past the visibility threshold, oldest report first.
    visible: Vec<usize>,
    overlay_open: bool,
    /// The overlay paused the active item and owes it a resume.
    paused_by_overlay: bool,
    tap_feedback: Option<TapFeedback>,
    next_feedback_id: u64,
    display: DisplayFlags,
    caption_lang: Option<String>,
}

impl Scheduler {
    pub fn new(global_muted: bool, caption_lang: Option<String>) -> Self {
        Self {
            store: PlaybackStore::new(global_muted),
            players: HashMap::new(),
            active: None,
            visible: Vec::new(),
            overlay_open: false,
            paused_by_overlay: false,
            tap_feedback: None,
            next_feedback_id: 1,
            display: DisplayFlags::default(),
            caption_lang,
        }
    }

    pub fn store(&self) -> &PlaybackStore {
        &self.store
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    pub fn is_active(&self, index: usize) -> bool {
        self.active == Some(index)
    }

    pub fn overlay_open(&self) -> bool {
        self.overlay_open
    }

    pub fn display(&self) -> DisplayFlags {
        self.display
    }

    pub fn visible_items(&self) -> &[usize] {
        &self.visible
    }

    pub fn phase(&self, index: usize) -> ItemPhase {
        if !self.is_active(index) {
            return ItemPhase::Inactive;
        }
        if self.store.get(index).paused {
            ItemPhase::ActivePaused
        } else {
            ItemPhase::ActivePlaying
        }
    }

    /// State as the rendering layer should show it. Items that are not
    /// active are always reported muted.
    pub fn render_state(&self, index: usize) -> PlaybackState {
        let mut state = self.store.get(index);
        if !self.is_active(index) {
            state.muted = true;
        }
        state
    }

    pub fn active_player(&self) -> Option<ActivePlayer<'_>> {
        let index = self.active?;
        Some(ActivePlayer {
            index,
            state: self.store.get(index),
            player: self.players.get(&index).map(|p| p.as_ref()),
        })
    }

    pub fn has_player(&self, index: usize) -> bool {
        self.players.contains_key(&index)
    }

    /// Resolve a visibility crossing into at most one active item.
    pub fn on_visibility(
        &mut self,
        change: VisibilityChanged,
        window: &FeedWindow,
    ) -> Transition {
        let before = self.active;
        let index = change.index;
        self.visible.retain(|&i| i != index);

        if change.visible {
            self.store.entry(index);
            // Most recent report wins.
            self.visible.push(index);
            if self.overlay_open {
                tracing::debug!(index, "settings open, activation deferred");
            } else if !self.is_active(index) {
                self.activate(index, window);
            }
        } else if self.is_active(index) {
            self.deactivate(index);
            if !self.overlay_open
                && let Some(&fallback) = self.visible.last()
            {
                self.activate(fallback, window);
            }
        }

        Transition::between(before, self.active)
    }

    fn activate(&mut self, index: usize, window: &FeedWindow) {
        if let Some(previous) = self.active {
            if previous == index {
                return;
            }
            self.deactivate(previous);
        }

        let state = self.store.set(index, &PlaybackPatch::paused(false));
        self.active = Some(index);
        self.paused_by_overlay = false;

        let caption =
            selected_caption(window, index, &state, self.caption_lang.as_deref());
        if let Some(player) = self.players.get_mut(&index) {
            restore(player.as_mut(), &state, caption);
        }
        tracing::debug!(
            index,
            position = state.current_time_seconds,
            "item activated"
        );
    }

    fn deactivate(&mut self, index: usize) {
        if let Some(player) = self.players.get_mut(&index) {
            let position = player.current_time();
            player.pause();
            player.set_muted(true);
            self.store.set(index, &PlaybackPatch::position(position));
        }
        self.store.set(
            index,
            &PlaybackPatch {
                scene_info_open: Some(false),
                ..PlaybackPatch::default()
            },
        );
        if self.is_active(index) {
            self.active = None;
        }
        self.paused_by_overlay = false;
        tracing::debug!(index, "item deactivated");
    }

    /// Drop `index` from the activation candidates, e.g. when its element
    /// unmounts. An active item stays active until it reports hidden.
    pub fn forget_visible(&mut self, index: usize) {
        self.visible.retain(|&i| i != index);
    }

    /// Toggle play/pause on the active item from a tap on its surface.
    pub fn tap(&mut self, index: usize, now: Instant) -> Option<TapFeedback> {
        if !self.is_active(index) {
            tracing::trace!(index, "tap on inactive item ignored");
            return None;
        }
        let paused = !self.store.get(index).paused;
        self.store.set(index, &PlaybackPatch::paused(paused));
        self.paused_by_overlay = false;
        if let Some(player) = self.players.get_mut(&index) {
            if paused {
                player.pause();
            } else {
                player.play();
            }
        }

        let feedback = TapFeedback {
            id: self.next_feedback_id,
            index,
            kind: if paused {
                TapFeedbackKind::Paused
            } else {
                TapFeedbackKind::Playing
            },
            shown_at: now,
        };
        self.next_feedback_id += 1;
        self.tap_feedback = Some(feedback);
        Some(feedback)
    }

    pub fn tap_feedback(&self) -> Option<TapFeedback> {
        self.tap_feedback
    }

    /// Hide the indicator with `id`. Later taps replace the indicator, so an
    /// older timer must not hide a newer one.
    pub fn expire_tap_feedback(&mut self, id: u64) -> Option<TapFeedback> {
        match self.tap_feedback {
            Some(feedback) if feedback.id == id => self.tap_feedback.take(),
            _ => None,
        }
    }

    pub fn open_settings(&mut self) {
        if self.overlay_open {
            return;
        }
        self.overlay_open = true;
        let Some(index) = self.active else { return };
        if self.store.get(index).paused {
            return;
        }
        self.store.set(index, &PlaybackPatch::paused(true));
        if let Some(player) = self.players.get_mut(&index) {
            player.pause();
        }
        self.paused_by_overlay = true;
        tracing::debug!(index, "paused for settings overlay");
    }

    pub fn close_settings(&mut self, window: &FeedWindow) -> Transition {
        let before = self.active;
        if !self.overlay_open {
            return Transition::unchanged(before);
        }
        self.overlay_open = false;

        match self.visible.last().copied() {
            // Something else scrolled into view while the overlay was up.
            Some(candidate) if Some(candidate) != self.active => {
                self.activate(candidate, window);
            }
            _ => {
                if let Some(index) = self.active
                    && self.paused_by_overlay
                    && self.visible.contains(&index)
                {
                    self.store.set(index, &PlaybackPatch::paused(false));
                    if let Some(player) = self.players.get_mut(&index) {
                        player.play();
                    }
                    tracing::debug!(index, "resumed after settings overlay");
                }
            }
        }
        self.paused_by_overlay = false;
        Transition::between(before, self.active)
    }

    /// Flip the mute preference for `index`. The session default follows so
    /// items seen for the first time match what the viewer chose last.
    pub fn toggle_mute(&mut self, index: usize) -> PlaybackState {
        let muted = !self.store.get(index).muted;
        self.store.set_global_muted(muted);
        let state = self.store.set(index, &PlaybackPatch::muted(muted));
        if let Some(player) = self.live_player(index) {
            player.set_muted(muted);
        }
        state
    }

    pub fn toggle_subtitles(
        &mut self,
        index: usize,
        window: &FeedWindow,
    ) -> PlaybackState {
        let on = !self.store.get(index).subtitles_on;
        let state = self.store.set(
            index,
            &PlaybackPatch {
                subtitles_on: Some(on),
                ..PlaybackPatch::default()
            },
        );
        if self.is_active(index)
            && let Some(player) = self.players.get_mut(&index)
        {
            let caption = selected_caption(
                window,
                index,
                &state,
                self.caption_lang.as_deref(),
            );
            player.set_caption(caption);
        }
        state
    }

    pub fn toggle_loop(&mut self, index: usize) -> PlaybackState {
        let looping = !self.store.get(index).loop_on_end;
        let state = self.store.set(
            index,
            &PlaybackPatch {
                loop_on_end: Some(looping),
                ..PlaybackPatch::default()
            },
        );
        if let Some(player) = self.live_player(index) {
            player.set_looping(looping);
        }
        state
    }

    pub fn toggle_ui(&mut self, index: usize) -> PlaybackState {
        let visible = !self.store.get(index).ui_visible;
        self.store.set(
            index,
            &PlaybackPatch {
                ui_visible: Some(visible),
                ..PlaybackPatch::default()
            },
        )
    }

    /// The info panel only opens over the active item.
    pub fn toggle_scene_info(&mut self, index: usize) -> PlaybackState {
        if !self.is_active(index) {
            tracing::trace!(index, "scene info toggle on inactive item ignored");
            return self.store.get(index);
        }
        let open = !self.store.get(index).scene_info_open;
        self.store.set(
            index,
            &PlaybackPatch {
                scene_info_open: Some(open),
                ..PlaybackPatch::default()
            },
        )
    }

    pub fn toggle_fullscreen(&mut self) -> DisplayFlags {
        self.display.fullscreen = !self.display.fullscreen;
        self.display
    }

    pub fn toggle_letterbox(&mut self) -> DisplayFlags {
        self.display.letterbox = !self.display.letterbox;
        self.display
    }

    /// Drag-to-scrub. Stored for any item, applied live only when active.
    pub fn scrub(&mut self, index: usize, seconds: f64) -> PlaybackState {
        let state = self.store.set(index, &PlaybackPatch::position(seconds));
        if let Some(player) = self.live_player(index) {
            player.seek(state.current_time_seconds);
        }
        state
    }

    /// Position report from a player. Only the active item's reports are
    /// kept; inactive players were snapshotted when they were released.
    pub fn time_update(&mut self, index: usize, seconds: f64) {
        if self.is_active(index) {
            self.store.set(index, &PlaybackPatch::position(seconds));
        }
    }

    /// Hand a mounted player to the scheduler.
    pub fn attach_player(
        &mut self,
        index: usize,
        mut player: Box<dyn PlayerAdapter>,
        window: &FeedWindow,
    ) {
        if self.is_active(index) {
            let state = self.store.get(index);
            let caption = selected_caption(
                window,
                index,
                &state,
                self.caption_lang.as_deref(),
            );
            restore(player.as_mut(), &state, caption);
        } else {
            player.pause();
            player.set_muted(true);
        }
        if self.players.insert(index, player).is_some() {
            tracing::debug!(index, "replaced live player");
        }
    }

    /// Take back a player that is being unmounted. The active item's
    /// position is persisted first.
    pub fn detach_player(
        &mut self,
        index: usize,
    ) -> Option<Box<dyn PlayerAdapter>> {
        let player = self.players.remove(&index)?;
        if self.is_active(index) {
            self.store
                .set(index, &PlaybackPatch::position(player.current_time()));
        }
        Some(player)
    }

    /// Live player for `index`, but only while it is the active item.
    fn live_player(
        &mut self,
        index: usize,
    ) -> Option<&mut (dyn PlayerAdapter + 'static)> {
        if !self.is_active(index) {
            tracing::trace!(index, "item not active, skipping live player");
            return None;
        }
        self.players.get_mut(&index).map(|player| player.as_mut())
    }
}

fn selected_caption<'w>(
    window: &'w FeedWindow,
    index: usize,
    state: &PlaybackState,
    lang: Option<&str>,
) -> Option<&'w Caption> {
    if !state.subtitles_on {
        return None;
    }
    window.get(index).and_then(|scene| scene.caption_for(lang))
}

fn restore(
    player: &mut dyn PlayerAdapter,
    state: &PlaybackState,
    caption: Option<&Caption>,
) {
    player.seek(state.current_time_seconds);
    player.set_muted(state.muted);
    player.set_looping(state.loop_on_end);
    player.set_caption(caption);
    if state.paused {
        player.pause();
    } else {
        player.play();
    }
}
