mod support;

use stashtv_core::contracts::source::SourceError;
use stashtv_core::model::{RawScene, RawScenePaths};
use stashtv_core::{FeedCommand, FeedNotice, ItemPhase};

use support::{
    PlayerCall, hide, loaded_session, page, raw_scene, send, session, show,
};

#[test]
fn at_most_one_item_is_ever_active() {
    let (mut s, _players) = loaded_session(10, 10);
    let script: &[(usize, bool)] = &[
        (0, true),
        (1, true),
        (2, true),
        (1, false),
        (0, false),
        (3, true),
        (2, false),
        (3, false),
        (4, true),
        (5, true),
        (4, false),
        (0, true),
    ];

    for &(index, visible) in script {
        if visible {
            show(&mut s, index);
        } else {
            hide(&mut s, index);
        }
        let active: Vec<usize> =
            (0..10).filter(|&i| s.phase(i).is_active()).collect();
        assert!(active.len() <= 1, "several active items: {active:?}");
        assert_eq!(active.first().copied(), s.active_index());
    }
}

#[test]
fn scrolling_back_resumes_where_the_viewer_left() {
    let (mut s, players) = loaded_session(10, 5);
    show(&mut s, 2);
    send(
        &mut s,
        FeedCommand::Scrub {
            index: 2,
            seconds: 45.0,
        },
    );

    show(&mut s, 3);
    hide(&mut s, 2);
    assert_eq!(s.phase(2), ItemPhase::Inactive);
    players[2].take_calls();

    show(&mut s, 2);
    assert_eq!(s.phase(2), ItemPhase::ActivePlaying);
    assert!((s.render_state(2).current_time_seconds - 45.0).abs() < 1e-6);
    assert_eq!(players[2].take_calls().first(), Some(&PlayerCall::Seek(45.0)));
}

#[test]
fn live_position_is_captured_on_deactivation() {
    let (mut s, players) = loaded_session(10, 5);
    show(&mut s, 0);
    players[0].advance_to(17.5);
    show(&mut s, 1);
    assert_eq!(s.render_state(0).current_time_seconds, 17.5);
}

#[test]
fn scene_info_panel_closes_on_scroll_away_but_subtitles_stick() {
    let (mut s, _players) = loaded_session(10, 5);
    show(&mut s, 1);
    send(&mut s, FeedCommand::ToggleSceneInfo { index: 1 });
    send(&mut s, FeedCommand::ToggleSubtitles { index: 1 });
    assert!(s.render_state(1).scene_info_open);
    assert!(!s.render_state(1).subtitles_on);

    show(&mut s, 2);
    show(&mut s, 1);
    let state = s.render_state(1);
    assert!(!state.scene_info_open);
    assert!(!state.subtitles_on);
}

#[test]
fn nearing_the_end_fetches_exactly_once() {
    let (mut s, _players) = loaded_session(5, 5);
    assert_eq!(s.cursor().loaded_count, 5);

    let out = show(&mut s, 3);
    let request = out.fetch.expect("prefetch at index 3");
    assert_eq!((request.offset, request.count), (5, 5));
    assert!(s.cursor().pending_request);

    hide(&mut s, 3);
    let again = show(&mut s, 3);
    assert!(again.fetch.is_none());
    assert!(show(&mut s, 4).fetch.is_none());
}

#[test]
fn empty_page_stops_fetching_for_good() {
    let (mut s, _players) = loaded_session(5, 5);
    let request = show(&mut s, 3).fetch.unwrap();
    let out = s.complete_fetch(request.id, Ok(Vec::new()));
    assert_eq!(out.notices, vec![FeedNotice::FeedExhausted { loaded: 5 }]);

    for index in [4, 3, 4] {
        assert!(show(&mut s, index).fetch.is_none());
    }
    assert!(s.is_exhausted());
    assert!(!s.cursor().pending_request);
}

#[test]
fn invalid_records_are_dropped_from_the_batch() {
    let mut s = session(5);
    let request = s.start().unwrap();
    let mut batch = page(0..5);
    batch[2] = RawScene {
        id: Some("2".into()),
        paths: Some(RawScenePaths {
            stream: None,
            caption: None,
        }),
        ..RawScene::default()
    };

    let out = s.complete_fetch(request.id, Ok(batch));
    assert_eq!(
        out.notices,
        vec![FeedNotice::WindowGrew {
            range: 0..4,
            dropped: 1
        }]
    );
    assert_eq!(s.cursor().loaded_count, 4);
    assert_eq!(s.window().get(2).unwrap().id.as_str(), "3");
}

fn unplayable(id: usize) -> RawScene {
    RawScene {
        id: Some(id.to_string()),
        paths: Some(RawScenePaths {
            stream: None,
            caption: None,
        }),
        ..RawScene::default()
    }
}

#[test]
fn first_page_of_unplayable_records_moves_on_to_the_next_page() {
    let mut s = session(3);
    let first = s.start().unwrap();
    let out = s.complete_fetch(first.id, Ok((0..3).map(unplayable).collect()));
    assert_eq!(s.cursor().loaded_count, 0);
    assert!(!s.is_exhausted());

    let next = out.fetch.expect("empty window asks for more");
    assert_eq!((next.offset, next.count), (3, 3));
    s.complete_fetch(next.id, Ok(page(3..6)));
    assert_eq!(s.cursor().loaded_count, 3);
    assert_eq!(s.window().get(0).unwrap().id.as_str(), "3");
}

#[test]
fn failed_first_page_is_retried_on_the_next_command() {
    let mut s = session(3);
    let first = s.start().unwrap();
    let out = s.complete_fetch(
        first.id,
        Err(SourceError::Transport("connection refused".into())),
    );
    assert!(out.fetch.is_none());
    assert!(!s.cursor().pending_request);

    let retry = send(&mut s, FeedCommand::ToggleFullscreen)
        .fetch
        .expect("empty window retries");
    assert_eq!(retry.offset, 0);
    assert_ne!(retry.id, first.id);
    assert!(send(&mut s, FeedCommand::ToggleFullscreen).fetch.is_none());

    s.complete_fetch(retry.id, Ok(page(0..3)));
    assert_eq!(s.cursor().loaded_count, 3);
}

#[test]
fn remounted_item_still_deactivates_when_scrolled_away() {
    let (mut s, players) = loaded_session(10, 3);
    show(&mut s, 0);
    send(
        &mut s,
        FeedCommand::Register {
            index: 0,
            handle: Some(()),
        },
    );
    assert_eq!(s.phase(0), ItemPhase::ActivePlaying);
    players[0].take_calls();

    let out = hide(&mut s, 0);
    assert_eq!(s.active_index(), None);
    assert_eq!(s.phase(0), ItemPhase::Inactive);
    assert!(out.notices.contains(&FeedNotice::ActiveChanged {
        previous: Some(0),
        current: None
    }));
    assert!(s.scheduler().visible_items().is_empty());
}

#[test]
fn time_updates_only_move_the_active_item() {
    let (mut s, _players) = loaded_session(10, 3);
    show(&mut s, 0);
    send(
        &mut s,
        FeedCommand::TimeUpdate {
            index: 0,
            seconds: 9.5,
        },
    );
    send(
        &mut s,
        FeedCommand::TimeUpdate {
            index: 1,
            seconds: 30.0,
        },
    );
    assert_eq!(s.render_state(0).current_time_seconds, 9.5);
    assert_eq!(s.render_state(1).current_time_seconds, 0.0);
}

#[test]
fn inactive_items_always_render_muted() {
    let (mut s, _players) = loaded_session(10, 3);
    show(&mut s, 0);
    assert!(!s.render_state(0).muted);
    assert!(s.render_state(1).muted);
    assert!(s.render_state(2).muted);

    show(&mut s, 1);
    assert!(s.render_state(0).muted);
    assert!(!s.render_state(1).muted);
}

#[test]
fn mute_toggle_after_deactivation_leaves_the_player_alone() {
    let (mut s, players) = loaded_session(10, 3);
    show(&mut s, 0);
    show(&mut s, 1);
    players[0].take_calls();

    let out = send(&mut s, FeedCommand::ToggleMute { index: 0 });
    assert!(players[0].take_calls().is_empty());
    assert!(s.scheduler().store().get(0).muted);
    assert!(matches!(
        out.notices.as_slice(),
        [FeedNotice::ItemUpdated { index: 0, .. }]
    ));

    // Unmuting back while inactive still reports muted to the renderer.
    send(&mut s, FeedCommand::ToggleMute { index: 0 });
    assert!(!s.scheduler().store().get(0).muted);
    assert!(s.render_state(0).muted);
    assert!(players[0].take_calls().is_empty());
}

#[test]
fn failed_fetch_retries_on_the_next_scroll() {
    let (mut s, _players) = loaded_session(5, 5);
    let request = show(&mut s, 3).fetch.unwrap();
    let out = s.complete_fetch(
        request.id,
        Err(SourceError::Transport("timeout".into())),
    );
    assert!(matches!(
        out.notices.as_slice(),
        [FeedNotice::FetchFailed { offset: 5, .. }]
    ));
    assert!(!s.is_exhausted());

    let retry = show(&mut s, 4).fetch.expect("retry after failure");
    assert_eq!(retry.offset, 5);
    assert_ne!(retry.id, request.id);

    // The failed request's id no longer matches anything.
    let stale = s.complete_fetch(request.id, Ok(page(5..10)));
    assert!(stale.notices.is_empty());
    assert_eq!(s.cursor().loaded_count, 5);
}

#[test]
fn settings_overlay_pauses_and_resumes_the_active_item() {
    let (mut s, players) = loaded_session(10, 3);
    show(&mut s, 0);
    players[0].take_calls();

    send(&mut s, FeedCommand::OpenSettings);
    assert_eq!(s.phase(0), ItemPhase::ActivePaused);
    show(&mut s, 1);
    assert_eq!(s.active_index(), Some(0));
    hide(&mut s, 1);

    send(&mut s, FeedCommand::CloseSettings);
    assert_eq!(s.phase(0), ItemPhase::ActivePlaying);
    assert_eq!(
        players[0].take_calls(),
        vec![PlayerCall::Pause, PlayerCall::Play]
    );
}

#[test]
fn unregistered_items_stop_reporting() {
    let (mut s, _players) = loaded_session(10, 3);
    send(&mut s, FeedCommand::Unregister { index: 1 });
    assert!(show(&mut s, 1).notices.is_empty());
    assert_eq!(s.active_index(), None);

    // Registering without a handle is ignored.
    send(
        &mut s,
        FeedCommand::Register {
            index: 1,
            handle: None,
        },
    );
    assert!(!s.tracker().is_observed(1));
}

#[test]
fn active_player_context_tracks_the_active_item() {
    let (mut s, players) = loaded_session(10, 3);
    assert!(s.active_player().is_none());
    show(&mut s, 2);
    players[2].advance_to(8.0);

    let active = s.active_player().unwrap();
    assert_eq!(active.index(), 2);
    assert!(active.has_live_player());
    assert_eq!(active.current_time(), 8.0);
    assert_eq!(active.phase(), ItemPhase::ActivePlaying);
}

#[test]
fn maximum_scenes_caps_the_window() {
    use stashtv_core::model::PluginSettings;
    use stashtv_core::{FeedSession, ManualVisibility};

    let settings = PluginSettings {
        maximum_scenes: Some(7),
        ..PluginSettings::default()
    };
    let mut s =
        FeedSession::new(ManualVisibility, support::tuning(5, true), &settings)
            .unwrap();
    let first = s.start().unwrap();
    assert_eq!(first.count, 5);
    s.complete_fetch(first.id, Ok(page(0..5)));
    send(
        &mut s,
        FeedCommand::Register {
            index: 3,
            handle: Some(()),
        },
    );
    let second = show(&mut s, 3).fetch.unwrap();
    assert_eq!((second.offset, second.count), (5, 2));

    let out = s.complete_fetch(second.id, Ok(vec![raw_scene(5), raw_scene(6)]));
    assert!(out.notices.contains(&FeedNotice::FeedExhausted { loaded: 7 }));
    assert_eq!(s.cursor().loaded_count, 7);
    assert!(s.is_exhausted());
}
