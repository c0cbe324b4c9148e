use super::*;
use crate::{
    fingerprint::fingerprint_frame,
    render::{map::LineStyle, recording::RecordingMap},
    settings::prefs::{JsonFileStore, MemoryStore},
    trajectory::model::{Event, MovementType},
};

fn p(lng: f64, lat: f64) -> LngLat {
    LngLat::new(lng, lat)
}

fn five_events() -> Trajectory {
    Trajectory::new(vec![
        Event::new("1900", MovementType::Birth, "born").starting_at(p(0.0, 0.0)),
        Event::new("1910", MovementType::ShortMove, "school")
            .starting_at(p(0.0, 0.0))
            .ending_at(p(1.0, 1.0)),
        Event::new("1915", MovementType::LongMove, "north")
            .starting_at(p(1.0, 1.0))
            .via(p(1.5, 1.8))
            .ending_at(p(2.0, 2.0)),
        Event::new("1916", MovementType::InPlaceActivity, "work").starting_at(p(2.0, 2.0)),
        Event::new("1920", MovementType::InternationalMove, "abroad")
            .starting_at(p(2.0, 2.0))
            .ending_at(p(10.0, 10.0)),
    ])
    .unwrap()
}

fn session() -> PlaybackSession<RecordingMap> {
    let mut s = PlaybackSession::new(
        RecordingMap::default(),
        PlaybackConfig::default(),
        Box::new(MemoryStore::new()),
    )
    .unwrap();
    s.load_trajectory(Millis::ZERO, five_events());
    s
}

fn birth_move_stay() -> Trajectory {
    Trajectory::new(vec![
        Event::new("1900", MovementType::Birth, "born").starting_at(p(10.0, 10.0)),
        Event::new("1910", MovementType::ShortMove, "move")
            .starting_at(p(10.0, 10.0))
            .ending_at(p(20.0, 20.0)),
        Event::new("1911", MovementType::InPlaceActivity, "stay")
            .starting_at(p(20.0, 20.0))
            .ending_at(p(20.0, 20.0)),
    ])
    .unwrap()
}

fn temp_dir(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "geostory_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

#[test]
fn unloaded_session_ignores_navigation() {
    let mut s = PlaybackSession::new(
        RecordingMap::default(),
        PlaybackConfig::default(),
        Box::new(MemoryStore::new()),
    )
    .unwrap();
    assert!(!s.go_to(Millis::ZERO, 3, true, true));
    assert!(!s.step_forward(Millis::ZERO));
    assert!(!s.step_backward(Millis::ZERO));
    s.toggle_play(Millis::ZERO);
    assert!(!s.is_playing());
    s.handle_key(Millis::ZERO, Key::ArrowRight, KeyContext::default());
    assert!(s.take_effects().is_empty());
    assert!(s.map().commands().is_empty());
}

#[test]
fn load_shows_first_event_statically() {
    let mut s = session();
    let effects = s.take_effects();
    assert!(matches!(effects[0], PlaybackEffect::DatasetLoaded { events: 5 }));
    assert!(effects.iter().any(|e| matches!(
        e,
        PlaybackEffect::IndexChanged { index: 0, direction: Direction::None, .. }
    )));
    assert!(!s.is_animating());
    assert_eq!(s.markers().len(), 1);
    assert!(s.paths().is_empty());
}

#[test]
fn non_user_navigation_waits_for_animation_lock() {
    let mut s = session();
    assert!(s.step_forward(Millis::ZERO));
    assert!(s.is_animating());

    // 700 ms path + 100 ms grace.
    assert!(!s.go_to(Millis(500), 2, true, false));
    assert_eq!(s.state().current_index, 1);
    s.take_effects();

    assert!(s.go_to(Millis(800), 2, true, false));
    assert_eq!(s.state().current_index, 2);
    let effects = s.take_effects();
    assert!(effects.contains(&PlaybackEffect::AnimationSettled { index: 1 }));
}

#[test]
fn user_navigation_overrides_and_extends_lock() {
    let mut s = session();
    s.step_forward(Millis::ZERO);
    assert!(s.step_forward(Millis(100)));
    assert_eq!(s.state().current_index, 2);
    s.advance(Millis(850));
    assert!(s.is_animating());
    s.advance(Millis(900));
    assert!(!s.is_animating());
    let settled: Vec<_> = s
        .take_effects()
        .into_iter()
        .filter(|e| matches!(e, PlaybackEffect::AnimationSettled { .. }))
        .collect();
    assert_eq!(settled, vec![PlaybackEffect::AnimationSettled { index: 2 }]);
}

#[test]
fn autoplay_steps_on_interval_and_stops_at_end() {
    let mut s = session();
    s.toggle_play(Millis::ZERO);
    assert!(s.is_playing());
    assert_eq!(s.state().current_index, 1);

    s.advance(Millis(999));
    assert_eq!(s.state().current_index, 1);
    s.advance(Millis(1000));
    assert_eq!(s.state().current_index, 2);
    s.advance(Millis(3000));
    assert_eq!(s.state().current_index, 4);
    assert!(!s.is_playing());

    s.run_until_idle();
    assert_eq!(s.state().current_index, 4);
    assert_eq!(s.pending_timers(), 0);
    let stops = s
        .take_effects()
        .into_iter()
        .filter(|e| *e == PlaybackEffect::PlayStateChanged { playing: false })
        .count();
    assert_eq!(stops, 1);
}

#[test]
fn autoplay_from_last_index_stops_at_once() {
    let mut s = session();
    s.go_to(Millis::ZERO, 4, false, true);
    s.toggle_play(Millis(10));
    assert!(!s.is_playing());
    assert_eq!(s.state().current_index, 4);
}

#[test]
fn speed_change_restarts_autoplay_with_new_interval() {
    let mut s = session();
    s.toggle_play(Millis::ZERO);
    s.set_play_speed(Millis(900), Millis(2000)).unwrap();
    assert_eq!(s.speed().path_duration(), Millis(1700));
    // Restart steps immediately, then waits max(2000, 1700 + 200).
    assert_eq!(s.state().current_index, 2);
    s.advance(Millis(2899));
    assert_eq!(s.state().current_index, 2);
    s.advance(Millis(2900));
    assert_eq!(s.state().current_index, 3);
    assert!(s.set_play_speed(Millis(3000), Millis::ZERO).is_err());
}

#[test]
fn highlight_reverts_after_four_seconds() {
    let mut s = session();
    s.go_to(Millis::ZERO, 4, false, true);
    let layer = s.paths().layer_for(2).unwrap();

    s.select_event_highlight(Millis(10), 2);
    assert_eq!(s.highlighted(), Some(2));
    assert_eq!(s.map().line(layer).unwrap().style, LineStyle::highlight());

    s.advance(Millis(4009));
    assert_eq!(s.highlighted(), Some(2));
    s.advance(Millis(4010));
    assert_eq!(s.highlighted(), None);
    assert_eq!(s.map().line(layer).unwrap().style, LineStyle::trail());
}

#[test]
fn reselecting_clears_early() {
    let mut s = session();
    s.go_to(Millis::ZERO, 4, false, true);
    s.select_event_highlight(Millis(10), 2);
    s.select_event_highlight(Millis(20), 2);
    assert_eq!(s.highlighted(), None);
    s.take_effects();
    s.advance(Millis(10_000));
    assert!(s.take_effects().is_empty());
}

#[test]
fn selecting_another_quick_clears_then_restores() {
    let mut s = session();
    s.go_to(Millis::ZERO, 4, false, true);
    let first = s.paths().layer_for(2).unwrap();
    let second = s.paths().layer_for(4).unwrap();

    s.select_event_highlight(Millis(10), 2);
    s.select_event_highlight(Millis(100), 4);
    assert_eq!(s.highlighted(), Some(4));
    assert_eq!(s.map().line(second).unwrap().style, LineStyle::highlight());
    let dim = s.map().line(first).unwrap().style.opacity;
    assert!((dim - 0.6 * 0.3).abs() < 1e-9);

    s.advance(Millis(299));
    assert!(s.map().line(first).unwrap().style.opacity < 0.5);
    s.advance(Millis(300));
    assert_eq!(s.map().line(first).unwrap().style, LineStyle::trail());
    assert_eq!(s.highlighted(), Some(4));
}

#[test]
fn navigation_drops_highlight() {
    let mut s = session();
    s.go_to(Millis::ZERO, 4, false, true);
    s.select_event_highlight(Millis(10), 4);
    s.step_backward(Millis(20));
    assert_eq!(s.highlighted(), None);
    assert_eq!(s.state().current_index, 3);
}

#[test]
fn home_stops_autoplay_and_returns_to_start() {
    let mut s = session();
    s.toggle_play(Millis::ZERO);
    s.advance(Millis(1000));
    assert_eq!(s.state().current_index, 2);

    s.handle_key(Millis(1100), Key::Home, KeyContext::default());
    assert_eq!(s.state().current_index, 0);
    assert!(!s.is_playing());
    s.advance(Millis(10_000));
    assert_eq!(s.state().current_index, 0);
    assert!(s.paths().is_empty());
    assert!(s.map().live_layers().is_empty());
}

#[test]
fn keys_are_gated_by_focus_and_modal() {
    let mut s = session();
    let typing = KeyContext {
        text_input_focused: true,
        modal_visible: false,
    };
    s.handle_key(Millis::ZERO, Key::ArrowRight, typing);
    assert_eq!(s.state().current_index, 0);
    s.handle_key(Millis::ZERO, Key::ArrowUp, KeyContext::default());
    assert_eq!(s.state().current_index, 1);
    s.handle_key(Millis(10), Key::ArrowLeft, KeyContext::default());
    assert_eq!(s.state().current_index, 0);
    s.handle_key(Millis(20), Key::Space, KeyContext::default());
    assert!(s.is_playing());
}

#[test]
fn decorative_message_is_gated_until_reset() {
    let mut s = session();
    s.take_effects();
    let count = |s: &mut PlaybackSession<RecordingMap>| {
        s.take_effects()
            .into_iter()
            .filter(|e| matches!(e, PlaybackEffect::DecorativeMessage { .. }))
            .count()
    };

    s.handle_key(Millis::ZERO, Key::End, KeyContext::default());
    assert_eq!(count(&mut s), 1);
    s.handle_key(Millis(100), Key::End, KeyContext::default());
    assert_eq!(count(&mut s), 0);
    s.handle_key(Millis(5000), Key::End, KeyContext::default());
    assert_eq!(count(&mut s), 1);
}

#[test]
fn drag_scrubs_statically_and_animates_on_release() {
    let mut s = session();
    s.begin_drag(Millis::ZERO);
    assert!(s.drag_to(Millis::ZERO, 4));
    assert!(!s.is_animating());
    assert_eq!(s.paths().active(), Some(4));
    assert!(s.state().is_dragging);

    assert!(!s.end_drag(Millis(10), 4));
    assert!(!s.state().is_dragging);

    s.begin_drag(Millis(20));
    s.drag_to(Millis(20), 1);
    assert!(s.end_drag(Millis(30), 3));
    assert!(s.is_animating());
    assert_eq!(s.state().current_index, 3);
}

#[test]
fn full_route_fits_all_markers() {
    let mut s = session();
    s.toggle_play(Millis::ZERO);
    s.map_mut().take_commands();
    s.show_full_route(Millis(100));
    assert!(!s.is_playing());
    assert_eq!(s.state().current_index, 4);
    assert!(!s.is_animating());
    let fit = s.map().commands().iter().rev().find_map(|c| match c {
        crate::render::recording::MapCommand::FitBounds {
            south_west,
            north_east,
            max_zoom,
            ..
        } => Some((*south_west, *north_east, *max_zoom)),
        _ => None,
    });
    assert_eq!(fit, Some((p(0.0, 0.0), p(10.0, 10.0), 8.0)));
}

#[test]
fn full_route_redraws_statically_and_keeps_drag_state() {
    let mut s = session();
    s.map_mut().take_commands();
    s.show_full_route(Millis(10));
    assert!(!s.state().is_dragging);
    assert!(!s.is_animating());
    let draws: Vec<Millis> = s
        .map()
        .commands()
        .iter()
        .filter_map(|c| match c {
            crate::render::recording::MapCommand::DrawLine { duration, .. } => Some(*duration),
            _ => None,
        })
        .collect();
    assert_eq!(draws.len(), 3);
    assert!(draws.iter().all(|d| d.is_zero()));

    s.begin_drag(Millis(20));
    s.show_full_route(Millis(30));
    assert!(s.state().is_dragging);
    assert_eq!(s.state().current_index, 4);
}

#[test]
fn camera_follow_off_leaves_camera_alone() {
    let mut s = session();
    assert!(!s.toggle_camera_follow(Millis::ZERO));
    s.map_mut().take_commands();
    s.step_forward(Millis(10));
    assert!(s.map().commands().iter().all(|c| !matches!(
        c,
        crate::render::recording::MapCommand::SetView { .. }
            | crate::render::recording::MapCommand::FitBounds { .. }
    )));
}

#[test]
fn map_failures_do_not_stop_playback() {
    let mut s = PlaybackSession::new(
        RecordingMap::default().fail_fit_bounds(true),
        PlaybackConfig::default(),
        Box::new(MemoryStore::new()),
    )
    .unwrap();
    s.load_trajectory(Millis::ZERO, five_events());
    s.show_full_route(Millis(10));
    assert_eq!(s.state().current_index, 4);
    assert!(s.step_backward(Millis(20)));
}

#[test]
fn preferences_are_written_through() {
    let dir = temp_dir("session_prefs");
    let path = dir.join("prefs.json");
    let mut s = PlaybackSession::new(
        RecordingMap::default(),
        PlaybackConfig::default(),
        Box::new(JsonFileStore::new(&path)),
    )
    .unwrap();
    assert!(s.set_camera_speed_level(Millis::ZERO, 3));
    assert!(!s.set_camera_speed_level(Millis::ZERO, 9));
    assert_eq!(s.speed().level(), 3);
    s.toggle_camera_follow(Millis::ZERO);

    let again = PlaybackSession::new(
        RecordingMap::default(),
        PlaybackConfig::default(),
        Box::new(JsonFileStore::new(&path)),
    )
    .unwrap();
    assert_eq!(again.speed().level(), 3);
    assert!(!again.camera_follow());
    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn shutdown_clears_everything() {
    let mut s = session();
    s.toggle_play(Millis::ZERO);
    s.select_event_highlight(Millis(10), 1);
    s.shutdown(Millis(20));
    assert!(s.trajectory().is_none());
    assert!(s.map().live_layers().is_empty());
    assert_eq!(s.pending_timers(), 0);
    assert!(!s.is_playing());
    assert!(!s.go_to(Millis(30), 1, true, true));
}

#[test]
fn repeated_go_to_leaves_the_scene_unchanged() {
    let mut s = PlaybackSession::new(
        RecordingMap::default(),
        PlaybackConfig::default(),
        Box::new(MemoryStore::new()),
    )
    .unwrap();
    s.load_trajectory(Millis::ZERO, birth_move_stay());

    assert!(s.go_to(Millis(10), 2, true, true));
    s.run_until_idle();
    let first = s.frame(s.now());

    assert!(s.go_to(s.now(), 2, true, true));
    s.run_until_idle();
    let second = s.frame(s.now());

    assert_eq!(fingerprint_frame(&first), fingerprint_frame(&second));
    assert_eq!(s.state().current_index, 2);
    assert_eq!(s.groups().len(), 2);

    // Only the move draws; the activity at index 2 has no segment.
    assert_eq!(second.segments.len(), 1);
    assert_eq!(second.segments[0].event_index, 1);
    assert_eq!(s.paths().layer_for(2), None);
    assert_eq!(s.map().live_layers().len(), 1);
}
