//! Clock and music track synchronisation during playback.

mod common;

use brm_audio::SimulatedTrack;
use brm_types::PlayState;
use common::{end_at, run, session};

fn looping_session(duration: f64) -> brm_play::Engine {
    let (mut engine, _) = session(60.0);
    engine.set_audio_damping(1.0);
    engine.add_event(end_at(100.0)).unwrap();
    engine.set_music(Some(Box::new(SimulatedTrack::new(duration, true))));
    engine
}

/// A loop wrap bumps the loop index by one and keeps time continuous.
#[test]
fn test_loop_wrap_keeps_time_continuous() {
    let mut engine = looping_session(2.0);
    engine.set_play_state(PlayState::Playing).unwrap();
    run(&mut engine, 19, 0.1);
    assert_eq!(engine.loop_index(), 0);
    let before = engine.seconds();

    run(&mut engine, 2, 0.1);
    assert_eq!(engine.loop_index(), 1);
    assert!((engine.seconds() - before - 0.2).abs() < 1e-6);

    run(&mut engine, 4, 0.1);
    assert_eq!(engine.loop_index(), 1);
    assert!((engine.seconds() - 2.5).abs() < 1e-6);
}

/// A single long frame that carries the track past its end still counts as
/// one wrap, and time never runs backwards afterwards.
#[test]
fn test_wrap_after_long_frame() {
    let mut engine = looping_session(4.0);
    engine.set_play_state(PlayState::Playing).unwrap();
    run(&mut engine, 10, 0.1);
    assert_eq!(engine.loop_index(), 0);

    engine.update(3.5);
    assert_eq!(engine.loop_index(), 1);
    assert!((engine.seconds() - 4.5).abs() < 1e-6);
    assert!((engine.music().unwrap().position() - 0.5).abs() < 1e-6);

    let mut last = engine.seconds();
    for _ in 0..8 {
        engine.update(0.1);
        assert!(engine.seconds() > last);
        last = engine.seconds();
    }
    assert_eq!(engine.loop_index(), 1);
    assert!((engine.seconds() - 5.3).abs() < 1e-6);
}

/// Damping only slows the first frame after the track starts; afterwards the
/// clock follows the track at real time.
#[test]
fn test_damping_only_on_first_frame() {
    let (mut engine, _) = session(60.0);
    engine.add_event(end_at(100.0)).unwrap();
    engine.set_music(Some(Box::new(SimulatedTrack::new(30.0, false))));
    assert_eq!(engine.config().audio_damping, 0.75);
    engine.set_play_state(PlayState::Playing).unwrap();

    run(&mut engine, 11, 0.1);
    assert!((engine.seconds() - 1.075).abs() < 1e-6);
}

/// Stopping and replaying resets the loop counter and re-seeks the track.
#[test]
fn test_restart_reseeks_music() {
    let mut engine = looping_session(2.0);
    engine.set_play_state(PlayState::Playing).unwrap();
    run(&mut engine, 25, 0.1);
    assert_eq!(engine.loop_index(), 1);

    engine.set_play_state(PlayState::Stopped).unwrap();
    assert_eq!(engine.loop_index(), 0);
    assert!(!engine.music().unwrap().is_playing());

    engine.set_playback_start(5.0);
    engine.set_play_state(PlayState::Playing).unwrap();
    let music = engine.music().unwrap();
    assert!(music.is_playing());
    assert!((music.position() - 1.0).abs() < 1e-9);
    assert_eq!(engine.loop_index(), 2);
    assert!((engine.seconds() - 5.0).abs() < 1e-9);
}

/// Music is held back until the clock reaches the music start.
#[test]
fn test_music_waits_for_start_offset() {
    let (mut engine, _) = session(60.0);
    engine.set_audio_damping(1.0);
    engine.set_music_start_sec(1.0);
    engine.add_event(end_at(100.0)).unwrap();
    engine.set_music(Some(Box::new(SimulatedTrack::new(30.0, false))));
    engine.set_play_state(PlayState::Playing).unwrap();

    run(&mut engine, 5, 0.1);
    assert!(!engine.music().unwrap().is_playing());
    run(&mut engine, 10, 0.1);
    assert!(engine.music().unwrap().is_playing());
    // the track starts from zero on the frame the clock crossed 1.0
    assert!((engine.seconds() - 1.4).abs() < 1e-6);
}

/// Volume markers and muting reach the track.
#[test]
fn test_volume_follows_scene_and_mute() {
    use brm_play::Event;
    use brm_types::{Bounds, EventKind};

    let (mut engine, _) = session(60.0);
    engine.add_event(end_at(100.0)).unwrap();
    engine
        .add_event(Event::new(
            Bounds::new(1.0, 0.0, 0.5, 1.0),
            EventKind::MusicVolume { volume: 0.25 },
        ))
        .unwrap();
    engine.set_music(Some(Box::new(SimulatedTrack::new(30.0, false))));
    engine.set_play_state(PlayState::Playing).unwrap();
    run(&mut engine, 30, 0.1);
    assert_eq!(engine.music().unwrap().volume(), 0.25);

    engine.set_music_muted(true);
    engine.update(0.1);
    assert_eq!(engine.music().unwrap().volume(), 0.0);
}

/// Pausing halts both the clock and the track.
#[test]
fn test_pause_halts_track() {
    let mut engine = looping_session(10.0);
    engine.set_play_state(PlayState::Playing).unwrap();
    run(&mut engine, 5, 0.1);
    engine.set_play_state(PlayState::Paused).unwrap();
    let seconds = engine.seconds();
    run(&mut engine, 5, 0.1);
    assert_eq!(engine.seconds(), seconds);
    assert!(!engine.music().unwrap().is_playing());

    engine.set_play_state(PlayState::Playing).unwrap();
    assert!(engine.music().unwrap().is_playing());
    assert!((engine.music().unwrap().position() - seconds).abs() < 1e-9);
}

/// Seeking mid-run moves the track with the clock.
#[test]
fn test_seek_to_beat_while_playing() {
    let mut engine = looping_session(4.0);
    engine.set_play_state(PlayState::Playing).unwrap();
    run(&mut engine, 3, 0.1);
    engine.seek_to_beat(9.0).unwrap();
    assert!((engine.seconds() - 9.0).abs() < 1e-9);
    assert_eq!(engine.loop_index(), 2);
    assert!((engine.music().unwrap().position() - 1.0).abs() < 1e-9);
    assert!(!engine.seek_flag().is_seeking());
}
