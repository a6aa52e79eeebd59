use std::thread;

use livechart::interaction::{FPS_KEY_STEP, KeyAction, KeyCode, MouseTracker};

fn action(key: char) -> KeyAction {
    KeyAction::from_key(Some(KeyCode::from(key)))
}

#[test]
fn key_table_maps_every_shortcut() {
    assert!(action('q').quit);
    assert!(KeyAction::from_key(Some(KeyCode::new(27))).quit);
    assert!(action('p').toggle_pause);
    assert!(action(' ').toggle_pause);
    assert!(action('s').screenshot);
    assert!(action('r').reset);
    assert!(action('v').toggle_recording);
    assert!(action('t').cycle_theme);
    assert_eq!(action('+').fps_delta, FPS_KEY_STEP);
    assert_eq!(action('=').fps_delta, FPS_KEY_STEP);
    assert_eq!(action('-').fps_delta, -FPS_KEY_STEP);
    assert_eq!(action('_').fps_delta, -FPS_KEY_STEP);
}

#[test]
fn each_key_sets_at_most_one_action() {
    for code in 0..=u8::MAX {
        let action = KeyAction::from_key(Some(KeyCode::new(code)));
        let flags = [
            action.quit,
            action.toggle_pause,
            action.screenshot,
            action.reset,
            action.toggle_recording,
            action.cycle_theme,
            action.fps_delta != 0,
        ];
        assert!(flags.iter().filter(|set| **set).count() <= 1, "key {code}");
    }
}

#[test]
fn uppercase_letters_are_not_shortcuts() {
    assert!(action('Q').is_noop());
    assert!(action('S').is_noop());
}

#[test]
fn raw_host_codes_normalize_to_low_byte() {
    assert_eq!(KeyCode::from_raw(-1), None);
    assert_eq!(KeyCode::from_raw(i32::from(b's')), Some(KeyCode::new(b's')));
    assert_eq!(
        KeyCode::from_raw(0x0010_0000 | i32::from(b'r')),
        Some(KeyCode::new(b'r'))
    );
}

#[test]
fn mouse_position_tracks_moves_and_leaves() {
    let tracker = MouseTracker::new();
    let sink = tracker.sink();
    assert_eq!(tracker.position(), None);

    sink.on_move(120, 45);
    assert_eq!(tracker.position(), Some((120, 45)));

    sink.on_move(-3, 700);
    assert_eq!(tracker.position(), Some((-3, 700)));

    sink.on_leave();
    assert_eq!(tracker.position(), None);
}

#[test]
fn mouse_updates_cross_threads() {
    let tracker = MouseTracker::new();
    let sink = tracker.sink();

    thread::spawn(move || sink.on_move(300, 200))
        .join()
        .expect("writer thread");

    assert_eq!(tracker.position(), Some((300, 200)));
}
