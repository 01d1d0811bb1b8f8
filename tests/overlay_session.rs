mod common;

use common::{bindings, controller_with_control, payload, TestController};
use std::cell::RefCell;
use std::rc::Rc;
use teleprompter::prompter::mode::InteractionMode;
use teleprompter::prompter::scroll::PlayState;
use teleprompter::prompter::OverlayRuntime;

/// Start an overlay and run the first-paint handshake.
fn painted_overlay(
    script: &str,
    speed: f64,
) -> (TestController, Rc<RefCell<common::FakeHotkeys>>, OverlayRuntime) {
    let (mut ctl, backend, _) = controller_with_control();
    let endpoint = ctl.start(payload(script, speed)).unwrap();
    let mut runtime = OverlayRuntime::new(endpoint);
    runtime.on_painted();
    ctl.pump();
    runtime.pump_messages(0.0);
    (ctl, backend, runtime)
}

#[test]
fn handshake_initializes_the_overlay() {
    let (ctl, _backend, runtime) = painted_overlay("Good evening.", 1.5);
    assert!(runtime.session().is_initialized());
    assert_eq!(runtime.session().script(), "Good evening.");
    assert_eq!(runtime.session().speed(), 1.5);
    assert_eq!(runtime.mode(), InteractionMode::ClickThrough);
    assert_eq!(runtime.session().play_state(), PlayState::Stopped);
    assert!(ctl.lifecycle().is_active());
}

#[test]
fn play_hotkey_starts_scrolling() {
    let (mut ctl, backend, mut runtime) = painted_overlay("text", 1.0);
    backend.borrow_mut().press(bindings().play_pause);
    ctl.pump();
    runtime.pump_messages(0.0);
    assert_eq!(runtime.session().play_state(), PlayState::Playing);

    runtime.frame(20.0, 10_000.0, 200.0);
    let outcome = runtime.frame(40.0, 10_000.0, 200.0);
    let advance = outcome.advance.expect("playing");
    assert!((advance.offset - 2.0).abs() < 1e-9);
}

#[test]
fn entering_interactive_mode_pauses_playback() {
    let (mut ctl, backend, mut runtime) = painted_overlay("text", 1.0);
    runtime.toggle_play_pause(0.0);
    assert_eq!(runtime.session().play_state(), PlayState::Playing);

    backend.borrow_mut().press(bindings().toggle_interaction);
    ctl.pump();
    runtime.pump_messages(10.0);
    assert_eq!(runtime.mode(), InteractionMode::Interactive);
    assert_eq!(runtime.session().play_state(), PlayState::Stopped);
}

#[test]
fn entering_interactive_while_stopped_keeps_play_state() {
    let (mut ctl, backend, mut runtime) = painted_overlay("text", 1.0);
    backend.borrow_mut().press(bindings().toggle_interaction);
    ctl.pump();
    runtime.pump_messages(10.0);
    assert_eq!(runtime.mode(), InteractionMode::Interactive);
    assert_eq!(runtime.session().play_state(), PlayState::Stopped);

    // Leaving interactive mode never touches playback.
    runtime.toggle_play_pause(20.0);
    backend.borrow_mut().press(bindings().toggle_interaction);
    ctl.pump();
    runtime.pump_messages(30.0);
    assert_eq!(runtime.mode(), InteractionMode::ClickThrough);
    assert_eq!(runtime.session().play_state(), PlayState::Playing);
}

#[test]
fn mode_change_before_first_paint_is_picked_up_by_query() {
    let (mut ctl, _backend, _) = controller_with_control();
    let endpoint = ctl.start(payload("late", 1.0)).unwrap();
    ctl.toggle_interaction();
    ctl.pump();
    // The broadcast went out before anyone was listening.
    assert_eq!(endpoint.inbox.drain().len(), 1);

    let mut runtime = OverlayRuntime::new(endpoint);
    runtime.on_painted();
    ctl.pump();
    runtime.pump_messages(0.0);
    assert_eq!(runtime.mode(), InteractionMode::Interactive);
    assert_eq!(runtime.session().script(), "late");
}

#[test]
fn script_edits_only_in_interactive_mode() {
    let (mut ctl, backend, mut runtime) = painted_overlay("draft", 1.0);
    assert!(!runtime.edit_script("changed"));
    assert_eq!(runtime.session().script(), "draft");

    backend.borrow_mut().press(bindings().toggle_interaction);
    ctl.pump();
    runtime.pump_messages(0.0);
    assert!(runtime.edit_script("changed"));
    assert_eq!(runtime.session().script(), "changed");
}

#[test]
fn overlay_stops_after_host_closes_it() {
    let (mut ctl, backend, mut runtime) = painted_overlay("text", 1.0);
    runtime.toggle_play_pause(0.0);
    runtime.frame(20.0, 10_000.0, 200.0);

    backend.borrow_mut().press(bindings().close_overlay);
    ctl.pump();
    runtime.pump_messages(30.0);
    assert!(!runtime.is_alive());
    assert!(!runtime.wants_frames());

    let outcome = runtime.frame(40.0, 10_000.0, 200.0);
    assert!(outcome.advance.is_none());
    assert_eq!(runtime.session().play_state(), PlayState::Stopped);
}

#[test]
fn overlay_close_button_routes_through_host() {
    let (mut ctl, _backend, mut runtime) = painted_overlay("text", 1.0);
    runtime.request_close();
    ctl.pump();
    assert!(ctl.overlay_window().is_none());
    runtime.pump_messages(0.0);
    assert!(!runtime.is_alive());
}

#[test]
fn reaching_the_end_rewinds_after_a_second() {
    let (_ctl, _backend, mut runtime) = painted_overlay("text", 2.0);
    runtime.toggle_play_pause(0.0);
    let mut t = 10;
    while t <= 8500 {
        runtime.frame(f64::from(t), 1000.0, 150.0);
        t += 10;
    }
    assert_eq!(runtime.session().play_state(), PlayState::Stopped);
    assert!((runtime.session().offset() - 850.0).abs() < 1e-9);
    assert!(runtime.wants_frames());

    let outcome = runtime.frame(9500.0, 1000.0, 150.0);
    assert!(outcome.rewound);
    assert_eq!(runtime.session().offset(), 0.0);
    assert!(!runtime.wants_frames());
}

#[test]
fn host_commands_apply_in_send_order() {
    let (mut ctl, _backend, mut runtime) = painted_overlay("text", 1.0);
    runtime.toggle_play_pause(0.0);

    // Entering interactive pauses, the toggle resumes, leaving keeps playing.
    ctl.toggle_interaction();
    ctl.toggle_play_pause();
    ctl.toggle_interaction();
    runtime.pump_messages(10.0);
    assert_eq!(runtime.mode(), InteractionMode::ClickThrough);
    assert_eq!(runtime.session().play_state(), PlayState::Playing);
}

#[test]
fn two_play_presses_in_one_frame_cancel_out() {
    let (mut ctl, backend, mut runtime) = painted_overlay("text", 1.0);
    backend.borrow_mut().press(bindings().play_pause);
    backend.borrow_mut().press(bindings().play_pause);
    ctl.pump();
    runtime.pump_messages(0.0);
    assert_eq!(runtime.session().play_state(), PlayState::Stopped);
}
