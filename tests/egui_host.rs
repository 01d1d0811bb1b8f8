mod common;

use common::{payload, FakeHotkeys};
use eframe::egui;
use std::cell::RefCell;
use std::rc::Rc;
use teleprompter::gui::{EguiHost, CONTROL_WINDOW, OFFSCREEN_POS};
use teleprompter::hotkey::HotkeyDispatcher;
use teleprompter::prompter::controller::{ControllerConfig, OverlaySessionController};
use teleprompter::prompter::host::{WindowBounds, WindowFlags, WindowHost, WindowRole};

#[path = "mock_ctx.rs"]
mod mock_ctx;
use mock_ctx::MockCtx;

fn bounds(x: f32, y: f32, width: f32, height: f32) -> WindowBounds {
    WindowBounds {
        x,
        y,
        width,
        height,
    }
}

#[test]
fn hidden_control_window_starts_offscreen() {
    let mut host = EguiHost::new();
    let handle = host
        .create_window(
            WindowRole::Control,
            bounds(460.0, 140.0, 1000.0, 800.0),
            WindowFlags::control(),
        )
        .unwrap();
    assert_eq!(handle, CONTROL_WINDOW);

    let ctx = MockCtx::default();
    host.flush_control(&ctx);
    let cmds = ctx.commands.lock().unwrap();
    assert_eq!(cmds.len(), 2);
    match cmds[1] {
        egui::ViewportCommand::OuterPosition(p) => {
            assert_eq!(p.x, OFFSCREEN_POS.0);
            assert_eq!(p.y, OFFSCREEN_POS.1);
        }
        _ => panic!("unexpected command"),
    }
}

#[test]
fn showing_control_moves_it_back_and_repaints() {
    let mut host = EguiHost::new();
    host.create_window(
        WindowRole::Control,
        bounds(460.0, 140.0, 1000.0, 800.0),
        WindowFlags::control(),
    )
    .unwrap();
    host.take_commands(CONTROL_WINDOW);

    host.show_window(CONTROL_WINDOW);
    let ctx = MockCtx::default();
    host.flush_control(&ctx);
    let cmds = ctx.commands.lock().unwrap();
    assert!(cmds.iter().any(|c| matches!(
        c,
        egui::ViewportCommand::OuterPosition(p) if p.x == 460.0 && p.y == 140.0
    )));
    assert!(cmds
        .iter()
        .any(|c| matches!(c, egui::ViewportCommand::Visible(true))));
    assert_eq!(*ctx.repaints.lock().unwrap(), 1);
    assert!(host.window(CONTROL_WINDOW).unwrap().visible);
}

#[test]
fn hiding_control_moves_it_offscreen() {
    let mut host = EguiHost::new();
    host.create_window(
        WindowRole::Control,
        bounds(0.0, 0.0, 400.0, 300.0),
        WindowFlags::control(),
    )
    .unwrap();
    host.take_commands(CONTROL_WINDOW);

    host.hide_window(CONTROL_WINDOW);
    let cmds = host.take_commands(CONTROL_WINDOW);
    assert_eq!(cmds.len(), 1);
    assert!(matches!(
        cmds[0],
        egui::ViewportCommand::OuterPosition(p) if p.x == OFFSCREEN_POS.0
    ));
}

#[test]
fn click_through_is_forwarded_to_overlay_viewport() {
    let mut host = EguiHost::new();
    let overlay = host
        .create_window(
            WindowRole::Overlay,
            bounds(560.0, 0.0, 800.0, 200.0),
            WindowFlags::overlay(),
        )
        .unwrap();
    assert_ne!(overlay, CONTROL_WINDOW);
    assert!(host.viewport_builder(overlay).is_some());

    host.set_click_through(overlay, false);
    assert!(!host.window(overlay).unwrap().click_through);
    let cmds = host.take_commands(overlay);
    assert!(matches!(
        cmds.as_slice(),
        [egui::ViewportCommand::MousePassthrough(false)]
    ));
}

#[test]
fn closed_overlay_has_no_viewport() {
    let mut host = EguiHost::new();
    let overlay = host
        .create_window(
            WindowRole::Overlay,
            bounds(560.0, 0.0, 800.0, 200.0),
            WindowFlags::overlay(),
        )
        .unwrap();
    host.request_frame(overlay);
    host.close_window(overlay);
    assert!(host.viewport_builder(overlay).is_none());
    assert!(!host.take_frame_request(overlay));
}

#[test]
fn each_overlay_gets_a_fresh_handle() {
    let mut host = EguiHost::new();
    let first = host
        .create_window(WindowRole::Overlay, bounds(0.0, 0.0, 10.0, 10.0), WindowFlags::overlay())
        .unwrap();
    host.close_window(first);
    let second = host
        .create_window(WindowRole::Overlay, bounds(0.0, 0.0, 10.0, 10.0), WindowFlags::overlay())
        .unwrap();
    assert_ne!(first, second);
    assert_ne!(
        EguiHost::viewport_id(first),
        EguiHost::viewport_id(second)
    );
}

#[test]
fn invalid_sizes_and_second_control_are_rejected() {
    let mut host = EguiHost::new();
    assert!(host
        .create_window(WindowRole::Overlay, bounds(0.0, 0.0, 0.0, 200.0), WindowFlags::overlay())
        .is_err());
    host.create_window(WindowRole::Control, bounds(0.0, 0.0, 10.0, 10.0), WindowFlags::control())
        .unwrap();
    assert!(host
        .create_window(WindowRole::Control, bounds(0.0, 0.0, 10.0, 10.0), WindowFlags::control())
        .is_err());
}

#[test]
fn quit_flag_is_taken_once() {
    let mut host = EguiHost::new();
    host.quit();
    assert!(host.take_quit());
    assert!(!host.take_quit());
}

#[test]
fn closing_control_queues_root_close_and_frees_the_slot() {
    let mut host = EguiHost::new();
    host.create_window(WindowRole::Control, bounds(0.0, 0.0, 400.0, 300.0), WindowFlags::control())
        .unwrap();
    host.take_commands(CONTROL_WINDOW);

    host.close_window(CONTROL_WINDOW);
    assert!(host.window(CONTROL_WINDOW).is_none());
    let ctx = MockCtx::default();
    host.flush_control(&ctx);
    let cmds = ctx.commands.lock().unwrap();
    assert!(matches!(cmds.as_slice(), [egui::ViewportCommand::Close]));
}

fn egui_controller() -> OverlaySessionController<EguiHost, FakeHotkeys> {
    let backend = Rc::new(RefCell::new(FakeHotkeys::default()));
    OverlaySessionController::new(
        EguiHost::new(),
        HotkeyDispatcher::new(backend),
        ControllerConfig::default(),
    )
}

#[test]
fn overlay_closed_by_the_system_leaves_no_entry() {
    let mut ctl = egui_controller();
    let control = ctl.open_control(0.0).unwrap();
    ctl.on_window_ready(control);
    let endpoint = ctl.start(payload("x", 1.0)).unwrap();
    assert!(ctl.host().window(endpoint.window).is_some());

    ctl.on_window_closed(endpoint.window);
    assert!(ctl.host().window(endpoint.window).is_none());
    assert!(ctl.host().viewport_builder(endpoint.window).is_none());
}

#[test]
fn control_window_can_be_reopened_after_close() {
    let mut ctl = egui_controller();
    let control = ctl.open_control(0.0).unwrap();
    ctl.on_window_ready(control);
    ctl.close_control();

    let reopened = ctl.reactivate(5000.0).unwrap();
    assert_eq!(reopened, Some(CONTROL_WINDOW));
    assert!(ctl.host().window(CONTROL_WINDOW).is_some());
}

#[test]
fn control_closed_by_the_system_can_be_reopened() {
    let mut ctl = egui_controller();
    let control = ctl.open_control(0.0).unwrap();
    ctl.on_window_closed(control);
    assert!(ctl.reactivate(100.0).unwrap().is_some());
}
