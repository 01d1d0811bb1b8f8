mod control_panel;
pub mod egui_host;
mod overlay_view;

pub use egui_host::{EguiHost, ViewportCtx, CONTROL_WINDOW, OFFSCREEN_POS};
pub use overlay_view::OverlayView;

use crate::hotkey::{HotkeyBindings, HotkeyDispatcher};
use crate::settings::Settings;
use crate::system_hotkey::SystemHotkeyBackend;
use crate::prompter::control::ControlSurface;
use crate::prompter::controller::{ControllerEvent, OverlaySessionController};
use crate::prompter::overlay::OverlayRuntime;
use eframe::egui;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

/// How often hotkey presses are collected while an overlay is open.
const HOTKEY_POLL_INTERVAL: Duration = Duration::from_millis(50);

pub struct TeleprompterApp {
    controller: OverlaySessionController<EguiHost, SystemHotkeyBackend>,
    control: ControlSurface,
    overlay: Option<OverlayView>,
    bindings: HotkeyBindings,
    font_size: f32,
    control_painted: bool,
}

impl TeleprompterApp {
    pub fn new(ctx: &egui::Context, settings: &Settings) -> Self {
        let backend = Rc::new(RefCell::new(SystemHotkeyBackend::new()));
        let config = settings.controller_config();
        let bindings = config.bindings.clone();
        let mut controller =
            OverlaySessionController::new(EguiHost::new(), HotkeyDispatcher::new(backend), config);
        controller.host_mut().observe(ctx);
        let now_ms = ctx.input(|i| i.time) * 1000.0;
        if let Err(err) = controller.open_control(now_ms) {
            tracing::error!(?err, "failed to set up control window");
        }
        let control = ControlSurface::new(controller.sender(), settings.default_speed());
        Self {
            controller,
            control,
            overlay: None,
            bindings,
            font_size: settings.font_size,
            control_painted: false,
        }
    }

    fn handle_events(&mut self, ctx: &egui::Context, events: Vec<ControllerEvent>) {
        for event in events {
            match event {
                ControllerEvent::OverlayStarted(endpoint) => {
                    let runtime = OverlayRuntime::new(endpoint);
                    let mut view = OverlayView::new(runtime, self.font_size);
                    let failures = self.controller.hotkey_failures();
                    if !failures.is_empty() {
                        let notice = failures.join("; ");
                        view.set_notice(notice.clone());
                        self.control.set_error(notice);
                    }
                    self.overlay = Some(view);
                }
                ControllerEvent::StartFailed(err) => {
                    self.control.set_error(err.to_string());
                }
                ControllerEvent::OverlayClosed(window) => {
                    if self
                        .overlay
                        .as_ref()
                        .is_some_and(|view| view.runtime().window() == window)
                    {
                        self.overlay = None;
                    }
                }
                ControllerEvent::Quit => {
                    self.overlay = None;
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                }
            }
        }
    }

    fn show_overlay(&mut self, ctx: &egui::Context, now_ms: f64) {
        let Some(view) = self.overlay.as_mut() else {
            return;
        };
        let window = view.runtime().window();
        let host = self.controller.host_mut();
        let Some(builder) = host.viewport_builder(window) else {
            return;
        };
        let commands = host.take_commands(window);
        let wants_frame = host.take_frame_request(window);

        let mut close_requested = false;
        ctx.show_viewport_immediate(EguiHost::viewport_id(window), builder, |ctx, _class| {
            for cmd in commands {
                ctx.send_viewport_cmd(cmd);
            }
            view.show(ctx, now_ms);
            if wants_frame {
                ctx.request_repaint();
            }
            close_requested = ctx.input(|i| i.viewport().close_requested());
        });

        if close_requested {
            tracing::info!(?window, "overlay window closed by the system");
            let events: Vec<_> = self.controller.on_window_closed(window).into_iter().collect();
            self.handle_events(ctx, events);
        }
    }
}

impl eframe::App for TeleprompterApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now_ms = ctx.input(|i| i.time) * 1000.0;
        self.controller.host_mut().observe(ctx);

        if ctx.input(|i| i.viewport().close_requested()) {
            let events: Vec<_> = self.controller.close_control().into_iter().collect();
            self.handle_events(ctx, events);
        }

        self.controller.tick(now_ms);
        let events = self.controller.pump();
        self.handle_events(ctx, events);

        control_panel::show(ctx, &mut self.control, &self.bindings);
        if !self.control_painted {
            self.control_painted = true;
            self.controller.on_window_ready(CONTROL_WINDOW);
        }

        // Requests made by the control panel this frame.
        let events = self.controller.pump();
        self.handle_events(ctx, events);

        self.controller.host_mut().flush_control(ctx);
        self.show_overlay(ctx, now_ms);

        if self.controller.host_mut().take_quit() {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
        if self.controller.lifecycle().is_active() {
            ctx.request_repaint_after(HOTKEY_POLL_INTERVAL);
        } else if !self.controller.control_visible() {
            // Keep ticking until the control window's fallback show fires.
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }

    fn clear_color(&self, _visuals: &egui::Visuals) -> [f32; 4] {
        [0.0, 0.0, 0.0, 0.0]
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.overlay = None;
        self.controller.shutdown();
        tracing::info!("teleprompter exiting");
    }
}
