use crate::prompter::host::{
    DisplayArea, WindowBounds, WindowFlags, WindowHandle, WindowHost, WindowRole,
};
use anyhow::bail;
use eframe::egui;
use std::collections::{BTreeMap, BTreeSet};

/// Where the control window goes while "hidden". Hidden native windows stop
/// receiving frames on some platforms, and the overlay is drawn from the
/// control window's frame.
pub const OFFSCREEN_POS: (f32, f32) = (-10_000.0, -10_000.0);

/// The control window is eframe's root viewport.
pub const CONTROL_WINDOW: WindowHandle = WindowHandle(0);

/// Minimal viewport interface so the host can be driven without a live
/// window in tests.
pub trait ViewportCtx {
    fn send_viewport_cmd(&self, cmd: egui::ViewportCommand);
    fn request_repaint(&self);
}

impl ViewportCtx for egui::Context {
    fn send_viewport_cmd(&self, cmd: egui::ViewportCommand) {
        egui::Context::send_viewport_cmd(self, cmd);
    }

    fn request_repaint(&self) {
        egui::Context::request_repaint(self);
    }
}

#[derive(Debug, Clone)]
pub struct HostedWindow {
    pub role: WindowRole,
    pub bounds: WindowBounds,
    pub flags: WindowFlags,
    pub visible: bool,
    pub click_through: bool,
    pending: Vec<egui::ViewportCommand>,
}

#[derive(Debug, Default)]
pub struct EguiHost {
    display: DisplayArea,
    windows: BTreeMap<WindowHandle, HostedWindow>,
    next_overlay: u64,
    frame_requests: BTreeSet<WindowHandle>,
    quit_requested: bool,
    close_root: bool,
}

impl EguiHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn window(&self, handle: WindowHandle) -> Option<&HostedWindow> {
        self.windows.get(&handle)
    }

    /// Refresh the primary display size from the root viewport's info.
    pub fn observe(&mut self, ctx: &egui::Context) {
        if let Some(size) = ctx.input(|i| i.viewport().monitor_size) {
            if size.x > 0.0 && size.y > 0.0 {
                self.display = DisplayArea {
                    width: size.x,
                    height: size.y,
                };
            }
        }
        if let Some(rect) = ctx.input(|i| i.viewport().outer_rect) {
            if let Some(control) = self.windows.get_mut(&CONTROL_WINDOW) {
                if control.visible && rect.min.x > OFFSCREEN_POS.0 + 1.0 {
                    control.bounds.x = rect.min.x;
                    control.bounds.y = rect.min.y;
                }
            }
        }
    }

    pub fn take_commands(&mut self, handle: WindowHandle) -> Vec<egui::ViewportCommand> {
        self.windows
            .get_mut(&handle)
            .map(|w| std::mem::take(&mut w.pending))
            .unwrap_or_default()
    }

    /// Send queued commands for the control window.
    pub fn flush_control(&mut self, ctx: &impl ViewportCtx) {
        for cmd in self.take_commands(CONTROL_WINDOW) {
            ctx.send_viewport_cmd(cmd);
        }
        if std::mem::take(&mut self.close_root) {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
        if self.frame_requests.remove(&CONTROL_WINDOW) {
            ctx.request_repaint();
        }
    }

    pub fn take_frame_request(&mut self, handle: WindowHandle) -> bool {
        self.frame_requests.remove(&handle)
    }

    pub fn take_quit(&mut self) -> bool {
        std::mem::take(&mut self.quit_requested)
    }

    pub fn viewport_id(handle: WindowHandle) -> egui::ViewportId {
        if handle == CONTROL_WINDOW {
            egui::ViewportId::ROOT
        } else {
            egui::ViewportId::from_hash_of(("teleprompter-overlay", handle.0))
        }
    }

    /// Builder for an overlay viewport, or `None` once it is closed.
    pub fn viewport_builder(&self, handle: WindowHandle) -> Option<egui::ViewportBuilder> {
        let window = self.windows.get(&handle)?;
        if window.role != WindowRole::Overlay {
            return None;
        }
        let flags = window.flags;
        let mut builder = egui::ViewportBuilder::default()
            .with_title("Teleprompter")
            .with_position([window.bounds.x, window.bounds.y])
            .with_inner_size([window.bounds.width, window.bounds.height])
            .with_transparent(flags.transparent)
            .with_decorations(!flags.frameless)
            .with_resizable(flags.resizable)
            .with_mouse_passthrough(window.click_through)
            .with_visible(window.visible)
            .with_taskbar(false);
        if flags.always_on_top {
            builder = builder.with_always_on_top();
        }
        Some(builder)
    }

    fn push(&mut self, handle: WindowHandle, cmd: egui::ViewportCommand) {
        if let Some(window) = self.windows.get_mut(&handle) {
            window.pending.push(cmd);
        }
    }
}

impl WindowHost for EguiHost {
    fn primary_display(&self) -> DisplayArea {
        self.display
    }

    fn create_window(
        &mut self,
        role: WindowRole,
        bounds: WindowBounds,
        flags: WindowFlags,
    ) -> anyhow::Result<WindowHandle> {
        if !(bounds.width.is_finite() && bounds.height.is_finite())
            || bounds.width <= 0.0
            || bounds.height <= 0.0
        {
            bail!("invalid window size {}x{}", bounds.width, bounds.height);
        }
        let handle = match role {
            WindowRole::Control => {
                if self.windows.contains_key(&CONTROL_WINDOW) {
                    bail!("control window already exists");
                }
                CONTROL_WINDOW
            }
            WindowRole::Overlay => {
                self.next_overlay += 1;
                WindowHandle(self.next_overlay)
            }
        };
        let mut window = HostedWindow {
            role,
            bounds,
            flags,
            visible: flags.visible,
            click_through: flags.click_through,
            pending: Vec::new(),
        };
        if role == WindowRole::Control {
            window.pending.push(egui::ViewportCommand::InnerSize(egui::vec2(
                bounds.width,
                bounds.height,
            )));
            let pos = if flags.visible {
                (bounds.x, bounds.y)
            } else {
                OFFSCREEN_POS
            };
            window
                .pending
                .push(egui::ViewportCommand::OuterPosition(egui::pos2(pos.0, pos.1)));
        }
        tracing::debug!(?handle, ?role, ?bounds, "window created");
        self.windows.insert(handle, window);
        Ok(handle)
    }

    fn show_window(&mut self, handle: WindowHandle) {
        let Some(window) = self.windows.get_mut(&handle) else {
            return;
        };
        window.visible = true;
        if window.role == WindowRole::Control {
            let pos = egui::pos2(window.bounds.x, window.bounds.y);
            self.push(handle, egui::ViewportCommand::Minimized(false));
            self.push(handle, egui::ViewportCommand::OuterPosition(pos));
            self.push(handle, egui::ViewportCommand::Visible(true));
        }
        self.frame_requests.insert(handle);
    }

    fn hide_window(&mut self, handle: WindowHandle) {
        let Some(window) = self.windows.get_mut(&handle) else {
            return;
        };
        window.visible = false;
        if window.role == WindowRole::Control {
            self.push(
                handle,
                egui::ViewportCommand::OuterPosition(egui::pos2(OFFSCREEN_POS.0, OFFSCREEN_POS.1)),
            );
        }
    }

    fn close_window(&mut self, handle: WindowHandle) {
        if handle == CONTROL_WINDOW && self.windows.contains_key(&handle) {
            self.close_root = true;
        }
        // An immediate viewport that is no longer shown is closed by egui.
        self.forget_window(handle);
    }

    fn minimize_window(&mut self, handle: WindowHandle) {
        self.push(handle, egui::ViewportCommand::Minimized(true));
    }

    fn focus_window(&mut self, handle: WindowHandle) {
        self.push(handle, egui::ViewportCommand::Focus);
    }

    fn set_click_through(&mut self, handle: WindowHandle, enabled: bool) {
        if let Some(window) = self.windows.get_mut(&handle) {
            window.click_through = enabled;
            window
                .pending
                .push(egui::ViewportCommand::MousePassthrough(enabled));
        }
    }

    fn request_frame(&mut self, handle: WindowHandle) {
        self.frame_requests.insert(handle);
    }

    fn quit(&mut self) {
        self.quit_requested = true;
    }

    fn forget_window(&mut self, handle: WindowHandle) {
        if self.windows.remove(&handle).is_some() {
            tracing::debug!(?handle, "window closed");
        }
        self.frame_requests.remove(&handle);
    }
}
