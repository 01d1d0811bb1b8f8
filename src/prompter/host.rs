//! Capabilities the teleprompter needs from whatever creates native windows.

use anyhow::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowHandle(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowRole {
    Control,
    Overlay,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WindowBounds {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowFlags {
    pub always_on_top: bool,
    pub frameless: bool,
    pub transparent: bool,
    pub resizable: bool,
    pub shadow: bool,
    pub click_through: bool,
    pub visible: bool,
}

impl WindowFlags {
    pub fn overlay() -> Self {
        Self {
            always_on_top: true,
            frameless: true,
            transparent: true,
            resizable: true,
            shadow: false,
            click_through: true,
            visible: true,
        }
    }

    /// Created hidden; shown once it has painted.
    pub fn control() -> Self {
        Self {
            always_on_top: false,
            frameless: true,
            transparent: true,
            resizable: true,
            shadow: true,
            click_through: false,
            visible: false,
        }
    }
}

/// Work area of the primary display.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayArea {
    pub width: f32,
    pub height: f32,
}

impl Default for DisplayArea {
    fn default() -> Self {
        Self {
            width: 1920.0,
            height: 1080.0,
        }
    }
}

/// Overlay placement: horizontally centred, flush with the top edge.
pub fn overlay_bounds(display: DisplayArea, width: f32, height: f32) -> WindowBounds {
    WindowBounds {
        x: ((display.width - width) / 2.0).floor(),
        y: 0.0,
        width,
        height,
    }
}

pub fn centered_bounds(display: DisplayArea, width: f32, height: f32) -> WindowBounds {
    WindowBounds {
        x: ((display.width - width) / 2.0).floor().max(0.0),
        y: ((display.height - height) / 2.0).floor().max(0.0),
        width,
        height,
    }
}

pub trait WindowHost {
    fn primary_display(&self) -> DisplayArea;

    fn create_window(
        &mut self,
        role: WindowRole,
        bounds: WindowBounds,
        flags: WindowFlags,
    ) -> Result<WindowHandle>;

    fn show_window(&mut self, window: WindowHandle);

    fn hide_window(&mut self, window: WindowHandle);

    /// Close without reporting back; the caller already knows.
    fn close_window(&mut self, window: WindowHandle);

    fn minimize_window(&mut self, window: WindowHandle);

    fn focus_window(&mut self, window: WindowHandle);

    fn set_click_through(&mut self, window: WindowHandle, enabled: bool);

    /// Ask for another frame of `window` on the next display refresh.
    fn request_frame(&mut self, window: WindowHandle);

    /// The process is about to exit.
    fn quit(&mut self) {}

    /// Drop bookkeeping for a window the system already closed.
    fn forget_window(&mut self, _window: WindowHandle) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlay_is_centred_at_top() {
        let bounds = overlay_bounds(
            DisplayArea {
                width: 1921.0,
                height: 1080.0,
            },
            800.0,
            200.0,
        );
        assert_eq!(bounds.x, 560.0);
        assert_eq!(bounds.y, 0.0);
        assert_eq!((bounds.width, bounds.height), (800.0, 200.0));
    }

    #[test]
    fn overlay_starts_click_through_and_on_top() {
        let flags = WindowFlags::overlay();
        assert!(flags.click_through && flags.always_on_top && flags.transparent);
        assert!(!WindowFlags::control().visible);
    }
}
