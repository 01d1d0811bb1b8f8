#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::rc::Rc;
use teleprompter::hotkey::{
    Hotkey, HotkeyAction, HotkeyBackend, HotkeyBindings, HotkeyDispatcher, HotkeyError,
};
use teleprompter::prompter::controller::{ControllerConfig, OverlaySessionController};
use teleprompter::prompter::host::{
    DisplayArea, WindowBounds, WindowFlags, WindowHandle, WindowHost, WindowRole,
};
use teleprompter::prompter::messages::TeleprompterData;

#[derive(Default)]
pub struct FakeHost {
    pub display: DisplayArea,
    pub next_id: u64,
    pub fail_next_create: bool,
    pub created: Vec<(WindowHandle, WindowRole, WindowBounds, WindowFlags)>,
    pub open: BTreeSet<WindowHandle>,
    pub visible: HashMap<WindowHandle, bool>,
    pub click_through: HashMap<WindowHandle, bool>,
    pub closed: Vec<WindowHandle>,
    pub minimized: Vec<WindowHandle>,
    pub focused: Vec<WindowHandle>,
    pub frame_requests: Vec<WindowHandle>,
    pub forgotten: Vec<WindowHandle>,
    pub quit: bool,
}

impl FakeHost {
    pub fn is_visible(&self, window: WindowHandle) -> bool {
        self.open.contains(&window) && self.visible.get(&window).copied().unwrap_or(false)
    }
}

impl WindowHost for FakeHost {
    fn primary_display(&self) -> DisplayArea {
        self.display
    }

    fn create_window(
        &mut self,
        role: WindowRole,
        bounds: WindowBounds,
        flags: WindowFlags,
    ) -> anyhow::Result<WindowHandle> {
        if std::mem::take(&mut self.fail_next_create) {
            anyhow::bail!("out of window resources");
        }
        self.next_id += 1;
        let handle = WindowHandle(self.next_id);
        self.created.push((handle, role, bounds, flags));
        self.open.insert(handle);
        self.visible.insert(handle, flags.visible);
        self.click_through.insert(handle, flags.click_through);
        Ok(handle)
    }

    fn show_window(&mut self, window: WindowHandle) {
        self.visible.insert(window, true);
    }

    fn hide_window(&mut self, window: WindowHandle) {
        self.visible.insert(window, false);
    }

    fn close_window(&mut self, window: WindowHandle) {
        self.open.remove(&window);
        self.closed.push(window);
    }

    fn minimize_window(&mut self, window: WindowHandle) {
        self.minimized.push(window);
    }

    fn focus_window(&mut self, window: WindowHandle) {
        self.focused.push(window);
    }

    fn set_click_through(&mut self, window: WindowHandle, enabled: bool) {
        self.click_through.insert(window, enabled);
    }

    fn request_frame(&mut self, window: WindowHandle) {
        self.frame_requests.push(window);
    }

    fn quit(&mut self) {
        self.quit = true;
    }

    fn forget_window(&mut self, window: WindowHandle) {
        self.open.remove(&window);
        self.forgotten.push(window);
    }
}

#[derive(Default)]
pub struct FakeHotkeys {
    pub active: HashMap<Hotkey, HotkeyAction>,
    pub register_calls: usize,
    pub unregistered: Vec<Hotkey>,
    pub reject: HashSet<Hotkey>,
    pub pressed: Vec<Hotkey>,
}

impl FakeHotkeys {
    pub fn press(&mut self, hotkey: Hotkey) {
        self.pressed.push(hotkey);
    }

    pub fn unregister_count(&self, hotkey: Hotkey) -> usize {
        self.unregistered.iter().filter(|hk| **hk == hotkey).count()
    }
}

impl HotkeyBackend for FakeHotkeys {
    fn register(&mut self, action: HotkeyAction, hotkey: Hotkey) -> Result<(), HotkeyError> {
        self.register_calls += 1;
        if self.reject.contains(&hotkey) {
            return Err(HotkeyError::Rejected {
                hotkey,
                reason: "combo owned by another application".into(),
            });
        }
        self.active.insert(hotkey, action);
        Ok(())
    }

    fn unregister(&mut self, hotkey: Hotkey) -> Result<(), HotkeyError> {
        if self.active.remove(&hotkey).is_some() {
            self.unregistered.push(hotkey);
        }
        Ok(())
    }

    fn unregister_all(&mut self) {
        let released: Vec<Hotkey> = self.active.drain().map(|(hk, _)| hk).collect();
        self.unregistered.extend(released);
    }

    fn poll_events(&mut self) -> Vec<HotkeyAction> {
        let pressed = std::mem::take(&mut self.pressed);
        pressed
            .into_iter()
            .filter_map(|hk| self.active.get(&hk).copied())
            .collect()
    }
}

pub type TestController = OverlaySessionController<FakeHost, FakeHotkeys>;

pub fn controller() -> (TestController, Rc<RefCell<FakeHotkeys>>) {
    let backend = Rc::new(RefCell::new(FakeHotkeys::default()));
    let controller = OverlaySessionController::new(
        FakeHost::default(),
        HotkeyDispatcher::new(backend.clone()),
        ControllerConfig::default(),
    );
    (controller, backend)
}

/// Controller with its control window created and painted.
pub fn controller_with_control() -> (TestController, Rc<RefCell<FakeHotkeys>>, WindowHandle) {
    let (mut controller, backend) = controller();
    let control = controller.open_control(0.0).expect("control window");
    controller.on_window_ready(control);
    (controller, backend, control)
}

pub fn bindings() -> HotkeyBindings {
    HotkeyBindings::default()
}

pub fn payload(script: &str, speed: f64) -> TeleprompterData {
    TeleprompterData {
        script: script.to_string(),
        speed,
    }
}
