use crate::hotkey::{Hotkey, HotkeyAction, HotkeyBackend, HotkeyError, Key};
use global_hotkey::hotkey::{Code, HotKey, Modifiers};
use global_hotkey::{GlobalHotKeyEvent, GlobalHotKeyManager, HotKeyState};
use std::collections::HashMap;

/// Hotkey backend backed by the OS global shortcut service.
pub struct SystemHotkeyBackend {
    manager: Option<GlobalHotKeyManager>,
    registered: HashMap<u32, (HotkeyAction, HotKey)>,
}

impl SystemHotkeyBackend {
    /// Must be created on the GUI thread. A missing hotkey service is not
    /// fatal; every registration then reports [`HotkeyError::Unavailable`].
    pub fn new() -> Self {
        let manager = match GlobalHotKeyManager::new() {
            Ok(manager) => Some(manager),
            Err(err) => {
                tracing::warn!(%err, "global hotkey manager unavailable");
                None
            }
        };
        Self {
            manager,
            registered: HashMap::new(),
        }
    }
}

impl Default for SystemHotkeyBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn to_native(hotkey: Hotkey) -> Option<HotKey> {
    let mut mods = Modifiers::empty();
    if hotkey.ctrl {
        mods |= Modifiers::CONTROL;
    }
    if hotkey.shift {
        mods |= Modifiers::SHIFT;
    }
    if hotkey.alt {
        mods |= Modifiers::ALT;
    }
    if hotkey.meta {
        mods |= Modifiers::SUPER;
    }
    let code = key_code(hotkey.key)?;
    Some(HotKey::new((!mods.is_empty()).then_some(mods), code))
}

fn key_code(key: Key) -> Option<Code> {
    Some(match key {
        Key::Space => Code::Space,
        Key::Tab => Code::Tab,
        Key::Enter => Code::Enter,
        Key::Escape => Code::Escape,
        Key::Delete => Code::Delete,
        Key::Backspace => Code::Backspace,
        Key::Home => Code::Home,
        Key::End => Code::End,
        Key::PageUp => Code::PageUp,
        Key::PageDown => Code::PageDown,
        Key::Left => Code::ArrowLeft,
        Key::Right => Code::ArrowRight,
        Key::Up => Code::ArrowUp,
        Key::Down => Code::ArrowDown,
        Key::F(n) => match n {
            1 => Code::F1,
            2 => Code::F2,
            3 => Code::F3,
            4 => Code::F4,
            5 => Code::F5,
            6 => Code::F6,
            7 => Code::F7,
            8 => Code::F8,
            9 => Code::F9,
            10 => Code::F10,
            11 => Code::F11,
            12 => Code::F12,
            _ => return None,
        },
        Key::Digit(d) => match d {
            0 => Code::Digit0,
            1 => Code::Digit1,
            2 => Code::Digit2,
            3 => Code::Digit3,
            4 => Code::Digit4,
            5 => Code::Digit5,
            6 => Code::Digit6,
            7 => Code::Digit7,
            8 => Code::Digit8,
            9 => Code::Digit9,
            _ => return None,
        },
        Key::Letter(c) => match c.to_ascii_uppercase() {
            'A' => Code::KeyA,
            'B' => Code::KeyB,
            'C' => Code::KeyC,
            'D' => Code::KeyD,
            'E' => Code::KeyE,
            'F' => Code::KeyF,
            'G' => Code::KeyG,
            'H' => Code::KeyH,
            'I' => Code::KeyI,
            'J' => Code::KeyJ,
            'K' => Code::KeyK,
            'L' => Code::KeyL,
            'M' => Code::KeyM,
            'N' => Code::KeyN,
            'O' => Code::KeyO,
            'P' => Code::KeyP,
            'Q' => Code::KeyQ,
            'R' => Code::KeyR,
            'S' => Code::KeyS,
            'T' => Code::KeyT,
            'U' => Code::KeyU,
            'V' => Code::KeyV,
            'W' => Code::KeyW,
            'X' => Code::KeyX,
            'Y' => Code::KeyY,
            'Z' => Code::KeyZ,
            _ => return None,
        },
    })
}

impl HotkeyBackend for SystemHotkeyBackend {
    fn register(&mut self, action: HotkeyAction, hotkey: Hotkey) -> Result<(), HotkeyError> {
        let manager = self.manager.as_ref().ok_or(HotkeyError::Unavailable)?;
        let native = to_native(hotkey).ok_or(HotkeyError::Unsupported(hotkey))?;
        if let Some((previous, existing)) = self.registered.remove(&native.id()) {
            if let Err(err) = manager.unregister(existing) {
                tracing::warn!(?previous, %err, "failed to unregister replaced hotkey");
            }
        }
        manager
            .register(native)
            .map_err(|err| HotkeyError::Rejected {
                hotkey,
                reason: err.to_string(),
            })?;
        self.registered.insert(native.id(), (action, native));
        Ok(())
    }

    fn unregister(&mut self, hotkey: Hotkey) -> Result<(), HotkeyError> {
        let manager = self.manager.as_ref().ok_or(HotkeyError::Unavailable)?;
        let native = to_native(hotkey).ok_or(HotkeyError::Unsupported(hotkey))?;
        if let Some((_, existing)) = self.registered.remove(&native.id()) {
            manager
                .unregister(existing)
                .map_err(|err| HotkeyError::Rejected {
                    hotkey,
                    reason: err.to_string(),
                })?;
        }
        Ok(())
    }

    fn unregister_all(&mut self) {
        let Some(manager) = self.manager.as_ref() else {
            self.registered.clear();
            return;
        };
        for (_, (action, native)) in self.registered.drain() {
            if let Err(err) = manager.unregister(native) {
                tracing::warn!(?action, %err, "failed to unregister hotkey");
            }
        }
    }

    fn poll_events(&mut self) -> Vec<HotkeyAction> {
        let mut actions = Vec::new();
        while let Ok(event) = GlobalHotKeyEvent::receiver().try_recv() {
            if event.state != HotKeyState::Pressed {
                continue;
            }
            match self.registered.get(&event.id) {
                Some((action, _)) => actions.push(*action),
                None => tracing::trace!(id = event.id, "hotkey event for released combo"),
            }
        }
        actions
    }
}
