use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Space,
    Tab,
    Enter,
    Escape,
    Delete,
    Backspace,
    Home,
    End,
    PageUp,
    PageDown,
    Left,
    Right,
    Up,
    Down,
    F(u8),
    Letter(char),
    Digit(u8),
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Space => write!(f, "Space"),
            Key::Tab => write!(f, "Tab"),
            Key::Enter => write!(f, "Enter"),
            Key::Escape => write!(f, "Esc"),
            Key::Delete => write!(f, "Delete"),
            Key::Backspace => write!(f, "Backspace"),
            Key::Home => write!(f, "Home"),
            Key::End => write!(f, "End"),
            Key::PageUp => write!(f, "PageUp"),
            Key::PageDown => write!(f, "PageDown"),
            Key::Left => write!(f, "Left"),
            Key::Right => write!(f, "Right"),
            Key::Up => write!(f, "Up"),
            Key::Down => write!(f, "Down"),
            Key::F(n) => write!(f, "F{n}"),
            Key::Letter(c) => write!(f, "{c}"),
            Key::Digit(d) => write!(f, "{d}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Hotkey {
    pub key: Key,
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    /// Cmd on macOS, the Windows/Super key elsewhere.
    pub meta: bool,
}

impl fmt::Display for Hotkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ctrl {
            write!(f, "Ctrl+")?;
        }
        if self.meta {
            write!(f, "Meta+")?;
        }
        if self.alt {
            write!(f, "Alt+")?;
        }
        if self.shift {
            write!(f, "Shift+")?;
        }
        write!(f, "{}", self.key)
    }
}

/// Parse a hotkey string like "Ctrl+Shift+L" or "CommandOrControl+Space"
/// into a [`Hotkey`].
pub fn parse_hotkey(s: &str) -> Option<Hotkey> {
    let mut ctrl = false;
    let mut shift = false;
    let mut alt = false;
    let mut meta = false;
    let mut key: Option<Key> = None;

    for part in s.split('+') {
        let upper = part.trim().to_ascii_uppercase();
        match upper.as_str() {
            "CTRL" | "CONTROL" => ctrl = true,
            "SHIFT" => shift = true,
            "ALT" | "OPTION" => alt = true,
            "CMD" | "COMMAND" | "SUPER" | "META" | "WIN" => meta = true,
            "COMMANDORCONTROL" | "CMDORCTRL" | "CMDORCONTROL" => {
                if cfg!(target_os = "macos") {
                    meta = true;
                } else {
                    ctrl = true;
                }
            }
            "" => {}
            _ => {
                if key.is_some() {
                    return None;
                }
                key = Some(parse_key(&upper)?);
            }
        }
    }

    key.map(|key| Hotkey {
        key,
        ctrl,
        shift,
        alt,
        meta,
    })
}

fn parse_key(upper: &str) -> Option<Key> {
    match upper {
        "SPACE" => Some(Key::Space),
        "TAB" => Some(Key::Tab),
        "ENTER" | "RETURN" => Some(Key::Enter),
        "ESC" | "ESCAPE" => Some(Key::Escape),
        "DELETE" => Some(Key::Delete),
        "BACKSPACE" => Some(Key::Backspace),
        "HOME" => Some(Key::Home),
        "END" => Some(Key::End),
        "PAGEUP" => Some(Key::PageUp),
        "PAGEDOWN" => Some(Key::PageDown),
        "LEFT" | "LEFTARROW" => Some(Key::Left),
        "RIGHT" | "RIGHTARROW" => Some(Key::Right),
        "UP" | "UPARROW" => Some(Key::Up),
        "DOWN" | "DOWNARROW" => Some(Key::Down),
        _ if upper.len() > 1 && upper.starts_with('F') => match upper[1..].parse::<u8>().ok() {
            Some(n @ 1..=12) => Some(Key::F(n)),
            _ => None,
        },
        _ => {
            let mut chars = upper.chars();
            let c = chars.next()?;
            if chars.next().is_some() {
                return None;
            }
            if let Some(d) = c.to_digit(10) {
                Some(Key::Digit(d as u8))
            } else if c.is_ascii_alphabetic() {
                Some(Key::Letter(c))
            } else {
                None
            }
        }
    }
}

/// The fixed set of shortcuts available while an overlay is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HotkeyAction {
    TogglePlayPause,
    ToggleInteraction,
    CloseOverlay,
}

impl HotkeyAction {
    pub const ALL: [HotkeyAction; 3] = [
        HotkeyAction::TogglePlayPause,
        HotkeyAction::ToggleInteraction,
        HotkeyAction::CloseOverlay,
    ];
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HotkeyBindings {
    pub play_pause: Hotkey,
    pub toggle_interaction: Hotkey,
    pub close_overlay: Hotkey,
}

impl Default for HotkeyBindings {
    fn default() -> Self {
        let parse = |s: &str| parse_hotkey(s).unwrap_or(Hotkey {
            key: Key::Space,
            ctrl: true,
            shift: false,
            alt: false,
            meta: false,
        });
        Self {
            play_pause: parse(DEFAULT_PLAY_PAUSE),
            toggle_interaction: parse(DEFAULT_TOGGLE_INTERACTION),
            close_overlay: parse(DEFAULT_CLOSE_OVERLAY),
        }
    }
}

pub const DEFAULT_PLAY_PAUSE: &str = "CommandOrControl+Space";
pub const DEFAULT_TOGGLE_INTERACTION: &str = "CommandOrControl+Shift+L";
pub const DEFAULT_CLOSE_OVERLAY: &str = "CommandOrControl+Alt+X";

impl HotkeyBindings {
    pub fn get(&self, action: HotkeyAction) -> Hotkey {
        match action {
            HotkeyAction::TogglePlayPause => self.play_pause,
            HotkeyAction::ToggleInteraction => self.toggle_interaction,
            HotkeyAction::CloseOverlay => self.close_overlay,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (HotkeyAction, Hotkey)> + '_ {
        HotkeyAction::ALL.into_iter().map(|a| (a, self.get(a)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HotkeyError {
    /// No platform hotkey service (e.g. no display server).
    Unavailable,
    /// The combination cannot be expressed on this platform.
    Unsupported(Hotkey),
    /// The OS refused, usually because another application owns the combo.
    Rejected { hotkey: Hotkey, reason: String },
}

impl fmt::Display for HotkeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HotkeyError::Unavailable => write!(f, "global hotkeys are unavailable"),
            HotkeyError::Unsupported(hk) => write!(f, "hotkey '{hk}' is not supported"),
            HotkeyError::Rejected { hotkey, reason } => {
                write!(f, "failed to register hotkey '{hotkey}': {reason}")
            }
        }
    }
}

impl std::error::Error for HotkeyError {}

/// Process-wide key-combo registration provided by the platform.
pub trait HotkeyBackend {
    fn register(&mut self, action: HotkeyAction, hotkey: Hotkey) -> Result<(), HotkeyError>;

    fn unregister(&mut self, hotkey: Hotkey) -> Result<(), HotkeyError>;

    fn unregister_all(&mut self);

    /// Actions whose combos were pressed since the last poll.
    fn poll_events(&mut self) -> Vec<HotkeyAction>;
}

/// Hands out session-scoped hotkey sets and relays presses.
pub struct HotkeyDispatcher<B: HotkeyBackend> {
    backend: Rc<RefCell<B>>,
}

impl<B: HotkeyBackend> Clone for HotkeyDispatcher<B> {
    fn clone(&self) -> Self {
        Self {
            backend: self.backend.clone(),
        }
    }
}

impl<B: HotkeyBackend> HotkeyDispatcher<B> {
    pub fn new(backend: Rc<RefCell<B>>) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &Rc<RefCell<B>> {
        &self.backend
    }

    /// Register `bindings` for one overlay session. Anything still registered
    /// is released first so combos never fire twice. Individual failures are
    /// logged and the session continues without that shortcut.
    pub fn acquire(&self, bindings: &HotkeyBindings) -> HotkeyScope<B> {
        self.backend.borrow_mut().unregister_all();
        let mut scope = HotkeyScope {
            backend: self.backend.clone(),
            registered: Vec::new(),
            failures: Vec::new(),
            released: false,
        };
        for (action, hotkey) in bindings.iter() {
            scope.register(action, hotkey);
        }
        scope
    }

    pub fn poll(&self) -> Vec<HotkeyAction> {
        self.backend.borrow_mut().poll_events()
    }
}

/// Hotkeys held for the lifetime of one overlay session. Dropping the scope
/// unregisters everything, including on unwinding.
pub struct HotkeyScope<B: HotkeyBackend> {
    backend: Rc<RefCell<B>>,
    registered: Vec<(HotkeyAction, Hotkey)>,
    failures: Vec<(HotkeyAction, HotkeyError)>,
    released: bool,
}

impl<B: HotkeyBackend> HotkeyScope<B> {
    /// Bind `hotkey` to `action`, replacing an earlier binding of either.
    pub fn register(&mut self, action: HotkeyAction, hotkey: Hotkey) -> bool {
        let stale: Vec<Hotkey> = self
            .registered
            .iter()
            .filter(|(a, hk)| *a == action || *hk == hotkey)
            .map(|(_, hk)| *hk)
            .collect();
        {
            let mut backend = self.backend.borrow_mut();
            for hk in &stale {
                if let Err(err) = backend.unregister(*hk) {
                    tracing::warn!(%err, hotkey = %hk, "failed to release replaced hotkey");
                }
            }
        }
        self.registered
            .retain(|(a, hk)| *a != action && *hk != hotkey);
        self.failures.retain(|(a, _)| *a != action);

        let result = self.backend.borrow_mut().register(action, hotkey);
        match result {
            Ok(()) => {
                tracing::info!(?action, hotkey = %hotkey, "registered hotkey");
                self.registered.push((action, hotkey));
                true
            }
            Err(err) => {
                tracing::warn!(?action, %err, "continuing without hotkey");
                self.failures.push((action, err));
                false
            }
        }
    }

    pub fn registered(&self) -> &[(HotkeyAction, Hotkey)] {
        &self.registered
    }

    pub fn failures(&self) -> &[(HotkeyAction, HotkeyError)] {
        &self.failures
    }

    pub fn release(mut self) {
        self.release_inner();
    }

    fn release_inner(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        if let Ok(mut backend) = self.backend.try_borrow_mut() {
            backend.unregister_all();
            tracing::info!(count = self.registered.len(), "released session hotkeys");
        } else {
            tracing::error!("hotkey backend busy; session hotkeys not released");
        }
        self.registered.clear();
    }
}

impl<B: HotkeyBackend> Drop for HotkeyScope<B> {
    fn drop(&mut self) {
        self.release_inner();
    }
}
