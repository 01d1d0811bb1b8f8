use crate::hotkey::HotkeyAction;
use crate::prompter::host::WindowHandle;
use crate::prompter::scroll::DEFAULT_SPEED;
use serde::{Deserialize, Serialize};

/// Script and speed handed from the control window to a new overlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeleprompterData {
    #[serde(default)]
    pub script: String,
    #[serde(default = "default_speed")]
    pub speed: f64,
}

fn default_speed() -> f64 {
    DEFAULT_SPEED
}

impl Default for TeleprompterData {
    fn default() -> Self {
        Self {
            script: String::new(),
            speed: DEFAULT_SPEED,
        }
    }
}

/// Discriminant used by the channel to keep at most one pending state
/// message of each kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    StartOverlay,
    CloseControl,
    MinimizeControl,
    OverlayReady,
    QueryInteractionMode,
    CloseOverlay,
    Hotkey(HotkeyAction),
    InitOverlay,
    InteractionModeChanged,
    TogglePlayPause,
}

impl MessageKind {
    /// State snapshots may be merged with a pending message of the same kind.
    /// Commands must each be delivered: two toggles cancel out.
    pub fn coalesces(self) -> bool {
        !matches!(self, MessageKind::Hotkey(_) | MessageKind::TogglePlayPause)
    }
}

pub trait Message {
    fn kind(&self) -> MessageKind;
}

#[derive(Debug, Clone, PartialEq)]
pub enum ControlToHost {
    StartOverlay(TeleprompterData),
    CloseControl,
    MinimizeControl,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverlayToHost {
    /// First paint completed.
    Ready,
    QueryInteractionMode,
    CloseOverlay,
}

/// Everything the host side receives, tagged by origin.
#[derive(Debug, Clone, PartialEq)]
pub enum HostMessage {
    Control(ControlToHost),
    Overlay {
        window: WindowHandle,
        message: OverlayToHost,
    },
    Hotkey(HotkeyAction),
}

#[derive(Debug, Clone, PartialEq)]
pub enum HostToOverlay {
    InitOverlay(TeleprompterData),
    InteractionModeChanged { interactive: bool },
    TogglePlayPause,
}

impl Message for HostMessage {
    fn kind(&self) -> MessageKind {
        match self {
            HostMessage::Control(ControlToHost::StartOverlay(_)) => MessageKind::StartOverlay,
            HostMessage::Control(ControlToHost::CloseControl) => MessageKind::CloseControl,
            HostMessage::Control(ControlToHost::MinimizeControl) => MessageKind::MinimizeControl,
            HostMessage::Overlay { message, .. } => match message {
                OverlayToHost::Ready => MessageKind::OverlayReady,
                OverlayToHost::QueryInteractionMode => MessageKind::QueryInteractionMode,
                OverlayToHost::CloseOverlay => MessageKind::CloseOverlay,
            },
            HostMessage::Hotkey(action) => MessageKind::Hotkey(*action),
        }
    }
}

impl Message for HostToOverlay {
    fn kind(&self) -> MessageKind {
        match self {
            HostToOverlay::InitOverlay(_) => MessageKind::InitOverlay,
            HostToOverlay::InteractionModeChanged { .. } => MessageKind::InteractionModeChanged,
            HostToOverlay::TogglePlayPause => MessageKind::TogglePlayPause,
        }
    }
}
