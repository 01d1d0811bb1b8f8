use crate::prompter::scroll::PlayState;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InteractionMode {
    #[default]
    ClickThrough,
    Interactive,
}

impl InteractionMode {
    pub fn from_interactive(interactive: bool) -> Self {
        if interactive {
            Self::Interactive
        } else {
            Self::ClickThrough
        }
    }

    pub fn is_interactive(self) -> bool {
        matches!(self, Self::Interactive)
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::ClickThrough => Self::Interactive,
            Self::Interactive => Self::ClickThrough,
        }
    }

    /// Mouse input reaches the window underneath the overlay.
    pub fn passes_mouse_through(self) -> bool {
        !self.is_interactive()
    }

    /// Editor and playback controls are shown instead of read-only text.
    pub fn shows_controls(self) -> bool {
        self.is_interactive()
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::ClickThrough => "👻 Click-Through",
            Self::Interactive => "🖱 Interactive",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeTransition {
    pub from: InteractionMode,
    pub to: InteractionMode,
    /// Playback has to stop: the operator is entering the editor while the
    /// script is moving.
    pub stop_playback: bool,
}

impl ModeTransition {
    pub fn changed(&self) -> bool {
        self.from != self.to
    }
}

#[derive(Debug, Clone, Default)]
pub struct InteractionModeMachine {
    mode: InteractionMode,
}

impl InteractionModeMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> InteractionMode {
        self.mode
    }

    /// Flip the mode without regard to playback. Used by the host, which
    /// leaves pausing to the overlay that owns the scroll engine.
    pub fn flip(&mut self) -> InteractionMode {
        self.mode = self.mode.toggled();
        tracing::debug!(mode = ?self.mode, "interaction mode flipped");
        self.mode
    }

    pub fn enter(&mut self, mode: InteractionMode, play_state: PlayState) -> ModeTransition {
        let from = self.mode;
        self.mode = mode;
        let transition = ModeTransition {
            from,
            to: mode,
            stop_playback: from != mode && mode.is_interactive() && play_state.is_playing(),
        };
        if transition.changed() {
            tracing::debug!(?from, to = ?mode, stop_playback = transition.stop_playback, "interaction mode changed");
        }
        transition
    }
}
