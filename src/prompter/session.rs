use crate::prompter::messages::TeleprompterData;
use crate::prompter::mode::{InteractionMode, InteractionModeMachine, ModeTransition};
use crate::prompter::scroll::{clamp_speed, Advance, PlayState, ScrollEngine};

/// What a single frame did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameOutcome {
    pub advance: Option<Advance>,
    /// The delayed end-of-script rewind fired on this frame.
    pub rewound: bool,
}

/// Per-overlay state: the script snapshot, the scroll engine and the local
/// view of the interaction mode.
#[derive(Debug, Clone, Default)]
pub struct TeleprompterSession {
    script: String,
    engine: ScrollEngine,
    mode: InteractionModeMachine,
    initialized: bool,
}

impl TeleprompterSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script(&self) -> &str {
        &self.script
    }

    pub fn speed(&self) -> f64 {
        self.engine.speed()
    }

    pub fn offset(&self) -> f64 {
        self.engine.offset()
    }

    pub fn play_state(&self) -> PlayState {
        self.engine.play_state()
    }

    pub fn mode(&self) -> InteractionMode {
        self.mode.current()
    }

    pub fn engine(&self) -> &ScrollEngine {
        &self.engine
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Apply the start-up payload. Only the first payload is accepted; an
    /// unusable speed keeps the current one.
    pub fn apply_init(&mut self, data: &TeleprompterData) -> bool {
        if self.initialized {
            tracing::warn!("ignoring repeated overlay init payload");
            return false;
        }
        self.initialized = true;
        self.script = data.script.clone();
        if !self.engine.set_speed(data.speed) {
            tracing::warn!(speed = data.speed, "init payload speed unusable; keeping default");
        }
        tracing::info!(chars = self.script.len(), speed = self.engine.speed(), "overlay initialised");
        true
    }

    pub fn set_interaction_mode(&mut self, mode: InteractionMode) -> ModeTransition {
        let transition = self.mode.enter(mode, self.engine.play_state());
        if transition.stop_playback {
            self.engine.pause();
        }
        transition
    }

    pub fn toggle_play_pause(&mut self, now_ms: f64) -> PlayState {
        self.engine.toggle(now_ms)
    }

    pub fn play(&mut self, now_ms: f64) {
        self.engine.play(now_ms);
    }

    pub fn pause(&mut self) {
        self.engine.pause();
    }

    pub fn restart(&mut self) {
        self.engine.reset();
    }

    /// Operator speed input, clamped to the accepted range.
    pub fn set_speed(&mut self, raw: f64) -> f64 {
        self.engine.set_speed(clamp_speed(raw));
        self.engine.speed()
    }

    /// Replace the script. Only allowed while the operator has the editor.
    pub fn edit_script(&mut self, script: impl Into<String>) -> bool {
        if !self.mode.current().is_interactive() {
            tracing::debug!("script edit rejected outside interactive mode");
            return false;
        }
        self.script = script.into();
        true
    }

    pub fn set_extents(&mut self, content_extent: f64, viewport_extent: f64) {
        self.engine.set_extents(content_extent, viewport_extent);
    }

    pub fn wants_frames(&self) -> bool {
        self.engine.wants_frames()
    }

    pub fn on_frame(&mut self, now_ms: f64) -> FrameOutcome {
        let advance = self
            .engine
            .subscription()
            .and_then(|subscription| self.engine.tick(subscription, now_ms));
        let rewound = self.engine.poll_reset(now_ms);
        FrameOutcome { advance, rewound }
    }

    /// Stop everything so no later frame can move the script.
    pub fn teardown(&mut self) {
        self.engine.pause();
        self.engine.reset();
    }
}
