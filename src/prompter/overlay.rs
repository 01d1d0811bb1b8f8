use crate::prompter::channel::{Receiver, Sender, TryRecvError};
use crate::prompter::controller::OverlayEndpoint;
use crate::prompter::host::WindowHandle;
use crate::prompter::messages::{HostMessage, HostToOverlay, OverlayToHost};
use crate::prompter::mode::InteractionMode;
use crate::prompter::scroll::PlayState;
use crate::prompter::session::{FrameOutcome, TeleprompterSession};

/// The overlay window's side of a session. Talks to the host only through
/// its channel endpoint and stops doing anything once the host drops it.
pub struct OverlayRuntime {
    window: WindowHandle,
    inbox: Receiver<HostToOverlay>,
    outbox: Sender<HostMessage>,
    session: TeleprompterSession,
    painted: bool,
    alive: bool,
}

impl OverlayRuntime {
    pub fn new(endpoint: OverlayEndpoint) -> Self {
        let OverlayEndpoint {
            window,
            inbox,
            outbox,
        } = endpoint;
        Self {
            window,
            inbox,
            outbox,
            session: TeleprompterSession::new(),
            painted: false,
            alive: true,
        }
    }

    pub fn window(&self) -> WindowHandle {
        self.window
    }

    pub fn session(&self) -> &TeleprompterSession {
        &self.session
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn mode(&self) -> InteractionMode {
        self.session.mode()
    }

    fn send(&self, message: OverlayToHost) {
        let tagged = HostMessage::Overlay {
            window: self.window,
            message,
        };
        if let Err(err) = self.outbox.send(tagged) {
            tracing::warn!(%err, "host unreachable from overlay");
        }
    }

    /// Called after the first completed paint; later calls do nothing.
    pub fn on_painted(&mut self) {
        if self.painted || !self.alive {
            return;
        }
        self.painted = true;
        self.send(OverlayToHost::Ready);
        // The mode may have changed before this window was listening.
        self.send(OverlayToHost::QueryInteractionMode);
    }

    pub fn pump_messages(&mut self, now_ms: f64) {
        if !self.alive {
            return;
        }
        loop {
            match self.inbox.try_recv() {
                Ok(HostToOverlay::InitOverlay(data)) => {
                    self.session.apply_init(&data);
                }
                Ok(HostToOverlay::InteractionModeChanged { interactive }) => {
                    self.session
                        .set_interaction_mode(InteractionMode::from_interactive(interactive));
                }
                Ok(HostToOverlay::TogglePlayPause) => {
                    let state = self.session.toggle_play_pause(now_ms);
                    tracing::debug!(?state, "play/pause toggled by hotkey");
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    tracing::debug!(window = ?self.window, "overlay session torn down");
                    self.teardown();
                    break;
                }
            }
        }
    }

    /// Advance one display frame. A no-op after teardown.
    pub fn frame(&mut self, now_ms: f64, content_extent: f64, viewport_extent: f64) -> FrameOutcome {
        if !self.alive {
            return FrameOutcome::default();
        }
        self.session.set_extents(content_extent, viewport_extent);
        self.session.on_frame(now_ms)
    }

    pub fn wants_frames(&self) -> bool {
        self.alive && self.session.wants_frames()
    }

    pub fn toggle_play_pause(&mut self, now_ms: f64) -> PlayState {
        if !self.alive {
            return self.session.play_state();
        }
        self.session.toggle_play_pause(now_ms)
    }

    pub fn set_speed(&mut self, raw: f64) -> f64 {
        self.session.set_speed(raw)
    }

    pub fn edit_script(&mut self, script: impl Into<String>) -> bool {
        self.alive && self.session.edit_script(script)
    }

    pub fn restart(&mut self) {
        self.session.restart();
    }

    pub fn request_close(&self) {
        if self.alive {
            self.send(OverlayToHost::CloseOverlay);
        }
    }

    fn teardown(&mut self) {
        self.alive = false;
        self.session.teardown();
    }
}
