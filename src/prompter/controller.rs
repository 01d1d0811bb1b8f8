use crate::hotkey::{HotkeyAction, HotkeyBackend, HotkeyBindings, HotkeyDispatcher, HotkeyScope};
use crate::prompter::channel::{self, Receiver, Sender};
use crate::prompter::host::{
    centered_bounds, overlay_bounds, WindowFlags, WindowHandle, WindowHost, WindowRole,
};
use crate::prompter::messages::{
    ControlToHost, HostMessage, HostToOverlay, OverlayToHost, TeleprompterData,
};
use crate::prompter::mode::{InteractionMode, InteractionModeMachine};
use crate::prompter::state::{can_transition, SessionLifecycle};
use std::fmt;

/// Show the control window anyway if it has not painted within this time.
pub const CONTROL_SHOW_FALLBACK_MS: f64 = 1000.0;

#[derive(Debug, Clone, PartialEq)]
pub struct ControllerConfig {
    pub overlay_size: (f32, f32),
    pub control_size: (f32, f32),
    pub bindings: HotkeyBindings,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            overlay_size: (800.0, 200.0),
            control_size: (1000.0, 800.0),
            bindings: HotkeyBindings::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartError {
    WindowCreation(String),
}

impl fmt::Display for StartError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StartError::WindowCreation(msg) => write!(f, "could not create overlay window: {msg}"),
        }
    }
}

impl std::error::Error for StartError {}

/// The overlay window's end of the channel.
pub struct OverlayEndpoint {
    pub window: WindowHandle,
    pub inbox: Receiver<HostToOverlay>,
    pub outbox: Sender<HostMessage>,
}

impl fmt::Debug for OverlayEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OverlayEndpoint")
            .field("window", &self.window)
            .finish_non_exhaustive()
    }
}

#[derive(Debug)]
pub enum ControllerEvent {
    OverlayStarted(OverlayEndpoint),
    StartFailed(StartError),
    OverlayClosed(WindowHandle),
    /// Last window is gone; the process should exit.
    Quit,
}

struct OverlaySession<B: HotkeyBackend> {
    window: WindowHandle,
    lifecycle: SessionLifecycle,
    pending_init: Option<TeleprompterData>,
    mode: InteractionModeMachine,
    to_overlay: Sender<HostToOverlay>,
    hotkeys: HotkeyScope<B>,
}

struct ControlWindow {
    handle: WindowHandle,
    shown: bool,
    created_at_ms: f64,
}

/// Owns the control window, at most one overlay session, and the hotkeys
/// bound to that session.
pub struct OverlaySessionController<H: WindowHost, B: HotkeyBackend> {
    host: H,
    dispatcher: HotkeyDispatcher<B>,
    config: ControllerConfig,
    control: Option<ControlWindow>,
    session: Option<OverlaySession<B>>,
    inbox: Receiver<HostMessage>,
    inbox_tx: Sender<HostMessage>,
}

impl<H: WindowHost, B: HotkeyBackend> OverlaySessionController<H, B> {
    pub fn new(host: H, dispatcher: HotkeyDispatcher<B>, config: ControllerConfig) -> Self {
        let (inbox_tx, inbox) = channel::channel();
        Self {
            host,
            dispatcher,
            config,
            control: None,
            session: None,
            inbox,
            inbox_tx,
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Sender for the control window and anything else that talks to the host.
    pub fn sender(&self) -> Sender<HostMessage> {
        self.inbox_tx.clone()
    }

    pub fn lifecycle(&self) -> SessionLifecycle {
        self.session
            .as_ref()
            .map(|s| s.lifecycle)
            .unwrap_or(SessionLifecycle::Idle)
    }

    pub fn overlay_window(&self) -> Option<WindowHandle> {
        self.session.as_ref().map(|s| s.window)
    }

    pub fn control_window(&self) -> Option<WindowHandle> {
        self.control.as_ref().map(|c| c.handle)
    }

    pub fn control_visible(&self) -> bool {
        self.control.as_ref().is_some_and(|c| c.shown)
    }

    /// Current mode of the live overlay, for late subscribers.
    pub fn current_mode(&self) -> Option<InteractionMode> {
        self.session.as_ref().map(|s| s.mode.current())
    }

    pub fn registered_hotkeys(&self) -> usize {
        self.session
            .as_ref()
            .map(|s| s.hotkeys.registered().len())
            .unwrap_or(0)
    }

    /// Shortcuts the live session is running without, with the reason.
    pub fn hotkey_failures(&self) -> Vec<String> {
        self.session
            .as_ref()
            .map(|s| {
                s.hotkeys
                    .failures()
                    .iter()
                    .map(|(_, err)| err.to_string())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn open_control(&mut self, now_ms: f64) -> anyhow::Result<WindowHandle> {
        if let Some(control) = &self.control {
            return Ok(control.handle);
        }
        let (width, height) = self.config.control_size;
        let bounds = centered_bounds(self.host.primary_display(), width, height);
        let handle = self
            .host
            .create_window(WindowRole::Control, bounds, WindowFlags::control())?;
        tracing::info!(?handle, "control window created");
        self.control = Some(ControlWindow {
            handle,
            shown: false,
            created_at_ms: now_ms,
        });
        Ok(handle)
    }

    /// Recreate the control window when the application is re-activated
    /// with no window open.
    pub fn reactivate(&mut self, now_ms: f64) -> anyhow::Result<Option<WindowHandle>> {
        if self.control.is_some() || self.session.is_some() {
            return Ok(None);
        }
        self.open_control(now_ms).map(Some)
    }

    /// A window finished its first paint.
    pub fn on_window_ready(&mut self, window: WindowHandle) {
        if self.control_window() == Some(window) {
            self.show_control();
            return;
        }
        self.deliver_init(window);
    }

    /// Periodic housekeeping that does not depend on messages.
    pub fn tick(&mut self, now_ms: f64) {
        let overdue = self.control.as_ref().is_some_and(|c| {
            !c.shown && now_ms - c.created_at_ms >= CONTROL_SHOW_FALLBACK_MS
        });
        if overdue && self.session.is_none() {
            tracing::debug!("control window never reported ready; showing it anyway");
            self.show_control();
        }
    }

    /// Create the overlay for `payload`. A live session is torn down first.
    pub fn start(&mut self, payload: TeleprompterData) -> Result<OverlayEndpoint, StartError> {
        if self.session.is_some() {
            tracing::info!("replacing running overlay session");
            self.end_session(true, false);
        }

        let (width, height) = self.config.overlay_size;
        let bounds = overlay_bounds(self.host.primary_display(), width, height);
        let window = match self
            .host
            .create_window(WindowRole::Overlay, bounds, WindowFlags::overlay())
        {
            Ok(window) => window,
            Err(err) => {
                tracing::error!(?err, "overlay window creation failed");
                self.show_control();
                return Err(StartError::WindowCreation(format!("{err:#}")));
            }
        };
        self.host.set_click_through(window, true);

        let hotkeys = self.dispatcher.acquire(&self.config.bindings);
        if let Some(handle) = self.control_window() {
            self.host.hide_window(handle);
            if let Some(control) = self.control.as_mut() {
                control.shown = false;
            }
        }

        let (to_overlay, overlay_inbox) = channel::channel();
        let session = OverlaySession {
            window,
            lifecycle: SessionLifecycle::Idle,
            pending_init: Some(payload),
            mode: InteractionModeMachine::new(),
            to_overlay,
            hotkeys,
        };
        self.session = Some(session);
        self.transition(SessionLifecycle::AwaitingReady);
        tracing::info!(?window, "overlay session started");

        Ok(OverlayEndpoint {
            window,
            inbox: overlay_inbox,
            outbox: self.inbox_tx.clone(),
        })
    }

    /// Drain hotkey presses and channel messages, in arrival order.
    pub fn pump(&mut self) -> Vec<ControllerEvent> {
        for action in self.dispatcher.poll() {
            if self.session.is_none() {
                tracing::trace!(?action, "hotkey without overlay session");
                continue;
            }
            if let Err(err) = self.inbox_tx.send(HostMessage::Hotkey(action)) {
                tracing::warn!(%err, ?action, "dropping hotkey event");
            }
        }

        let mut events = Vec::new();
        for message in self.inbox.drain() {
            events.extend(self.handle(message));
        }
        events
    }

    pub fn handle(&mut self, message: HostMessage) -> Option<ControllerEvent> {
        match message {
            HostMessage::Control(ControlToHost::StartOverlay(payload)) => {
                Some(match self.start(payload) {
                    Ok(endpoint) => ControllerEvent::OverlayStarted(endpoint),
                    Err(err) => ControllerEvent::StartFailed(err),
                })
            }
            HostMessage::Control(ControlToHost::CloseControl) => self.close_control(),
            HostMessage::Control(ControlToHost::MinimizeControl) => {
                self.minimize_control();
                None
            }
            HostMessage::Overlay { window, message } => {
                if self.overlay_window() != Some(window) {
                    tracing::debug!(?window, ?message, "ignoring message from closed overlay");
                    return None;
                }
                match message {
                    OverlayToHost::Ready => {
                        self.deliver_init(window);
                        None
                    }
                    OverlayToHost::QueryInteractionMode => {
                        self.broadcast_mode();
                        None
                    }
                    OverlayToHost::CloseOverlay => self.close_overlay(),
                }
            }
            HostMessage::Hotkey(action) => match action {
                HotkeyAction::TogglePlayPause => {
                    self.toggle_play_pause();
                    None
                }
                HotkeyAction::ToggleInteraction => {
                    self.toggle_interaction();
                    None
                }
                HotkeyAction::CloseOverlay => self.close_overlay(),
            },
        }
    }

    pub fn toggle_play_pause(&mut self) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        if let Err(err) = session.to_overlay.send(HostToOverlay::TogglePlayPause) {
            tracing::warn!(%err, "overlay did not receive play/pause");
        }
    }

    pub fn toggle_interaction(&mut self) -> Option<InteractionMode> {
        let session = self.session.as_mut()?;
        let mode = session.mode.flip();
        let window = session.window;
        self.host.set_click_through(window, mode.passes_mouse_through());
        if mode.is_interactive() {
            self.host.focus_window(window);
        }
        self.broadcast_mode();
        Some(mode)
    }

    /// Close the overlay from the host side (hotkey or overlay request).
    pub fn close_overlay(&mut self) -> Option<ControllerEvent> {
        let window = self.overlay_window()?;
        self.end_session(true, true);
        Some(ControllerEvent::OverlayClosed(window))
    }

    /// The window host reports that `window` is gone, whatever the cause.
    pub fn on_window_closed(&mut self, window: WindowHandle) -> Option<ControllerEvent> {
        if self.overlay_window() == Some(window) {
            self.end_session(false, true);
            self.host.forget_window(window);
            return Some(ControllerEvent::OverlayClosed(window));
        }
        if self.control_window() == Some(window) {
            self.control = None;
            self.host.forget_window(window);
            return self.close_control();
        }
        None
    }

    /// Closing the control window closes the overlay first, then quits.
    pub fn close_control(&mut self) -> Option<ControllerEvent> {
        if self.session.is_some() {
            self.end_session(true, false);
        }
        if let Some(control) = self.control.take() {
            self.host.close_window(control.handle);
        }
        tracing::info!("control window closed; quitting");
        self.host.quit();
        Some(ControllerEvent::Quit)
    }

    pub fn minimize_control(&mut self) {
        if let Some(handle) = self.control_window() {
            self.host.minimize_window(handle);
        }
    }

    /// Application quit: release the session and every hotkey.
    pub fn shutdown(&mut self) {
        if self.session.is_some() {
            self.end_session(true, false);
        }
        self.dispatcher.backend().borrow_mut().unregister_all();
    }

    fn deliver_init(&mut self, window: WindowHandle) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if session.window != window {
            return;
        }
        let Some(payload) = session.pending_init.take() else {
            tracing::trace!(?window, "init payload already delivered");
            return;
        };
        if let Err(err) = session.to_overlay.send(HostToOverlay::InitOverlay(payload)) {
            tracing::warn!(%err, "overlay vanished before init");
        }
        self.transition(SessionLifecycle::Active);
        self.host.request_frame(window);
    }

    fn broadcast_mode(&mut self) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        let interactive = session.mode.current().is_interactive();
        if let Err(err) = session
            .to_overlay
            .send(HostToOverlay::InteractionModeChanged { interactive })
        {
            tracing::warn!(%err, "overlay did not receive mode change");
        }
        self.host.request_frame(session.window);
    }

    fn show_control(&mut self) {
        let Some(control) = self.control.as_mut() else {
            return;
        };
        self.host.show_window(control.handle);
        self.host.focus_window(control.handle);
        control.shown = true;
    }

    fn end_session(&mut self, close_window: bool, restore_control: bool) {
        let Some(session) = self.session.take() else {
            return;
        };
        if !can_transition(session.lifecycle, SessionLifecycle::Idle) {
            tracing::error!(from = ?session.lifecycle, "invalid overlay teardown");
        }
        let OverlaySession {
            window, hotkeys, ..
        } = session;
        hotkeys.release();
        if close_window {
            self.host.close_window(window);
        }
        tracing::info!(?window, "overlay session ended");
        if restore_control {
            self.show_control();
        }
    }

    fn transition(&mut self, to: SessionLifecycle) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if can_transition(session.lifecycle, to) {
            session.lifecycle = to;
        } else {
            tracing::error!(from = ?session.lifecycle, ?to, "invalid overlay lifecycle transition");
        }
    }
}

impl<H: WindowHost, B: HotkeyBackend> Drop for OverlaySessionController<H, B> {
    fn drop(&mut self) {
        if self.session.is_some() {
            self.end_session(true, false);
        }
    }
}
