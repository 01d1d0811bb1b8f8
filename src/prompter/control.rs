use crate::prompter::channel::{SendError, Sender};
use crate::prompter::messages::{ControlToHost, HostMessage, TeleprompterData};
use crate::prompter::scroll::clamp_speed;

/// Draft script and speed edited in the control window.
pub struct ControlSurface {
    draft: TeleprompterData,
    outbox: Sender<HostMessage>,
    last_error: Option<String>,
}

impl ControlSurface {
    pub fn new(outbox: Sender<HostMessage>, default_speed: f64) -> Self {
        Self {
            draft: TeleprompterData {
                script: String::new(),
                speed: clamp_speed(default_speed),
            },
            outbox,
            last_error: None,
        }
    }

    pub fn draft(&self) -> &TeleprompterData {
        &self.draft
    }

    pub fn script_mut(&mut self) -> &mut String {
        &mut self.draft.script
    }

    pub fn set_script(&mut self, script: impl Into<String>) {
        self.draft.script = script.into();
    }

    /// Accept a speed from the operator, clamped to the playable range.
    pub fn set_speed(&mut self, raw: f64) -> f64 {
        self.draft.speed = clamp_speed(raw);
        self.draft.speed
    }

    pub fn speed_label(&self) -> String {
        format!("{:.1}x", self.draft.speed)
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn set_error(&mut self, error: impl Into<String>) {
        self.last_error = Some(error.into());
    }

    /// Hand a snapshot of the draft to the host. The overlay gets its own
    /// copy; later draft edits do not reach it.
    pub fn start(&mut self) -> Result<(), SendError<HostMessage>> {
        self.last_error = None;
        tracing::info!(chars = self.draft.script.len(), speed = self.draft.speed, "starting teleprompter");
        self.outbox
            .send(HostMessage::Control(ControlToHost::StartOverlay(self.draft.clone())))
    }

    pub fn close(&self) -> Result<(), SendError<HostMessage>> {
        self.outbox.send(HostMessage::Control(ControlToHost::CloseControl))
    }

    pub fn minimize(&self) -> Result<(), SendError<HostMessage>> {
        self.outbox.send(HostMessage::Control(ControlToHost::MinimizeControl))
    }
}
