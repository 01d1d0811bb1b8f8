use crate::hotkey::{
    parse_hotkey, Hotkey, HotkeyBindings, DEFAULT_CLOSE_OVERLAY, DEFAULT_PLAY_PAUSE,
    DEFAULT_TOGGLE_INTERACTION,
};
use crate::prompter::controller::ControllerConfig;
use crate::prompter::scroll::{clamp_speed, DEFAULT_SPEED};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Settings {
    /// Toggles scrolling while the overlay is open.
    #[serde(default = "default_play_pause_hotkey")]
    pub play_pause_hotkey: String,
    /// Switches the overlay between click-through and interactive.
    #[serde(default = "default_interaction_hotkey")]
    pub interaction_hotkey: String,
    /// Closes the overlay and brings the control window back.
    #[serde(default = "default_close_hotkey")]
    pub close_hotkey: String,
    /// When enabled the application initialises the logger at debug level.
    /// Defaults to `false` when the field is missing in the settings file.
    #[serde(default)]
    pub debug_logging: bool,
    /// Optional file that receives a copy of the log output.
    #[serde(default)]
    pub log_file: Option<String>,
    /// Speed preselected in the control window.
    #[serde(default = "default_speed")]
    pub default_speed: f64,
    #[serde(default = "default_overlay_size")]
    pub overlay_size: (f32, f32),
    #[serde(default = "default_control_size")]
    pub control_size: (f32, f32),
    /// Point size of the scrolling script.
    #[serde(default = "default_font_size")]
    pub font_size: f32,
}

fn default_play_pause_hotkey() -> String {
    DEFAULT_PLAY_PAUSE.into()
}

fn default_interaction_hotkey() -> String {
    DEFAULT_TOGGLE_INTERACTION.into()
}

fn default_close_hotkey() -> String {
    DEFAULT_CLOSE_OVERLAY.into()
}

fn default_speed() -> f64 {
    DEFAULT_SPEED
}

fn default_overlay_size() -> (f32, f32) {
    (800.0, 200.0)
}

fn default_control_size() -> (f32, f32) {
    (1000.0, 800.0)
}

fn default_font_size() -> f32 {
    28.0
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            play_pause_hotkey: default_play_pause_hotkey(),
            interaction_hotkey: default_interaction_hotkey(),
            close_hotkey: default_close_hotkey(),
            debug_logging: false,
            log_file: None,
            default_speed: default_speed(),
            overlay_size: default_overlay_size(),
            control_size: default_control_size(),
            font_size: default_font_size(),
        }
    }
}

/// `settings.json` in the platform config directory, or the working
/// directory when there is none.
pub fn default_path() -> PathBuf {
    dirs_next::config_dir()
        .map(|dir| dir.join("teleprompter").join("settings.json"))
        .unwrap_or_else(|| PathBuf::from("settings.json"))
}

impl Settings {
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).unwrap_or_default();
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn default_speed(&self) -> f64 {
        clamp_speed(self.default_speed)
    }

    pub fn hotkey_bindings(&self) -> HotkeyBindings {
        HotkeyBindings {
            play_pause: parse_or_default(&self.play_pause_hotkey, DEFAULT_PLAY_PAUSE, "play_pause_hotkey"),
            toggle_interaction: parse_or_default(
                &self.interaction_hotkey,
                DEFAULT_TOGGLE_INTERACTION,
                "interaction_hotkey",
            ),
            close_overlay: parse_or_default(&self.close_hotkey, DEFAULT_CLOSE_OVERLAY, "close_hotkey"),
        }
    }

    pub fn controller_config(&self) -> ControllerConfig {
        ControllerConfig {
            overlay_size: self.overlay_size,
            control_size: self.control_size,
            bindings: self.hotkey_bindings(),
        }
    }
}

fn parse_or_default(value: &str, default: &str, field: &str) -> Hotkey {
    if let Some(hotkey) = parse_hotkey(value) {
        return hotkey;
    }
    tracing::warn!(
        "provided {} string '{}' is invalid; using default {}",
        field,
        value,
        default
    );
    parse_hotkey(default).unwrap_or_else(|| HotkeyBindings::default().play_pause)
}
