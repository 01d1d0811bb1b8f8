pub mod gui;
pub mod hotkey;
pub mod logging;
pub mod settings;
pub mod system_hotkey;
pub mod prompter;
