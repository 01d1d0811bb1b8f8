pub mod channel;
pub mod control;
pub mod controller;
pub mod host;
pub mod messages;
pub mod mode;
pub mod overlay;
pub mod scroll;
pub mod session;
pub mod state;

pub use control::ControlSurface;
pub use controller::{
    ControllerConfig, ControllerEvent, OverlayEndpoint, OverlaySessionController, StartError,
};
pub use host::{WindowBounds, WindowFlags, WindowHandle, WindowHost, WindowRole};
pub use messages::TeleprompterData;
pub use mode::InteractionMode;
pub use overlay::OverlayRuntime;
pub use scroll::{PlayState, ScrollEngine};
pub use session::TeleprompterSession;
