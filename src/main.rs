use eframe::egui;
use std::path::PathBuf;
use teleprompter::gui::{TeleprompterApp, OFFSCREEN_POS};
use teleprompter::logging;
use teleprompter::settings::{self, Settings};

fn main() -> anyhow::Result<()> {
    let settings_path = std::env::var_os("TELEPROMPTER_SETTINGS")
        .map(PathBuf::from)
        .unwrap_or_else(settings::default_path);
    let settings = Settings::load(&settings_path)?;
    logging::init(settings.debug_logging, settings.log_file.clone().map(PathBuf::from));
    tracing::info!(path = %settings_path.display(), "settings loaded");

    let (width, height) = settings.control_size;
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Teleprompter")
            .with_inner_size([width, height])
            .with_min_inner_size([480.0, 360.0])
            // Parked off-screen until the first frame has painted.
            .with_position([OFFSCREEN_POS.0, OFFSCREEN_POS.1])
            .with_decorations(false)
            .with_transparent(true),
        ..Default::default()
    };

    eframe::run_native(
        "Teleprompter",
        native_options,
        Box::new(move |cc| Box::new(TeleprompterApp::new(&cc.egui_ctx, &settings))),
    )
    .map_err(|err| anyhow::anyhow!("teleprompter window failed: {err}"))
}
