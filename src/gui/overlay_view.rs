use crate::prompter::mode::InteractionMode;
use crate::prompter::overlay::OverlayRuntime;
use crate::prompter::scroll::{PlayState, MAX_SPEED, MIN_SPEED};
use eframe::egui;

/// Draws one overlay window and feeds frames to its runtime.
pub struct OverlayView {
    runtime: OverlayRuntime,
    font_size: f32,
    editor: String,
    editor_synced: bool,
    extents: (f64, f64),
    notice: Option<String>,
}

impl OverlayView {
    pub fn new(runtime: OverlayRuntime, font_size: f32) -> Self {
        Self {
            runtime,
            font_size,
            editor: String::new(),
            editor_synced: false,
            extents: (0.0, 0.0),
            notice: None,
        }
    }

    /// Warning shown in the header, e.g. shortcuts that could not be bound.
    pub fn set_notice(&mut self, notice: impl Into<String>) {
        self.notice = Some(notice.into());
    }

    pub fn runtime(&self) -> &OverlayRuntime {
        &self.runtime
    }

    pub fn show(&mut self, ctx: &egui::Context, now_ms: f64) {
        self.runtime.pump_messages(now_ms);

        let mode = self.runtime.mode();
        if !mode.is_interactive() || !self.editor_synced {
            self.editor.clear();
            self.editor.push_str(self.runtime.session().script());
            self.editor_synced = self.runtime.session().is_initialized();
        }

        let frame = egui::Frame::none()
            .fill(egui::Color32::from_black_alpha(150))
            .rounding(8.0)
            .inner_margin(12.0);
        egui::CentralPanel::default().frame(frame).show(ctx, |ui| {
            self.header(ui, now_ms, mode);
            let offset = self.runtime.session().offset() as f32;
            let output = egui::ScrollArea::vertical()
                .vertical_scroll_offset(offset)
                .enable_scrolling(false)
                .scroll_bar_visibility(egui::scroll_area::ScrollBarVisibility::AlwaysHidden)
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    if mode.shows_controls() {
                        let response = ui.add(
                            egui::TextEdit::multiline(&mut self.editor)
                                .font(egui::FontId::proportional(self.font_size))
                                .desired_width(f32::INFINITY)
                                .frame(false),
                        );
                        if response.changed() {
                            self.runtime.edit_script(self.editor.clone());
                        }
                    } else {
                        ui.label(
                            egui::RichText::new(self.runtime.session().script())
                                .size(self.font_size)
                                .color(egui::Color32::WHITE),
                        );
                    }
                });
            self.extents = (
                output.content_size.y as f64,
                output.inner_rect.height() as f64,
            );
        });

        // Advance against this frame's layout, never a stale one.
        let (content, viewport) = self.extents;
        self.runtime.frame(now_ms, content, viewport);

        self.runtime.on_painted();
        if self.runtime.wants_frames() {
            ctx.request_repaint();
        }
    }

    fn header(&mut self, ui: &mut egui::Ui, now_ms: f64, mode: InteractionMode) {
        ui.horizontal(|ui| {
            if mode.shows_controls() {
                let label = match self.runtime.session().play_state() {
                    PlayState::Playing => "⏸ Pause",
                    PlayState::Stopped => "▶ Play",
                };
                if ui.button(label).clicked() {
                    self.runtime.toggle_play_pause(now_ms);
                }
                if ui.button("⏮").on_hover_text("Back to top").clicked() {
                    self.runtime.restart();
                }
                let mut speed = self.runtime.session().speed();
                let slider = egui::Slider::new(&mut speed, MIN_SPEED..=MAX_SPEED)
                    .step_by(0.1)
                    .show_value(false);
                if ui.add(slider).changed() {
                    self.runtime.set_speed(speed);
                }
                ui.label(format!("{:.1}", self.runtime.session().speed()));
                if ui.button("✕").on_hover_text("Close teleprompter").clicked() {
                    self.runtime.request_close();
                }
            }
            let notice = self.notice.as_deref();
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let color = if mode.is_interactive() {
                    egui::Color32::LIGHT_GREEN
                } else {
                    egui::Color32::GRAY
                };
                ui.colored_label(color, mode.label());
                if let Some(notice) = notice {
                    ui.colored_label(egui::Color32::YELLOW, "⚠").on_hover_text(notice);
                }
            });
        });
    }
}
