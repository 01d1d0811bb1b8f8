use crate::hotkey::HotkeyBindings;
use crate::prompter::control::ControlSurface;
use crate::prompter::scroll::{MAX_SPEED, MIN_SPEED};
use eframe::egui;

pub fn show(ctx: &egui::Context, control: &mut ControlSurface, bindings: &HotkeyBindings) {
    let frame = egui::Frame::none()
        .fill(egui::Color32::from_rgb(24, 24, 28))
        .rounding(10.0)
        .inner_margin(16.0);
    egui::CentralPanel::default().frame(frame).show(ctx, |ui| {
        title_bar(ui, ctx, control);
        ui.separator();

        ui.label("Script");
        egui::ScrollArea::vertical()
            .max_height(ui.available_height() - 140.0)
            .show(ui, |ui| {
                ui.add(
                    egui::TextEdit::multiline(control.script_mut())
                        .hint_text("Paste or type your script here…")
                        .desired_width(f32::INFINITY)
                        .desired_rows(20),
                );
            });

        ui.add_space(8.0);
        ui.horizontal(|ui| {
            ui.label("Speed");
            let mut speed = control.draft().speed;
            let slider = egui::Slider::new(&mut speed, MIN_SPEED..=MAX_SPEED)
                .step_by(0.1)
                .show_value(false);
            if ui.add(slider).changed() {
                control.set_speed(speed);
            }
            ui.label(control.speed_label());
        });

        ui.add_space(8.0);
        if ui
            .add_sized([160.0, 32.0], egui::Button::new("▶ Start Teleprompter"))
            .clicked()
        {
            if let Err(err) = control.start() {
                tracing::error!(%err, "start request not delivered");
                control.set_error(err.to_string());
            }
        }
        if let Some(err) = control.last_error() {
            ui.colored_label(egui::Color32::RED, err);
        }

        ui.add_space(8.0);
        ui.weak(format!(
            "{} play/pause · {} interact · {} exit",
            bindings.play_pause, bindings.toggle_interaction, bindings.close_overlay
        ));
    });
}

fn title_bar(ui: &mut egui::Ui, ctx: &egui::Context, control: &mut ControlSurface) {
    ui.horizontal(|ui| {
        let title = ui.heading("Teleprompter");
        let drag = ui.interact(title.rect, title.id.with("drag"), egui::Sense::drag());
        if drag.drag_started() {
            ctx.send_viewport_cmd(egui::ViewportCommand::StartDrag);
        }
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.button("✕").clicked() {
                if let Err(err) = control.close() {
                    tracing::warn!(%err, "close request not delivered");
                }
            }
            if ui.button("—").clicked() {
                if let Err(err) = control.minimize() {
                    tracing::warn!(%err, "minimize request not delivered");
                }
            }
        });
    });
}
