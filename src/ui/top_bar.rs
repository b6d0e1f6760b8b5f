//! Top bar UI: app title, status, and the locate control.

use crate::state::{AppState, TrackingStatus};
use eframe::egui::{self, Color32, RichText};

pub fn render_top_bar(ctx: &egui::Context, state: &mut AppState) {
    egui::TopBottomPanel::top("top_bar")
        .exact_height(36.0)
        .show(ctx, |ui| {
            ui.horizontal_centered(|ui| {
                // App title
                ui.label(
                    RichText::new("Hazard Shelter Map")
                        .strong()
                        .size(16.0)
                        .color(Color32::WHITE),
                );

                ui.separator();

                // Status text
                ui.label(
                    RichText::new(&state.status_message)
                        .size(13.0)
                        .color(Color32::GRAY),
                );

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    render_locate_toggle(ui, state);
                });
            });
        });
}

fn render_locate_toggle(ui: &mut egui::Ui, state: &mut AppState) {
    let status = state.tracking.status.clone();
    let watching = status.is_watching();

    let color = match &status {
        TrackingStatus::Active => Color32::from_rgb(100, 200, 100),
        TrackingStatus::Waiting => Color32::from_rgb(220, 200, 80),
        TrackingStatus::Failed(_) => Color32::from_rgb(220, 100, 100),
        TrackingStatus::Manual => Color32::from_rgb(120, 170, 230),
        TrackingStatus::Off => Color32::GRAY,
    };

    let response = ui
        .selectable_label(watching, RichText::new("\u{2316} Locate").size(13.0))
        .on_hover_text(match &status {
            TrackingStatus::Failed(message) => message.as_str(),
            _ if watching => "Stop tracking your location",
            _ => "Track your location and route to the nearest shelter",
        });
    if response.clicked() {
        state.tracking.toggle_requested = true;
    }

    ui.label(RichText::new(status.label()).size(12.0).color(color));
}
