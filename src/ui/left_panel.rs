//! Left panel UI: hazard raster selection and opacity.

use crate::hazard::{HazardRasterLayer, HAZARD_ATTRIBUTION};
use crate::state::AppState;
use eframe::egui::{self, RichText, Sense, Vec2};

pub fn render_left_panel(ctx: &egui::Context, state: &mut AppState) {
    egui::SidePanel::left("left_panel")
        .resizable(true)
        .default_width(250.0)
        .min_width(200.0)
        .max_width(400.0)
        .show(ctx, |ui| {
            ui.heading("Hazard Map");
            ui.separator();

            let mut selected = state.layer_state.hazard_raster;

            ui.radio_value(&mut selected, None, "None");
            for layer in HazardRasterLayer::ALL {
                ui.horizontal(|ui| {
                    let (swatch, _) = ui.allocate_exact_size(Vec2::splat(10.0), Sense::hover());
                    ui.painter().rect_filled(swatch, 2.0, layer.legend_color());
                    ui.radio_value(&mut selected, Some(layer), layer.label());
                });
            }

            if selected != state.layer_state.hazard_raster {
                state.layer_state.show_hazard_raster(selected);
            }

            if let Some(layer) = selected {
                ui.add_space(10.0);
                ui.label(RichText::new("Opacity").small());
                let mut opacity = state.layer_state.opacity(layer);
                if ui.add(egui::Slider::new(&mut opacity, 0.0..=1.0)).changed() {
                    state.layer_state.set_opacity(layer, opacity);
                }

                ui.add_space(10.0);
                ui.label(
                    RichText::new(format!("Source: {}", HAZARD_ATTRIBUTION))
                        .small()
                        .weak(),
                );
            }
        });
}
