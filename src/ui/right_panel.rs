//! Right panel UI: shelter category selection and the nearest shelter.

use crate::hazard::HazardCategory;
use crate::shelter::ShelterSet;
use crate::state::AppState;
use crate::tracker::format_distance;
use eframe::egui::{self, Color32, RichText, ScrollArea};

pub fn render_right_panel(
    ctx: &egui::Context,
    state: &mut AppState,
    shelters: Option<&ShelterSet>,
    loading: bool,
) {
    egui::SidePanel::right("right_panel")
        .resizable(true)
        .default_width(220.0)
        .min_width(180.0)
        .max_width(350.0)
        .show(ctx, |ui| {
            ScrollArea::vertical().show(ui, |ui| {
                ui.heading("Shelters");
                ui.separator();

                render_category_section(ui, state, shelters, loading);
                ui.add_space(5.0);

                render_nearest_section(ui, state, shelters);
                ui.add_space(5.0);

                render_settings_section(ui, state);
            });
        });
}

fn render_category_section(
    ui: &mut egui::Ui,
    state: &mut AppState,
    shelters: Option<&ShelterSet>,
    loading: bool,
) {
    egui::CollapsingHeader::new(RichText::new("Shelter Type").strong())
        .default_open(true)
        .show(ui, |ui| {
            let mut selected = state.layer_state.shelter_category;

            ui.radio_value(&mut selected, None, "None");
            for category in HazardCategory::ALL {
                ui.radio_value(&mut selected, Some(category), category.label());
            }

            if selected != state.layer_state.shelter_category {
                state.layer_state.show_shelter_category(selected);
            }

            ui.add_space(5.0);
            if loading {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label("Loading shelters...");
                });
            } else if shelters.is_some_and(|set| set.is_empty()) {
                ui.label(
                    RichText::new(format!("No shelters in {}", state.settings.shelter_data))
                        .small()
                        .color(Color32::GRAY),
                );
            } else if let Some(set) = shelters {
                let filter = state.layer_state.shelter_filter();
                let count = set.matching(filter).count();
                ui.label(
                    RichText::new(format!("{} of {} shelters", count, set.len()))
                        .small()
                        .color(Color32::GRAY),
                );
            }
        });
}

fn render_nearest_section(ui: &mut egui::Ui, state: &mut AppState, shelters: Option<&ShelterSet>) {
    egui::CollapsingHeader::new(RichText::new("Nearest Shelter").strong())
        .default_open(true)
        .show(ui, |ui| {
            let line = state.route_layer.overlay().line().cloned();
            match line {
                Some(line) => {
                    let shelter = shelters.and_then(|set| set.get(&line.shelter_id));
                    let name = shelter.map_or(line.shelter_id.0.as_str(), |s| s.display_name());
                    ui.label(RichText::new(name).strong());
                    if let Some(shelter) = shelter.filter(|s| !s.address.is_empty()) {
                        ui.label(RichText::new(&shelter.address).small());
                    }
                    ui.label(
                        RichText::new(format_distance(line.distance_m))
                            .monospace()
                            .color(crate::geo::ROUTE_COLOR),
                    );
                    if ui.small_button("Show on map").clicked() {
                        state.projection.fly_to(line.to, state.projection.zoom.max(14.0));
                    }
                }
                None => {
                    let hint = if !state.tracking.status.has_source() {
                        "Turn on Locate to find the nearest shelter."
                    } else if state.layer_state.shelter_category.is_none() {
                        "Choose a shelter type."
                    } else if state.projection.zoom < state.settings.min_route_zoom {
                        "Zoom in to show the route."
                    } else {
                        "No shelter nearby."
                    };
                    ui.label(RichText::new(hint).small().color(Color32::GRAY));
                }
            }

            if let Some(time) = state.tracking.last_fix_time() {
                ui.add_space(5.0);
                ui.label(
                    RichText::new(format!("Last fix: {}", time))
                        .small()
                        .color(Color32::GRAY),
                );
            }
        });
}

fn render_settings_section(ui: &mut egui::Ui, state: &mut AppState) {
    egui::CollapsingHeader::new(RichText::new("Settings").strong())
        .default_open(false)
        .show(ui, |ui| {
            let route_zoom = ui.add(
                egui::Slider::new(&mut state.settings.min_route_zoom, 5.0..=18.0)
                    .step_by(0.5)
                    .text("Route zoom"),
            );
            let locate_zoom = ui.add(
                egui::Slider::new(&mut state.settings.locate_zoom, 5.0..=18.0)
                    .step_by(1.0)
                    .text("Locate zoom"),
            );
            if route_zoom.changed() || locate_zoom.changed() {
                state.settings_changed = true;
            }
        });
}
