//! Shelter info popup anchored to a map position.

use crate::hazard::HazardCategory;
use crate::shelter::{Shelter, ShelterSet};
use crate::state::AppState;
use eframe::egui::{self, RichText, Vec2};

pub fn render_shelter_popup(ctx: &egui::Context, state: &mut AppState, shelters: &ShelterSet) {
    let Some(popup) = state.popup.clone() else {
        return;
    };
    let Some(shelter) = shelters.get(&popup.shelter_id) else {
        state.popup = None;
        return;
    };
    if !state.projection.is_visible(popup.anchor, 0.0) {
        return;
    }

    let pos = state.projection.geo_to_screen(popup.anchor) + Vec2::new(8.0, -8.0);
    let mut close = false;

    egui::Area::new(egui::Id::new("shelter_popup"))
        .order(egui::Order::Foreground)
        .fixed_pos(pos)
        .pivot(egui::Align2::LEFT_BOTTOM)
        .show(ctx, |ui| {
            egui::Frame::popup(ui.style()).show(ui, |ui| {
                ui.set_max_width(260.0);
                ui.horizontal(|ui| {
                    ui.label(RichText::new(shelter.display_name()).strong());
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Min), |ui| {
                        if ui.small_button("\u{2715}").clicked() {
                            close = true;
                        }
                    });
                });
                render_shelter_details(ui, shelter);
            });
        });

    if close {
        state.popup = None;
    }
}

fn render_shelter_details(ui: &mut egui::Ui, shelter: &Shelter) {
    if !shelter.address.is_empty() {
        ui.label(RichText::new(&shelter.address).small());
    }

    ui.add_space(4.0);
    ui.label(RichText::new("Designated for").small().weak());
    ui.horizontal_wrapped(|ui| {
        for category in HazardCategory::ALL {
            let text = RichText::new(category.label()).small();
            if shelter.hazards.contains(category) {
                ui.label(text.strong());
            } else {
                ui.label(text.weak().strikethrough());
            }
        }
    });

    if let Some(remarks) = &shelter.remarks {
        ui.add_space(4.0);
        ui.label(RichText::new(remarks).small().italics());
    }
}
