//! Central canvas UI: the map.

use crate::geo::{self, shelter_marker_radius, MapProjection, TileSource};
use crate::hazard::HAZARD_ATTRIBUTION;
use crate::shelter::{ShelterSet, SHELTER_ATTRIBUTION};
use crate::state::{AppState, ShelterPopup};
use eframe::egui::{self, Align2, Color32, FontId, Painter, Pos2, Rect, Sense, Vec2};
use geo_types::Point;

/// Extra pick radius around shelter markers, in pixels.
const HIT_SLOP: f32 = 4.0;

/// Render the map canvas.
pub fn render_canvas(
    ctx: &egui::Context,
    state: &mut AppState,
    shelters: Option<&ShelterSet>,
    user_position: Option<Point<f64>>,
) {
    egui::CentralPanel::default()
        .frame(egui::Frame::NONE)
        .show(ctx, |ui| {
            let available_size = ui.available_size();

            // Allocate the full available space for the canvas
            let (response, painter) =
                ui.allocate_painter(available_size, Sense::click_and_drag());

            let rect = response.rect;
            state.projection.set_screen_rect(rect);

            // Draw background
            painter.rect_filled(rect, 0.0, Color32::from_rgb(170, 211, 223));

            let basemap = TileSource::new(state.settings.basemap_url.clone());
            geo::render_tile_layer(ui, &basemap, &state.projection, 1.0);

            if let Some(layer) = state.layer_state.hazard_raster {
                geo::render_tile_layer(
                    ui,
                    &layer.tile_source(),
                    &state.projection,
                    state.layer_state.opacity(layer),
                );
            }

            let filter = state.layer_state.shelter_filter();
            if let Some(set) = shelters {
                let visible = state.projection.visible_bounds();
                geo::render_shelters(
                    &painter,
                    set.query(&filter, Some(&visible)),
                    &state.projection,
                );
            }

            geo::render_route(&painter, state.route_layer.overlay(), &state.projection);

            if let Some(position) = user_position {
                let accuracy = state.tracking.last_fix.as_ref().and_then(|f| f.accuracy_m);
                geo::render_user_marker(&painter, position, accuracy, &state.projection);
            }

            draw_attribution(&painter, &rect, state);

            handle_canvas_interaction(&response, state, shelters);
        });

    if let Some(set) = shelters {
        super::popup::render_shelter_popup(ctx, state, set);
    }
}

fn draw_attribution(painter: &Painter, rect: &Rect, state: &AppState) {
    let mut text = state.settings.basemap_attribution.clone();
    if state.layer_state.hazard_raster.is_some() {
        text.push_str(" | ");
        text.push_str(HAZARD_ATTRIBUTION);
    }
    if state.layer_state.shelter_category.is_some() {
        text.push_str(" | ");
        text.push_str(SHELTER_ATTRIBUTION);
    }

    let anchor = rect.right_bottom() - Vec2::new(4.0, 2.0);
    let galley = painter.layout_no_wrap(text, FontId::proportional(10.0), Color32::from_gray(40));
    let background = Align2::RIGHT_BOTTOM
        .anchor_size(anchor, galley.size())
        .expand(2.0);
    painter.rect_filled(background, 2.0, Color32::from_white_alpha(180));
    painter.galley(background.shrink(2.0).min, galley, Color32::from_gray(40));
}

fn handle_canvas_interaction(
    response: &egui::Response,
    state: &mut AppState,
    shelters: Option<&ShelterSet>,
) {
    let filter = state.layer_state.shelter_filter();
    let pick_radius = shelter_marker_radius(state.projection.zoom) + HIT_SLOP;
    let hit = |projection: &MapProjection, pos: Pos2| {
        shelters.and_then(|set| set.hit_test(pos, pick_radius, &filter, projection))
    };

    // Handle dragging for panning
    if response.dragged() {
        state.projection.pan_by(response.drag_delta());
    }

    // Handle scroll for zooming about the cursor position
    if response.hovered() {
        let scroll_delta = response.ctx.input(|i| i.raw_scroll_delta);
        if scroll_delta.y != 0.0 {
            if let Some(cursor_pos) = response.hover_pos() {
                let zoom = state.projection.zoom + scroll_delta.y as f64 * 0.005;
                state.projection.zoom_about(zoom, cursor_pos);
            }
        }

        if let Some(pos) = response.hover_pos() {
            if hit(&state.projection, pos).is_some() {
                response.ctx.set_cursor_icon(egui::CursorIcon::PointingHand);
            }
        }
    }

    // Zoom in one level on double-click
    if response.double_clicked() {
        if let Some(pos) = response.interact_pointer_pos() {
            state.projection.zoom_about(state.projection.zoom + 1.0, pos);
        }
    } else if response.clicked() {
        let picked = response
            .interact_pointer_pos()
            .and_then(|pos| hit(&state.projection, pos))
            .map(|shelter| ShelterPopup {
                shelter_id: shelter.id.clone(),
                anchor: shelter.location.0,
            });
        state.popup = picked;
    }

    if response.secondary_clicked() {
        state.context_anchor = response
            .interact_pointer_pos()
            .map(|pos| state.projection.screen_to_geo(pos));
    }

    response.context_menu(|ui| {
        let Some(anchor) = state.context_anchor else {
            ui.close();
            return;
        };
        ui.label(
            egui::RichText::new(format!("{:.5}, {:.5}", anchor.y, anchor.x))
                .monospace()
                .small(),
        );
        if ui.button("Use as my location").clicked() {
            state.tracking.manual_position_requested = Some(Point::from(anchor));
            ui.close();
        }
    });
}
