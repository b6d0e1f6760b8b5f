#![warn(clippy::all)]

//! Hazard Shelter Map - a web-based hazard map viewer.
//!
//! Shows hazard rasters and designated emergency shelters over a base map,
//! tracks the user's location, and draws a line to the nearest shelter
//! suitable for the selected hazard.

mod geo;
mod geolocation;
mod hazard;
mod shelter;
mod state;
mod tracker;
mod ui;

use eframe::egui;
use shelter::{LoadedShelters, ShelterLoadChannel, ShelterLoadResult, ShelterSet};
use state::{AppSettings, AppState, TrackingController};

// Native entry point
#[cfg(not(target_arch = "wasm32"))]
fn main() -> eframe::Result<()> {
    env_logger::init();

    let native_options = eframe::NativeOptions::default();

    eframe::run_native(
        "Hazard Shelter Map",
        native_options,
        Box::new(|cc| Ok(Box::new(ShelterMapApp::new(cc)))),
    )
}

// WASM entry point - main is not called on wasm32
#[cfg(target_arch = "wasm32")]
fn main() {}

/// Entry point for the WASM application.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub async fn start() {
    use eframe::wasm_bindgen::JsCast as _;

    // Redirect `log` messages to `console.log`:
    eframe::WebLogger::init(log::LevelFilter::Debug).ok();

    let web_options = eframe::WebOptions::default();

    wasm_bindgen_futures::spawn_local(async {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            log::error!("No document");
            return;
        };

        let Some(canvas) = document
            .get_element_by_id("app_canvas")
            .and_then(|e| e.dyn_into::<web_sys::HtmlCanvasElement>().ok())
        else {
            log::error!("Failed to find canvas element app_canvas");
            return;
        };

        let start_result = eframe::WebRunner::new()
            .start(
                canvas,
                web_options,
                Box::new(|cc| Ok(Box::new(ShelterMapApp::new(cc)))),
            )
            .await;

        // Remove the loading text once the app has loaded:
        if let Some(loading_text) = document.get_element_by_id("loading_text") {
            match start_result {
                Ok(_) => {
                    loading_text.remove();
                }
                Err(e) => {
                    loading_text.set_inner_html(
                        "<p>The app has crashed. See the developer console for details.</p>",
                    );
                    log::error!("Failed to start eframe: {e:?}");
                }
            }
        }
    });
}

/// Main application state and logic.
pub struct ShelterMapApp {
    /// Application state containing all sub-states
    state: AppState,

    /// Loaded shelter data, once available
    shelters: Option<ShelterSet>,

    /// Channel for the async shelter data load
    shelter_channel: ShelterLoadChannel,

    /// Device position watch and nearest-shelter route computation
    tracking: TrackingController,

    /// Settings were edited and have not been saved yet
    settings_dirty: bool,

    /// Last route update failure, so a persisting error is reported once
    route_error: Option<String>,

    /// Monotonic instant of last URL push (for throttling to ~1/sec).
    last_url_push: web_time::Instant,
}

impl ShelterMapApp {
    /// Creates a new ShelterMapApp instance.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        egui_extras::install_image_loaders(&cc.egui_ctx);

        let settings = AppSettings::load();
        let tracking = TrackingController::new(settings.min_route_zoom);
        let data_location = settings.shelter_data.clone();

        let mut state = AppState::new(settings);

        // Apply URL parameters (view and layers)
        let url_params = state::url_state::parse_from_url();
        state.apply_url_params(&url_params);

        let mut shelter_channel = ShelterLoadChannel::new();
        shelter_channel.load(cc.egui_ctx.clone(), data_location);
        state.status_message = "Loading shelters...".to_string();

        Self {
            state,
            shelters: None,
            shelter_channel,
            tracking,
            settings_dirty: false,
            route_error: None,
            last_url_push: web_time::Instant::now(),
        }
    }

    fn handle_shelter_load(&mut self) {
        let Some(result) = self.shelter_channel.try_recv() else {
            return;
        };
        match result {
            ShelterLoadResult::Success { shelters, skipped } => {
                log::info!(
                    "Loaded {} shelter(s), skipped {} malformed feature(s)",
                    shelters.len(),
                    skipped
                );
                self.state.status_message = format!("{} shelters", shelters.len());
                self.shelters = Some(shelters);
            }
            ShelterLoadResult::Error(e) => {
                log::error!("Shelter load failed: {}", e);
                self.state.status_message = "Shelter data unavailable".to_string();
            }
        }
    }

    fn update_route(&mut self) {
        let filter = self.state.layer_state.shelter_filter();
        let candidates = LoadedShelters::for_view(self.shelters.as_ref(), &self.state.projection);

        let result = self.tracking.tracker_mut().on_render_tick(
            self.state.projection.zoom,
            &filter,
            &candidates,
            &mut self.state.route_layer,
        );

        match result {
            Ok(_) => self.route_error = None,
            Err(e) => {
                let message = e.to_string();
                if self.route_error.as_ref() != Some(&message) {
                    log::error!("Route update failed: {}", message);
                    self.state.status_message = format!("Route unavailable: {}", message);
                    self.route_error = Some(message);
                }
            }
        }
    }
}

impl eframe::App for ShelterMapApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_shelter_load();
        self.tracking.update(ctx, &mut self.state);

        if std::mem::take(&mut self.state.settings_changed) {
            self.tracking
                .tracker_mut()
                .set_min_route_zoom(self.state.settings.min_route_zoom);
            self.settings_dirty = true;
        }

        // Push current state to URL and save settings (throttled to once per second)
        {
            let now = web_time::Instant::now();
            if now.duration_since(self.last_url_push).as_secs_f64() >= 1.0 {
                self.last_url_push = now;
                state::url_state::push_to_url(&self.state.url_view());

                if std::mem::take(&mut self.settings_dirty) {
                    self.state.settings.save();
                }
            }
        }

        // Render UI panels in the correct order for egui layout
        // Side and top/bottom panels must be rendered before CentralPanel
        ui::render_top_bar(ctx, &mut self.state);
        ui::render_left_panel(ctx, &mut self.state);
        ui::render_right_panel(
            ctx,
            &mut self.state,
            self.shelters.as_ref(),
            self.shelter_channel.is_loading(),
        );

        // The route is scoped to the viewport, which is whatever the panels left
        self.state.projection.set_screen_rect(ctx.available_rect());
        self.update_route();

        ui::render_canvas(
            ctx,
            &mut self.state,
            self.shelters.as_ref(),
            self.tracking.tracker().position(),
        );

        // Keep polling while waiting on the next location fix
        if self.tracking.is_watching() || self.settings_dirty {
            ctx.request_repaint_after(std::time::Duration::from_millis(500));
        }
    }
}
