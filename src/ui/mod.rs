//! UI modules for the hazard shelter map.
//!
//! The UI is split into distinct panels:
//! - Top bar: Title, status, and the locate control
//! - Left panel: Hazard raster selection
//! - Central canvas: The map
//! - Right panel: Shelter type selection and the nearest shelter

mod canvas;
mod left_panel;
mod popup;
mod right_panel;
mod top_bar;

pub use canvas::render_canvas;
pub use left_panel::render_left_panel;
pub use right_panel::render_right_panel;
pub use top_bar::render_top_bar;
