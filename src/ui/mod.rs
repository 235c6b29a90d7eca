//! # User Interface Module
//!
//! Dear ImGui panels for the neighbourhood demo. The host owns the ImGui
//! context and platform glue; these functions only lay out widgets for one
//! frame.
//!
//! ## Panels
//!
//! - [`inspector_panel`] - Chosen building, group positions, material and lights
//! - [`ammo_panel`] - Rounds left in the chosen weapon
//!
//! ## Usage
//!
//! ```no_run
//! # fn frame(ui: &imgui::Ui, app: &mut neighbourhood::app::NeighbourhoodApp) {
//! let (inspector, lights, guns) = app.ui_state();
//! neighbourhood::ui::inspector_panel(ui, inspector, lights);
//! neighbourhood::ui::ammo_panel(ui, guns);
//! # }
//! ```

pub mod panel;

// Re-export main types
pub use panel::{ammo_panel, inspector_panel};
