pub mod app;
pub mod camera_controls;
pub mod chat_panel;
pub mod controls_panel;
pub mod grid_view;
pub mod legend;
pub mod legend_panel;
pub mod settings_modal;
pub mod sidebar_panel;
pub mod stats_panel;

pub use app::{App, AppProps};
