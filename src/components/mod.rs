pub mod app;
pub mod camera_controls;
pub mod dropdown;
pub mod layer_panel;
pub mod legend;
pub mod map_view;

pub use app::App;
