pub mod render;
pub mod views;

pub use render::{render_dashboard, write_dashboard};
pub use views::build_views;
