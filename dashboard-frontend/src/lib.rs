pub mod canvas;
pub mod console_log;
pub mod dashboard_app;

pub use canvas::CanvasSurface;
pub use dashboard_app::{DashboardFrontend, DashboardFrontendProps};
