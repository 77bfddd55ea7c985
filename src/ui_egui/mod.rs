mod app;
mod day_timeline;
mod detail_window;
pub mod gesture;
mod toast;

pub use app::TimelineApp;
