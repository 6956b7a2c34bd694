//! UI widgets for displaying particulate readings.

pub mod help;
pub mod reading;
pub mod status_bar;
pub mod toolbar;

pub use help::render_help;
pub use reading::render_reading;
pub use status_bar::render_status_bar;
pub use toolbar::render_toolbar;
