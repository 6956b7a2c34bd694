//! Application state management for the TUI.
//!
//! This module manages the application state: the three reading slots,
//! the full-screen/help toggles and status messages.

use crate::aqi::{self, ColorBucket};
use crate::poller::Sample;
use crate::ui::input::InputAction;
use chrono::{DateTime, Local};
use ratatui::style::Color;
use tracing::info;

/// Color of a slot before its first reading
pub const PRIMARY_COLOR: Color = Color::Cyan;

/// One labelled concentration on screen
#[derive(Debug, Clone)]
pub struct DisplaySlot {
    pub label: &'static str,
    pub text: String,
    pub bucket: Option<ColorBucket>,
}

impl DisplaySlot {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            text: aqi::PLACEHOLDER.to_string(),
            bucket: None,
        }
    }

    /// Replace the shown value and its color
    pub fn update(&mut self, value: u16) {
        self.bucket = Some(aqi::classify(value));
        self.text = aqi::format_value(value);
    }

    pub fn color(&self) -> Color {
        self.bucket.map(ColorBucket::color).unwrap_or(PRIMARY_COLOR)
    }
}

/// Application state
pub struct App {
    /// Whether the application should quit
    pub should_quit: bool,
    /// Chrome-less layout with only the readings
    pub full_screen: bool,
    /// Show help panel
    pub show_help: bool,
    /// Serial device shown in the toolbar
    pub device: String,
    pub pm1_0: DisplaySlot,
    pub pm2_5: DisplaySlot,
    pub pm10: DisplaySlot,
    /// Time of the most recent reading
    pub last_update: Option<DateTime<Local>>,
    /// Status message
    pub status_message: Option<String>,
}

const WAITING_STATUS: &str = "Waiting for first reading";

impl App {
    /// Create a new application state
    pub fn new(device: String, full_screen: bool) -> Self {
        Self {
            should_quit: false,
            full_screen,
            show_help: false,
            device,
            pm1_0: DisplaySlot::new("PM 1.0"),
            pm2_5: DisplaySlot::new("PM 2.5"),
            pm10: DisplaySlot::new("PM 10.0"),
            last_update: None,
            status_message: Some(WAITING_STATUS.to_string()),
        }
    }

    /// Write the latest sample into the three slots
    pub fn apply_sample(&mut self, sample: &Sample) {
        self.pm1_0.update(sample.reading.pm1_0);
        self.pm2_5.update(sample.reading.pm2_5);
        self.pm10.update(sample.reading.pm10);
        self.last_update = Some(sample.taken_at);
        if self.status_message.as_deref() == Some(WAITING_STATUS) {
            self.status_message = None;
        }
    }

    pub fn handle_action(&mut self, action: InputAction) {
        match action {
            InputAction::Quit => self.should_quit = true,
            InputAction::ToggleFullScreen => self.toggle_full_screen(),
            InputAction::ToggleHelp => self.toggle_help(),
            InputAction::None => {}
        }
    }

    pub fn toggle_full_screen(&mut self) {
        self.full_screen = !self.full_screen;
        info!(full_screen = self.full_screen, "full screen toggled");
        let message = if self.full_screen {
            "Full screen"
        } else {
            "Windowed (Ctrl+F11 or f for full screen)"
        };
        self.set_status(message.to_string());
    }

    /// Toggle help panel
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Set status message
    pub fn set_status(&mut self, message: String) {
        self.status_message = Some(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensors::SensorReading;

    fn sample(pm1_0: u16, pm2_5: u16, pm10: u16) -> Sample {
        Sample {
            reading: SensorReading::new(pm1_0, pm2_5, pm10),
            taken_at: Local::now(),
        }
    }

    #[test]
    fn test_initial_state() {
        let app = App::new("/dev/ttyAMA0".to_string(), false);
        for slot in [&app.pm1_0, &app.pm2_5, &app.pm10] {
            assert_eq!(slot.text, "NaN µ/m³");
            assert_eq!(slot.color(), PRIMARY_COLOR);
        }
        assert!(app.last_update.is_none());
    }

    #[test]
    fn test_apply_sample_end_to_end() {
        let mut app = App::new("/dev/ttyAMA0".to_string(), false);
        let reading = sample(10, 75, 250);
        app.apply_sample(&reading);

        assert_eq!(app.pm1_0.text, "10 µ/m³");
        assert_eq!(app.pm1_0.color(), Color::Rgb(0, 228, 0));
        assert_eq!(app.pm2_5.text, "75 µ/m³");
        assert_eq!(app.pm2_5.color(), Color::Rgb(255, 255, 0));
        assert_eq!(app.pm10.text, "250 µ/m³");
        assert_eq!(app.pm10.color(), Color::Rgb(153, 0, 76));
        assert_eq!(app.last_update, Some(reading.taken_at));
        assert!(app.status_message.is_none());
    }

    #[test]
    fn test_each_sample_supersedes_previous() {
        let mut app = App::new("/dev/ttyAMA0".to_string(), false);
        app.apply_sample(&sample(400, 400, 400));
        app.apply_sample(&sample(0, 51, 301));
        assert_eq!(app.pm1_0.bucket, Some(ColorBucket::Good));
        assert_eq!(app.pm2_5.bucket, Some(ColorBucket::Moderate));
        assert_eq!(app.pm10.bucket, Some(ColorBucket::Hazardous));
        assert_eq!(app.pm10.text, "301 µ/m³");
    }

    #[test]
    fn test_sample_keeps_toggle_status() {
        let mut app = App::new("/dev/ttyAMA0".to_string(), false);
        app.apply_sample(&sample(10, 75, 250));
        app.toggle_full_screen();
        app.apply_sample(&sample(12, 80, 260));
        assert_eq!(app.status_message.as_deref(), Some("Full screen"));
    }

    #[test]
    fn test_actions() {
        let mut app = App::new("/dev/ttyAMA0".to_string(), true);
        app.handle_action(InputAction::ToggleFullScreen);
        assert!(!app.full_screen);
        assert!(app.status_message.as_deref().unwrap().starts_with("Windowed"));
        app.handle_action(InputAction::ToggleHelp);
        assert!(app.show_help);
        app.handle_action(InputAction::None);
        assert!(!app.should_quit);
        app.handle_action(InputAction::Quit);
        assert!(app.should_quit);
    }
}
