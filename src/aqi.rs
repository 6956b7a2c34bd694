//! Air-quality color scale.
//!
//! Maps a particulate concentration to one of six severity bands and formats
//! values for display.

use ratatui::style::Color;
use serde::Serialize;

/// Unit suffix appended to every displayed concentration
pub const UNIT_SUFFIX: &str = " µ/m³";

/// Text shown in a slot before the first reading arrives
pub const PLACEHOLDER: &str = "NaN µ/m³";

/// Severity band of a particulate concentration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorBucket {
    /// 0..=50
    Good,
    /// 51..=100
    Moderate,
    /// 101..=150
    UnhealthyForSensitive,
    /// 151..=200
    Unhealthy,
    /// 201..=300
    VeryUnhealthy,
    /// 301 and above
    Hazardous,
}

impl ColorBucket {
    pub const ALL: [ColorBucket; 6] = [
        ColorBucket::Good,
        ColorBucket::Moderate,
        ColorBucket::UnhealthyForSensitive,
        ColorBucket::Unhealthy,
        ColorBucket::VeryUnhealthy,
        ColorBucket::Hazardous,
    ];

    /// Fixed RGB triple of the band
    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            ColorBucket::Good => (0, 228, 0),
            ColorBucket::Moderate => (255, 255, 0),
            ColorBucket::UnhealthyForSensitive => (255, 126, 0),
            ColorBucket::Unhealthy => (255, 0, 0),
            ColorBucket::VeryUnhealthy => (153, 0, 76),
            ColorBucket::Hazardous => (126, 0, 35),
        }
    }

    pub fn color(self) -> Color {
        let (r, g, b) = self.rgb();
        Color::Rgb(r, g, b)
    }

    /// Human readable caption
    pub fn label(self) -> &'static str {
        match self {
            ColorBucket::Good => "Good",
            ColorBucket::Moderate => "Moderate",
            ColorBucket::UnhealthyForSensitive => "Unhealthy for sensitive groups",
            ColorBucket::Unhealthy => "Unhealthy",
            ColorBucket::VeryUnhealthy => "Very unhealthy",
            ColorBucket::Hazardous => "Hazardous",
        }
    }
}

/// Classify a concentration. First matching band wins; 301+ is the catch-all.
pub fn classify(value: u16) -> ColorBucket {
    match value {
        0..=50 => ColorBucket::Good,
        51..=100 => ColorBucket::Moderate,
        101..=150 => ColorBucket::UnhealthyForSensitive,
        151..=200 => ColorBucket::Unhealthy,
        201..=300 => ColorBucket::VeryUnhealthy,
        _ => ColorBucket::Hazardous,
    }
}

/// Format a concentration as `"<value> µ/m³"`
pub fn format_value(value: u16) -> String {
    format!("{}{}", value, UNIT_SUFFIX)
}
