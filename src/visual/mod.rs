// Visualization parameters
// Turns analysis results into the size and color of the on-screen shape

pub mod mapper;
pub mod state;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use mapper::{default_params, map_color, map_params, map_size};
pub use state::VisualState;

/// An RGB color, serialized as a `[r, g, b]` array
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[u8; 3]", into = "[u8; 3]")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl From<[u8; 3]> for Rgb {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self { r, g, b }
    }
}

impl From<Rgb> for [u8; 3] {
    fn from(color: Rgb) -> Self {
        [color.r, color.g, color.b]
    }
}

impl From<Rgb> for ratatui::style::Color {
    fn from(color: Rgb) -> Self {
        ratatui::style::Color::Rgb(color.r, color.g, color.b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

/// Everything the renderer needs to draw the shape
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VisualParams {
    /// Diameter in surface pixels
    pub size: f64,
    pub color: Rgb,
}

impl Default for VisualParams {
    fn default() -> Self {
        default_params()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_serialize_color_as_array() {
        let params = VisualParams {
            size: 175.0,
            color: Rgb::new(0, 255, 127),
        };
        let json = serde_json::to_value(params).unwrap();
        assert_eq!(json, serde_json::json!({"size": 175.0, "color": [0, 255, 127]}));
    }

    #[test]
    fn color_channels_out_of_range_are_rejected() {
        let parsed = serde_json::from_str::<VisualParams>(r#"{"size": 10, "color": [0, 256, 0]}"#);
        assert!(parsed.is_err());
    }
}
