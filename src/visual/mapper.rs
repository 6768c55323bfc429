// Visualization parameter mapper
// Size is a straight linear map of tempo, color a fixed lookup on the mood label

use super::{Rgb, VisualParams};
use crate::analysis::{AnalysisResult, Mood};

/// Tempo range (BPM) mapped onto the size range
pub const TEMPO_RANGE: (f64, f64) = (60.0, 180.0);

/// Diameter range (pixels) that [`TEMPO_RANGE`] maps onto
pub const SIZE_RANGE: (f64, f64) = (50.0, 300.0);

/// Diameter shown before any song has been analyzed
pub const DEFAULT_SIZE: f64 = 100.0;

/// Maps a tempo to a diameter.
///
/// Tempos outside [`TEMPO_RANGE`] extrapolate along the same line; nothing is
/// clamped, so very slow songs can produce a zero or negative size.
pub fn map_size(tempo: f64) -> f64 {
    let (in_min, in_max) = TEMPO_RANGE;
    let (out_min, out_max) = SIZE_RANGE;
    out_min + (tempo - in_min) * (out_max - out_min) / (in_max - in_min)
}

/// Maps a mood label to a fill color. Unknown or absent moods are black.
pub fn map_color(mood: Option<&str>) -> Rgb {
    mood.and_then(Mood::from_label)
        .map(mood_color)
        .unwrap_or(Rgb::BLACK)
}

pub fn mood_color(mood: Mood) -> Rgb {
    match mood {
        Mood::Happy => Rgb::new(255, 204, 0),
        Mood::Sad => Rgb::new(0, 102, 204),
        Mood::Energetic => Rgb::new(255, 0, 0),
        Mood::Calm => Rgb::new(0, 255, 127),
    }
}

pub fn default_params() -> VisualParams {
    VisualParams {
        size: DEFAULT_SIZE,
        color: Rgb::BLACK,
    }
}

pub fn map_params(result: &AnalysisResult) -> VisualParams {
    VisualParams {
        size: map_size(result.tempo),
        color: map_color(Some(&result.mood)),
    }
}
