// Analysis results
// What the backend tells us about a song

use serde::{Deserialize, Serialize};
use std::fmt;

/// Tempo and mood of a song as reported by the analysis backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Beats per minute, usually somewhere in 60..=180
    pub tempo: f64,
    /// Mood label, normally one of [`Mood::ALL`]
    pub mood: String,
}

impl AnalysisResult {
    pub fn new(tempo: f64, mood: impl Into<String>) -> Self {
        Self {
            tempo,
            mood: mood.into(),
        }
    }

    /// The mood label parsed into the known set, if it is one of them
    pub fn known_mood(&self) -> Option<Mood> {
        Mood::from_label(&self.mood)
    }
}

impl fmt::Display for AnalysisResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1} BPM, {}", self.tempo, self.mood)
    }
}

/// The moods the backend classifies songs into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mood {
    Happy,
    Sad,
    Energetic,
    Calm,
}

impl Mood {
    pub const ALL: [Mood; 4] = [Mood::Happy, Mood::Sad, Mood::Energetic, Mood::Calm];

    /// Parses a wire label. Matching is case-sensitive.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Happy" => Some(Mood::Happy),
            "Sad" => Some(Mood::Sad),
            "Energetic" => Some(Mood::Energetic),
            "Calm" => Some(Mood::Calm),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Mood::Happy => "Happy",
            Mood::Sad => "Sad",
            Mood::Energetic => "Energetic",
            Mood::Calm => "Calm",
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
