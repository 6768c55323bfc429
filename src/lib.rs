// ai_vx: song tempo/mood visualizer
// Expose public modules for use in integration tests

pub mod analysis;
pub mod app;
pub mod error;
pub mod network;
pub mod ui;
pub mod visual;

// Re-export commonly used types for convenience
pub use analysis::{AnalysisResult, Mood};
pub use app::config::{ConfigManager, Settings};
pub use app::App;
pub use error::{Error, Result};
pub use network::{AnalysisClient, HttpAnalysisClient, ServerStatus};
pub use visual::{Rgb, VisualParams, VisualState};
