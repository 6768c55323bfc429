// UI widgets

pub mod mood_shape;

pub use mood_shape::{MoodShape, Surface};
