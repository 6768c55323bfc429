// Network module
// Talks to the remote analysis backend

pub mod client;
pub mod protocol;

// Re-export important types
pub use client::{AnalysisClient, HttpAnalysisClient};
pub use protocol::ServerStatus;
