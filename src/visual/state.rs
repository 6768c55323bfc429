// Shared visual state
// The single VisualParams value the render loop reads every frame

use log::{error, info, warn};
use std::sync::Arc;
use tokio::sync::watch;

use super::{default_params, map_params, VisualParams};
use crate::analysis::AnalysisResult;
use crate::error::{Error, Result};

/// Observable holder for the current [`VisualParams`].
///
/// Clones share the same value. Every write replaces the whole value, so a
/// reader never sees a half-updated size/color pair.
#[derive(Debug, Clone)]
pub struct VisualState {
    tx: Arc<watch::Sender<VisualParams>>,
}

impl VisualState {
    /// Starts at [`default_params`]
    pub fn new() -> Self {
        Self::with_params(default_params())
    }

    pub fn with_params(params: VisualParams) -> Self {
        let (tx, _rx) = watch::channel(params);
        Self { tx: Arc::new(tx) }
    }

    /// Snapshot of the current parameters
    pub fn current(&self) -> VisualParams {
        *self.tx.borrow()
    }

    /// Receiver that is notified on every replacement
    pub fn subscribe(&self) -> watch::Receiver<VisualParams> {
        self.tx.subscribe()
    }

    /// Replaces the parameters with the ones mapped from `result`
    pub fn apply(&self, result: &AnalysisResult) -> VisualParams {
        let params = map_params(result);
        self.replace(params);
        params
    }

    /// Replaces the parameters wholesale, bypassing the mapper
    pub fn apply_remote(&self, params: VisualParams) {
        self.replace(params);
    }

    /// Applies a successful analysis; logs a failed one and keeps the
    /// previous parameters. Returns whether the state changed.
    pub fn apply_outcome(&self, outcome: &Result<AnalysisResult>) -> bool {
        match outcome {
            Ok(result) => {
                let params = self.apply(result);
                info!(
                    "Visualizing {} as size {:.1}px, {}",
                    result, params.size, params.color
                );
                true
            }
            Err(Error::NoFileSelected) => {
                warn!("Upload skipped: no song file selected");
                false
            }
            Err(e @ Error::Format(_)) => {
                error!("{}", e);
                false
            }
            Err(e) => {
                error!("Error uploading song: {}", e);
                false
            }
        }
    }

    fn replace(&self, params: VisualParams) {
        // send_replace succeeds even when nobody is subscribed
        self.tx.send_replace(params);
    }
}

impl Default for VisualState {
    fn default() -> Self {
        Self::new()
    }
}
