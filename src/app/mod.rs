pub mod config;

use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers};
use log::{debug, info};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

use crate::analysis::AnalysisResult;
use crate::error::Result;
use crate::network::AnalysisClient;
use crate::ui::{Surface, TerminalUI, UiAction};
use crate::visual::{VisualParams, VisualState};
use self::config::Settings;

/// Progress of a background upload, reported to the UI
#[derive(Debug, Clone)]
pub enum UploadEvent {
    Started {
        path: PathBuf,
    },
    Finished {
        path: PathBuf,
        /// The analysis, or the error message already logged for it
        outcome: std::result::Result<AnalysisResult, String>,
    },
}

/// Submits `path` and feeds the outcome into `state`.
///
/// Errors are logged and leave `state` untouched; they are returned only so
/// the caller can show them.
pub async fn upload_and_apply(
    client: &dyn AnalysisClient,
    state: &VisualState,
    path: &Path,
) -> Result<AnalysisResult> {
    let outcome = client.submit(path).await;
    state.apply_outcome(&outcome);
    outcome
}

/// Main application struct that coordinates all components
pub struct App {
    settings: Settings,
    client: Arc<dyn AnalysisClient>,
    state: VisualState,
}

impl App {
    pub fn new(settings: Settings, client: Arc<dyn AnalysisClient>) -> Self {
        Self {
            settings,
            client,
            state: VisualState::new(),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn client(&self) -> &dyn AnalysisClient {
        self.client.as_ref()
    }

    /// The shared visual state; clones observe the same value
    pub fn state(&self) -> &VisualState {
        &self.state
    }

    pub fn surface(&self) -> Surface {
        Surface::new(self.settings.surface_width, self.settings.surface_height)
    }

    /// Time between two frames; a frame rate of zero is treated as one
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.settings.frame_rate.max(1) as f64)
    }

    /// Uploads a song and waits for the visual update
    pub async fn upload(&self, path: &Path) -> Result<AnalysisResult> {
        upload_and_apply(self.client.as_ref(), &self.state, path).await
    }

    /// Secondary path: lets the backend compute the parameters and shows
    /// them as-is
    pub async fn fetch_remote_visuals(&self, result: &AnalysisResult) -> Result<VisualParams> {
        let params = self.client.request_visuals(result).await?;
        self.state.apply_remote(params);
        Ok(params)
    }

    /// Uploads on a background task so the frame loop keeps running.
    /// In-flight uploads cannot be cancelled.
    pub fn spawn_upload(&self, path: PathBuf, events: mpsc::Sender<UploadEvent>) {
        let client = Arc::clone(&self.client);
        let state = self.state.clone();

        tokio::spawn(async move {
            let _ = events
                .send(UploadEvent::Started { path: path.clone() })
                .await;
            let outcome = upload_and_apply(client.as_ref(), &state, &path)
                .await
                .map_err(|e| e.to_string());
            let _ = events.send(UploadEvent::Finished { path, outcome }).await;
        });
    }

    /// Runs the viewer until the user quits
    pub async fn run_tui(&self, initial_file: Option<PathBuf>) -> anyhow::Result<()> {
        let mut terminal_ui = TerminalUI::new(self.surface());
        terminal_ui.initialize()?;

        let result = self.event_loop(&mut terminal_ui, initial_file).await;

        terminal_ui.shutdown()?;
        result
    }

    async fn event_loop(
        &self,
        terminal_ui: &mut TerminalUI,
        initial_file: Option<PathBuf>,
    ) -> anyhow::Result<()> {
        let (tx, mut rx) = mpsc::channel::<UploadEvent>(16);
        if let Some(path) = initial_file {
            self.spawn_upload(path, tx.clone());
        }

        let tick_rate = self.frame_interval();
        let mut last_tick = Instant::now();
        info!("Viewer started at {:?} per frame", tick_rate);

        loop {
            let timeout = tick_rate
                .checked_sub(last_tick.elapsed())
                .unwrap_or(Duration::ZERO);

            if let Some(Event::Key(key_event)) = terminal_ui.poll_events(timeout)? {
                if key_event.kind == KeyEventKind::Press {
                    if key_event.modifiers.contains(KeyModifiers::CONTROL)
                        && key_event.code == KeyCode::Char('c')
                    {
                        break;
                    }

                    match terminal_ui.handle_key_event(key_event.code) {
                        Some(UiAction::Upload(path)) => self.spawn_upload(path, tx.clone()),
                        Some(UiAction::Quit) => break,
                        None => {}
                    }
                }
            }

            while let Ok(event) = rx.try_recv() {
                debug!("Upload event: {:?}", event);
                terminal_ui.handle_upload_event(&event);
            }

            if last_tick.elapsed() >= tick_rate {
                terminal_ui.render(self.state.current())?;
                last_tick = Instant::now();
            }
        }

        Ok(())
    }
}
