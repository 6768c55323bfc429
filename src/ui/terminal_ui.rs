use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame, Terminal,
};
use std::{
    io,
    path::PathBuf,
    time::{Duration, Instant},
};

use crate::app::UploadEvent;
use crate::ui::widgets::{MoodShape, Surface};
use crate::visual::VisualParams;

const NOTIFICATION_TTL: Duration = Duration::from_secs(4);

/// What the user asked for through the keyboard
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiAction {
    Upload(PathBuf),
    Quit,
}

/// Represents UI notification state
#[derive(Debug, Clone)]
struct Notification {
    message: String,
    start_time: Instant,
    duration: Duration,
}

/// Represents a text input popup
#[derive(Debug, Clone)]
pub struct TextInput {
    pub prompt: String,
    pub input: String,
    /// Position in chars, not bytes
    pub cursor_position: usize,
}

impl TextInput {
    fn new(prompt: &str) -> Self {
        Self {
            prompt: prompt.to_string(),
            input: String::new(),
            cursor_position: 0,
        }
    }

    fn byte_index(&self) -> usize {
        self.input
            .char_indices()
            .nth(self.cursor_position)
            .map(|(i, _)| i)
            .unwrap_or(self.input.len())
    }

    fn char_count(&self) -> usize {
        self.input.chars().count()
    }
}

/// Everything one frame needs
pub struct View<'a> {
    pub params: VisualParams,
    pub surface: Surface,
    pub notification: Option<&'a str>,
    pub prompt: Option<&'a TextInput>,
}

/// Main UI controller that manages terminal rendering
pub struct TerminalUI {
    terminal: Option<Terminal<CrosstermBackend<io::Stdout>>>,
    surface: Surface,
    notification: Option<Notification>,
    text_input: Option<TextInput>,
}

impl TerminalUI {
    pub fn new(surface: Surface) -> Self {
        Self {
            terminal: None,
            surface,
            notification: None,
            text_input: None,
        }
    }

    /// Checks if the terminal UI is initialized
    pub fn is_initialized(&self) -> bool {
        self.terminal.is_some()
    }

    /// Initializes the terminal UI
    pub fn initialize(&mut self) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

        let backend = CrosstermBackend::new(stdout);
        self.terminal = Some(Terminal::new(backend)?);

        Ok(())
    }

    /// Shuts down the terminal UI
    pub fn shutdown(&mut self) -> io::Result<()> {
        if let Some(mut terminal) = self.terminal.take() {
            disable_raw_mode()?;
            execute!(
                terminal.backend_mut(),
                LeaveAlternateScreen,
                DisableMouseCapture
            )?;
            terminal.show_cursor()?;
        }
        Ok(())
    }

    /// Show a notification message
    pub fn show_notification(&mut self, message: impl Into<String>, duration: Duration) {
        self.notification = Some(Notification {
            message: message.into(),
            start_time: Instant::now(),
            duration,
        });
    }

    /// The notification currently on screen, if it has not expired
    pub fn notification(&self) -> Option<&str> {
        self.notification
            .as_ref()
            .filter(|n| n.start_time.elapsed() < n.duration)
            .map(|n| n.message.as_str())
    }

    fn update_notification(&mut self) {
        if self.notification().is_none() {
            self.notification = None;
        }
    }

    /// Opens the file path prompt
    pub fn open_upload_prompt(&mut self) {
        self.text_input = Some(TextInput::new("Song file to analyze"));
    }

    pub fn is_prompt_open(&self) -> bool {
        self.text_input.is_some()
    }

    /// Reflects the progress of a background upload on screen
    pub fn handle_upload_event(&mut self, event: &UploadEvent) {
        let message = match event {
            UploadEvent::Started { path } => format!("Uploading {}...", path.display()),
            UploadEvent::Finished { outcome: Ok(result), .. } => {
                format!("Song analysis: {}", result)
            }
            UploadEvent::Finished {
                outcome: Err(message),
                ..
            } => message.clone(),
        };
        self.show_notification(message, NOTIFICATION_TTL);
    }

    /// Handles key events for the file path prompt
    fn handle_text_input_key(&mut self, key: KeyCode) -> Option<UiAction> {
        let text_input = self.text_input.as_mut()?;
        match key {
            KeyCode::Char(c) => {
                let at = text_input.byte_index();
                text_input.input.insert(at, c);
                text_input.cursor_position += 1;
            }
            KeyCode::Backspace => {
                if text_input.cursor_position > 0 {
                    text_input.cursor_position -= 1;
                    let at = text_input.byte_index();
                    text_input.input.remove(at);
                }
            }
            KeyCode::Delete => {
                if text_input.cursor_position < text_input.char_count() {
                    let at = text_input.byte_index();
                    text_input.input.remove(at);
                }
            }
            KeyCode::Left => {
                text_input.cursor_position = text_input.cursor_position.saturating_sub(1);
            }
            KeyCode::Right => {
                if text_input.cursor_position < text_input.char_count() {
                    text_input.cursor_position += 1;
                }
            }
            KeyCode::Enter => {
                let path = text_input.input.trim().to_string();
                self.text_input = None;
                if path.is_empty() {
                    self.show_notification("Please select a song file.", NOTIFICATION_TTL);
                    return None;
                }
                return Some(UiAction::Upload(PathBuf::from(path)));
            }
            KeyCode::Esc => {
                self.text_input = None;
            }
            _ => {}
        }
        None
    }

    /// Handles key events
    pub fn handle_key_event(&mut self, key: KeyCode) -> Option<UiAction> {
        if self.text_input.is_some() {
            return self.handle_text_input_key(key);
        }

        match key {
            KeyCode::Char('u') => {
                self.open_upload_prompt();
                None
            }
            KeyCode::Char('q') | KeyCode::Esc => Some(UiAction::Quit),
            _ => None,
        }
    }

    /// Polls for terminal events
    pub fn poll_events(&self, timeout: Duration) -> io::Result<Option<Event>> {
        if event::poll(timeout)? {
            return Ok(Some(event::read()?));
        }
        Ok(None)
    }

    /// Renders one frame with the given parameters
    pub fn render(&mut self, params: VisualParams) -> io::Result<()> {
        self.update_notification();

        let view = View {
            params,
            surface: self.surface,
            notification: self.notification.as_ref().map(|n| n.message.as_str()),
            prompt: self.text_input.as_ref(),
        };

        if let Some(terminal) = self.terminal.as_mut() {
            terminal.draw(|frame| draw(frame, &view))?;
        }

        Ok(())
    }
}

/// Lays out the shape, the status bar and, when open, the path prompt
pub fn draw(frame: &mut Frame, view: &View) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(5),    // Shape
            Constraint::Length(4), // Status bar
        ])
        .split(frame.size());

    let shape = MoodShape::new(view.params)
        .surface(view.surface)
        .block(Block::default().title("ai_vx").borders(Borders::ALL));
    frame.render_widget(shape, chunks[0]);

    let mut lines = vec![Line::from(vec![
        Span::styled(
            format!("size {:.0}px", view.params.size),
            Style::default().fg(Color::Cyan),
        ),
        Span::raw("  "),
        Span::styled(
            view.params.color.to_string(),
            Style::default().fg(view.params.color.into()),
        ),
        Span::raw("  |  u: upload song  q: quit"),
    ])];
    if let Some(message) = view.notification {
        lines.push(Line::from(Span::styled(
            message.to_string(),
            Style::default().fg(Color::Yellow),
        )));
    }
    let status = Paragraph::new(lines).block(Block::default().title("Status").borders(Borders::ALL));
    frame.render_widget(status, chunks[1]);

    if let Some(prompt) = view.prompt {
        let area = centered_rect(60, 3, frame.size());
        let input = Paragraph::new(prompt.input.as_str()).block(
            Block::default()
                .title(prompt.prompt.as_str())
                .borders(Borders::ALL),
        );
        frame.render_widget(Clear, area);
        frame.render_widget(input, area);
        frame.set_cursor(
            area.x + 1 + prompt.cursor_position as u16,
            area.y + 1,
        );
    }
}

/// A rect `percent_x` wide and `height` rows tall, centered in `area`
fn centered_rect(percent_x: u16, height: u16, area: Rect) -> Rect {
    let height = height.min(area.height);
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length((area.height - height) / 2),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(area);

    let side = (100 - percent_x.min(100)) / 2;
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(side),
            Constraint::Percentage(percent_x.min(100)),
            Constraint::Percentage(side),
        ])
        .split(rows[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::AnalysisResult;
    use crate::visual::{default_params, Rgb};
    use ratatui::backend::TestBackend;

    fn type_text(ui: &mut TerminalUI, text: &str) {
        for c in text.chars() {
            assert_eq!(ui.handle_key_event(KeyCode::Char(c)), None);
        }
    }

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn prompt_submits_typed_path() {
        let mut ui = TerminalUI::new(Surface::default());
        assert_eq!(ui.handle_key_event(KeyCode::Char('u')), None);
        assert!(ui.is_prompt_open());

        type_text(&mut ui, "songs/calm.mp3");
        let action = ui.handle_key_event(KeyCode::Enter);
        assert_eq!(action, Some(UiAction::Upload(PathBuf::from("songs/calm.mp3"))));
        assert!(!ui.is_prompt_open());
    }

    #[test]
    fn empty_prompt_asks_for_a_file() {
        let mut ui = TerminalUI::new(Surface::default());
        ui.open_upload_prompt();
        type_text(&mut ui, "   ");
        assert_eq!(ui.handle_key_event(KeyCode::Enter), None);
        assert_eq!(ui.notification(), Some("Please select a song file."));
    }

    #[test]
    fn quit_keys_are_typed_while_prompt_is_open() {
        let mut ui = TerminalUI::new(Surface::default());
        ui.open_upload_prompt();
        type_text(&mut ui, "q");
        assert!(ui.is_prompt_open());

        assert_eq!(ui.handle_key_event(KeyCode::Esc), None);
        assert!(!ui.is_prompt_open());
        assert_eq!(ui.handle_key_event(KeyCode::Char('q')), Some(UiAction::Quit));
    }

    #[test]
    fn editing_handles_multibyte_paths() {
        let mut ui = TerminalUI::new(Surface::default());
        ui.open_upload_prompt();
        type_text(&mut ui, "chanson_été.wav");
        for _ in 0..4 {
            ui.handle_key_event(KeyCode::Left);
        }
        ui.handle_key_event(KeyCode::Backspace);
        ui.handle_key_event(KeyCode::Delete);
        assert_eq!(
            ui.handle_key_event(KeyCode::Enter),
            Some(UiAction::Upload(PathBuf::from("chanson_étwav")))
        );
    }

    #[test]
    fn upload_events_become_notifications() {
        let mut ui = TerminalUI::new(Surface::default());
        ui.handle_upload_event(&UploadEvent::Finished {
            path: PathBuf::from("a.mp3"),
            outcome: Ok(AnalysisResult::new(120.0, "Calm")),
        });
        assert_eq!(ui.notification(), Some("Song analysis: 120.0 BPM, Calm"));

        ui.handle_upload_event(&UploadEvent::Finished {
            path: PathBuf::from("a.mp3"),
            outcome: Err("Transport error: connection refused".to_string()),
        });
        assert_eq!(ui.notification(), Some("Transport error: connection refused"));
    }

    #[test]
    fn draw_shows_shape_and_status() {
        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        let view = View {
            params: VisualParams {
                size: 175.0,
                color: Rgb::new(0, 255, 127),
            },
            surface: Surface::default(),
            notification: Some("Song analysis: 120.0 BPM, Calm"),
            prompt: None,
        };
        terminal.draw(|f| draw(f, &view)).unwrap();

        let text = screen_text(&terminal);
        assert!(text.contains("size 175px"));
        assert!(text.contains("rgb(0, 255, 127)"));
        assert!(text.contains("Song analysis: 120.0 BPM, Calm"));

        let buffer = terminal.backend().buffer();
        assert_eq!(buffer.get(40, 13).bg, Color::Rgb(0, 255, 127));
    }

    #[test]
    fn prompt_fits_very_wide_terminals() {
        let area = Rect::new(0, 0, 1200, 40);
        let popup = centered_rect(60, 3, area);
        assert_eq!(popup.height, 3);
        assert_eq!(popup.y, 18);
        assert!((719..=721).contains(&popup.width));
        assert!(popup.x + popup.width <= area.width);
    }

    #[test]
    fn prompt_on_a_short_terminal_is_clipped() {
        let popup = centered_rect(60, 3, Rect::new(0, 0, 80, 2));
        assert_eq!(popup.height, 2);
        assert_eq!(popup.y, 0);
    }

    #[test]
    fn draw_shows_prompt() {
        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        let mut prompt = TextInput::new("Song file to analyze");
        prompt.input = "calm.mp3".to_string();
        prompt.cursor_position = 8;
        let view = View {
            params: default_params(),
            surface: Surface::default(),
            notification: None,
            prompt: Some(&prompt),
        };
        terminal.draw(|f| draw(f, &view)).unwrap();

        let text = screen_text(&terminal);
        assert!(text.contains("Song file to analyze"));
        assert!(text.contains("calm.mp3"));
    }
}
