mod log;
mod picture;
mod prompt;

pub use self::log::LogComponent;
pub use self::picture::PictureComponent;
pub use self::prompt::PromptComponent;

use crate::types::Action;
use color_eyre::Result;
use crossterm::event::KeyEvent;
use ratatui::layout::Rect;
use ratatui::style::Stylize;
use ratatui::text::Line;
use ratatui::Frame;

pub trait Component {
    fn title(&self) -> &'static str;
    fn activate(&mut self) -> Result<()> {
        Ok(())
    }
    fn deactivate(&mut self) -> Result<()> {
        Ok(())
    }
    #[allow(unused_variables)]
    fn handle_key_events(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        Ok(None)
    }
    #[allow(unused_variables)]
    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        Ok(None)
    }
    fn draw(&mut self, f: &mut Frame<'_>, area: Rect) -> Result<()>;
}

/// Outcome of the most recent action in a pane, drawn on its bottom line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    text: String,
    failure: bool,
}

impl StatusLine {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            failure: false,
        }
    }
    pub fn failure(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            failure: true,
        }
    }
    pub fn text(&self) -> &str {
        &self.text
    }
    pub fn is_failure(&self) -> bool {
        self.failure
    }
    pub fn line(&self) -> Line {
        let line = Line::from(self.text.as_str());
        if self.failure {
            line.red()
        } else {
            line.green()
        }
    }
}
