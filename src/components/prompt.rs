use super::{Component, StatusLine};
use crate::client::{ClientError, FrameClient};
use crate::types::{Action, SendOutcome};
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Style, Stylize};
use ratatui::text::Line;
use ratatui::widgets::Block;
use ratatui::Frame;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tui_textarea::TextArea;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Input,
    Submit,
}

impl Focus {
    fn next(&self) -> Self {
        match self {
            Self::Input => Self::Submit,
            Self::Submit => Self::Input,
        }
    }
}

pub struct PromptComponent {
    action_tx: UnboundedSender<Action>,
    client: Arc<FrameClient>,
    textarea: TextArea<'static>,
    focus: Focus,
    sending: bool,
    status: Option<StatusLine>,
}

impl PromptComponent {
    pub fn new(action_tx: UnboundedSender<Action>, client: Arc<FrameClient>) -> Self {
        let mut textarea = TextArea::default();
        textarea.set_block(Block::bordered().title("Text").dim());
        textarea.set_cursor_line_style(Style::default());
        textarea.set_cursor_style(Style::default());
        Self {
            action_tx,
            client,
            textarea,
            focus: Focus::Input,
            sending: false,
            status: None,
        }
    }
    fn update_focus(&mut self, focus: Focus) {
        self.focus = focus;
        if self.focus == Focus::Input {
            self.textarea.set_cursor_style(Style::default().reversed());
            if let Some(block) = self.textarea.block() {
                self.textarea.set_block(block.clone().reset());
            }
        } else {
            self.textarea.set_cursor_style(Style::default());
            if let Some(block) = self.textarea.block() {
                self.textarea.set_block(block.clone().dim());
            }
        }
    }
    /// Validates the prompt and hands it to a background task. While one
    /// submission is in flight, further ones are ignored.
    fn submit(&mut self) {
        if self.sending {
            return;
        }
        let prompt = self.textarea.lines().join("\n");
        if prompt.trim().is_empty() {
            self.status = Some(StatusLine::failure("Please enter a prompt!"));
            return;
        }
        self.sending = true;
        self.status = None;
        let tx = self.action_tx.clone();
        let client = Arc::clone(&self.client);
        tokio::spawn(async move {
            let outcome = match client.submit_prompt(&prompt).await {
                Ok(()) => SendOutcome::Delivered,
                Err(ClientError::Http(e)) => {
                    log::error!("error submitting prompt: {e}");
                    SendOutcome::Unreachable
                }
                Err(e) => {
                    log::error!("failed to submit prompt: {e}");
                    SendOutcome::Rejected
                }
            };
            if let Err(e) = tx.send(Action::PromptDone(outcome)) {
                log::error!("failed to send prompt outcome: {e}");
            }
        });
    }
}

impl Component for PromptComponent {
    fn title(&self) -> &'static str {
        "Prompt"
    }
    fn activate(&mut self) -> Result<()> {
        self.update_focus(Focus::Input);
        Ok(())
    }
    fn deactivate(&mut self) -> Result<()> {
        self.textarea.set_cursor_style(Style::default());
        if let Some(block) = self.textarea.block() {
            self.textarea.set_block(block.clone().dim());
        }
        Ok(())
    }
    fn handle_key_events(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match (key.code, key.modifiers) {
            (KeyCode::Tab, KeyModifiers::NONE) | (KeyCode::BackTab, KeyModifiers::SHIFT) => {
                self.update_focus(self.focus.next());
                Ok(Some(Action::Render))
            }
            (KeyCode::Enter, _) | (KeyCode::Char('m'), KeyModifiers::CONTROL)
                if self.focus == Focus::Submit =>
            {
                self.submit();
                Ok(Some(Action::Render))
            }
            _ if self.focus == Focus::Input => {
                let cursor = self.textarea.cursor();
                let changed = self.textarea.input(key) || self.textarea.cursor() != cursor;
                Ok(changed.then_some(Action::Render))
            }
            _ => Ok(None),
        }
    }
    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            Action::PromptDone(outcome) => {
                self.sending = false;
                self.status = Some(match outcome {
                    SendOutcome::Delivered => {
                        self.textarea.select_all();
                        self.textarea.cut();
                        StatusLine::success("Prompt submitted successfully!")
                    }
                    SendOutcome::Rejected => {
                        StatusLine::failure("Failed to submit prompt. Please try again.")
                    }
                    SendOutcome::Unreachable => {
                        StatusLine::failure("Error submitting prompt. Please check your connection.")
                    }
                });
                Ok(Some(Action::Render))
            }
            _ => Ok(None),
        }
    }
    fn draw(&mut self, f: &mut Frame<'_>, area: Rect) -> Result<()> {
        let [input, submit, status] = Layout::vertical([
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(area);
        f.render_widget(&self.textarea, input);
        let mut submit_line = Line::from(if self.sending {
            "Sending..."
        } else {
            "Submit Prompt"
        })
        .centered()
        .blue();
        if self.sending {
            submit_line = submit_line.dim();
        } else if self.focus == Focus::Submit {
            submit_line = submit_line.reversed();
        }
        f.render_widget(submit_line, submit);
        if let Some(line) = self.status.as_ref().map(StatusLine::line) {
            f.render_widget(line, status);
        }
        Ok(())
    }
}
