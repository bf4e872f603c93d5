use super::{Component, StatusLine};
use crate::client::{ClientError, FrameClient};
use crate::picture::{self, LoadedPicture};
use crate::types::{Action, SendOutcome};
use crate::widgets::PicturePreviewWidget;
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Style, Stylize};
use ratatui::text::Line;
use ratatui::widgets::{Block, Padding, Paragraph};
use ratatui::Frame;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tui_textarea::TextArea;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Path,
    Send,
}

impl Focus {
    fn next(&self) -> Self {
        match self {
            Self::Path => Self::Send,
            Self::Send => Self::Path,
        }
    }
}

pub struct PictureComponent {
    action_tx: UnboundedSender<Action>,
    client: Arc<FrameClient>,
    path: TextArea<'static>,
    picture: Option<LoadedPicture>,
    focus: Focus,
    loading: bool,
    load_seq: u32,
    sending: bool,
    status: Option<StatusLine>,
}

impl PictureComponent {
    pub fn new(action_tx: UnboundedSender<Action>, client: Arc<FrameClient>) -> Self {
        let mut path = TextArea::default();
        path.set_block(Block::bordered().title("Path").dim());
        path.set_cursor_line_style(Style::default());
        path.set_cursor_style(Style::default());
        Self {
            action_tx,
            client,
            path,
            picture: None,
            focus: Focus::Path,
            loading: false,
            load_seq: 0,
            sending: false,
            status: None,
        }
    }
    fn update_focus(&mut self, focus: Focus) {
        self.focus = focus;
        if self.focus == Focus::Path {
            self.path.set_cursor_style(Style::default().reversed());
            if let Some(block) = self.path.block() {
                self.path.set_block(block.clone().reset());
            }
        } else {
            self.path.set_cursor_style(Style::default());
            if let Some(block) = self.path.block() {
                self.path.set_block(block.clone().dim());
            }
        }
    }
    /// Reads the entered file in a background task. Each selection gets a
    /// sequence number so a completion that was overtaken by a newer
    /// selection is thrown away instead of clobbering it.
    fn select(&mut self) {
        let input = self.path.lines().join("");
        let input = input.trim();
        if input.is_empty() {
            self.status = Some(StatusLine::failure("Please select a valid image file!"));
            return;
        }
        self.load_seq += 1;
        self.loading = true;
        self.status = None;
        let seq = self.load_seq;
        let path = PathBuf::from(input);
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            let result = picture::load(&path).map_err(|e| e.to_string());
            if let Err(e) = tx.send(Action::PictureLoaded(seq, Box::new(result))) {
                log::error!("failed to send loaded picture: {e}");
            }
        });
    }
    /// Posts the selected image to the frame. While one transfer is in
    /// flight, further ones are ignored.
    fn send(&mut self) {
        if self.sending {
            return;
        }
        let Some(picture) = &self.picture else {
            self.status = Some(StatusLine::failure("Please select an image first!"));
            return;
        };
        self.sending = true;
        self.status = None;
        let image = picture.image.clone();
        let tx = self.action_tx.clone();
        let client = Arc::clone(&self.client);
        tokio::spawn(async move {
            let outcome = match client.send_image(&image).await {
                Ok(()) => SendOutcome::Delivered,
                Err(ClientError::Http(e)) => {
                    log::error!("error sending image: {e}");
                    SendOutcome::Unreachable
                }
                Err(e) => {
                    log::error!("failed to send image: {e}");
                    SendOutcome::Rejected
                }
            };
            if let Err(e) = tx.send(Action::PictureSent(outcome)) {
                log::error!("failed to send picture outcome: {e}");
            }
        });
    }
    fn draw_preview(&self, f: &mut Frame<'_>, area: Rect) {
        let block = Block::bordered().title("Preview");
        let inner = block.inner(area);
        f.render_widget(block, area);
        let Some(picture) = &self.picture else {
            let hint = if self.loading {
                "Loading..."
            } else {
                "No image selected"
            };
            f.render_widget(
                Paragraph::new(hint)
                    .alignment(Alignment::Center)
                    .block(Block::default().padding(Padding::proportional(1)))
                    .dim(),
                inner,
            );
            return;
        };
        let [info, image] =
            Layout::vertical([Constraint::Length(1), Constraint::Percentage(100)]).areas(inner);
        let mut text = format!(
            "{} ({}, {} bytes",
            picture.image.name, picture.image.mime, picture.image.size
        );
        if let Some((width, height)) = picture.dimensions {
            text.push_str(&format!(", {width}x{height}"));
        }
        text.push(')');
        f.render_widget(Line::from(text).dim(), info);
        if let Some(preview) = &picture.preview {
            f.render_widget(PicturePreviewWidget::new(preview), image);
        } else {
            f.render_widget(
                Paragraph::new("preview unavailable")
                    .alignment(Alignment::Center)
                    .dim(),
                image,
            );
        }
    }
}

impl Component for PictureComponent {
    fn title(&self) -> &'static str {
        "Picture"
    }
    fn activate(&mut self) -> Result<()> {
        self.update_focus(Focus::Path);
        Ok(())
    }
    fn deactivate(&mut self) -> Result<()> {
        self.path.set_cursor_style(Style::default());
        if let Some(block) = self.path.block() {
            self.path.set_block(block.clone().dim());
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
                if self.focus == Focus::Path =>
            {
                self.select();
                Ok(Some(Action::Render))
            }
            (KeyCode::Enter, _) | (KeyCode::Char('m'), KeyModifiers::CONTROL)
                if self.focus == Focus::Send =>
            {
                self.send();
                Ok(Some(Action::Render))
            }
            _ if self.focus == Focus::Path => {
                let cursor = self.path.cursor();
                let changed = self.path.input(key) || self.path.cursor() != cursor;
                Ok(changed.then_some(Action::Render))
            }
            _ => Ok(None),
        }
    }
    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            Action::PictureLoaded(seq, result) => {
                if seq != self.load_seq {
                    log::debug!("dropping overtaken picture load {seq}");
                    return Ok(None);
                }
                self.loading = false;
                match *result {
                    Ok(picture) => {
                        log::info!("selected {picture:?}");
                        self.picture = Some(picture);
                        self.status = None;
                    }
                    Err(e) => {
                        self.picture = None;
                        self.status = Some(StatusLine::failure(e));
                    }
                }
                Ok(Some(Action::Render))
            }
            Action::PictureSent(outcome) => {
                self.sending = false;
                self.status = Some(match outcome {
                    SendOutcome::Delivered => {
                        self.picture = None;
                        self.path.select_all();
                        self.path.cut();
                        StatusLine::success("Image sent successfully!")
                    }
                    SendOutcome::Rejected => {
                        StatusLine::failure("Failed to send image. Please try again.")
                    }
                    SendOutcome::Unreachable => {
                        StatusLine::failure("Error sending image. Please check your connection.")
                    }
                });
                Ok(Some(Action::Render))
            }
            _ => Ok(None),
        }
    }
    fn draw(&mut self, f: &mut Frame<'_>, area: Rect) -> Result<()> {
        let [path, preview, send, status] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Min(4),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(area);
        f.render_widget(&self.path, path);
        self.draw_preview(f, preview);
        let mut send_line = Line::from(if self.sending {
            "Sending..."
        } else {
            "Send Image"
        })
        .centered()
        .blue();
        if self.sending || self.picture.is_none() {
            send_line = send_line.dim();
        } else if self.focus == Focus::Send {
            send_line = send_line.reversed();
        }
        f.render_widget(send_line, send);
        if let Some(line) = self.status.as_ref().map(StatusLine::line) {
            f.render_widget(line, status);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServerConfig;
    use crate::picture::SelectedImage;
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use tokio::sync::mpsc::{self, UnboundedReceiver};

    fn unreachable_client() -> Arc<FrameClient> {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("failed to bind");
        let addr = listener.local_addr().expect("failed to get local addr");
        drop(listener);
        let config = ServerConfig {
            address: format!("http://{addr}"),
            tunnel_bypass: None,
        };
        Arc::new(FrameClient::new(&config).expect("failed to build client"))
    }

    fn component() -> (PictureComponent, UnboundedReceiver<Action>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (PictureComponent::new(tx, unreachable_client()), rx)
    }

    fn loaded_picture(name: &str) -> LoadedPicture {
        LoadedPicture {
            image: SelectedImage {
                name: name.into(),
                mime: String::from("image/png"),
                size: 10,
                data: STANDARD.encode(b"0123456789"),
            },
            dimensions: None,
            preview: None,
        }
    }

    fn type_str(component: &mut PictureComponent, s: &str) {
        for c in s.chars() {
            component
                .handle_key_events(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
                .expect("failed to handle key event");
        }
    }

    #[tokio::test]
    async fn enter_on_the_path_field_loads_the_file() {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        let path = dir.path().join("photo.png");
        image::RgbImage::from_pixel(2, 2, image::Rgb([1, 2, 3]))
            .save(&path)
            .expect("failed to write png");
        let (mut component, mut rx) = component();
        type_str(&mut component, path.to_str().expect("path is not utf-8"));
        component
            .handle_key_events(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE))
            .expect("failed to handle key event");
        assert!(component.loading);
        let action = loop {
            match rx.recv().await.expect("load should report back") {
                action @ Action::PictureLoaded(..) => break action,
                _ => continue,
            }
        };
        component.update(action).expect("failed to update");
        let picture = component.picture.as_ref().expect("picture should be set");
        assert_eq!(picture.image.name, "photo.png");
        assert_eq!(picture.dimensions, Some((2, 2)));
        assert!(!component.loading);
    }

    #[tokio::test]
    async fn selecting_a_non_image_reports_a_failure() {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, b"hello").expect("failed to write file");
        let (mut component, mut rx) = component();
        type_str(&mut component, path.to_str().expect("path is not utf-8"));
        component
            .handle_key_events(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE))
            .expect("failed to handle key event");
        let action = loop {
            match rx.recv().await.expect("load should report back") {
                action @ Action::PictureLoaded(..) => break action,
                _ => continue,
            }
        };
        component.update(action).expect("failed to update");
        assert!(component.picture.is_none());
        let status = component.status.as_ref().expect("status should be set");
        assert!(status.is_failure());
    }

    #[test]
    fn an_invalid_selection_clears_the_previous_one() {
        let (mut component, _rx) = component();
        component.load_seq = 1;
        component
            .update(Action::PictureLoaded(
                1,
                Box::new(Ok(loaded_picture("old.png"))),
            ))
            .expect("failed to update");
        assert!(component.picture.is_some());
        component.load_seq = 2;
        component
            .update(Action::PictureLoaded(
                2,
                Box::new(Err(String::from("notes.txt is not recognized as an image file"))),
            ))
            .expect("failed to update");
        assert!(component.picture.is_none());
        let status = component.status.as_ref().expect("status should be set");
        assert!(status.is_failure());
    }

    #[test]
    fn overtaken_loads_are_dropped() {
        let (mut component, _rx) = component();
        // Two selections happened; only the second may land
        component.load_seq = 2;
        component.loading = true;
        let ignored = component
            .update(Action::PictureLoaded(
                1,
                Box::new(Ok(loaded_picture("old.png"))),
            ))
            .expect("failed to update");
        assert!(ignored.is_none());
        assert!(component.picture.is_none());
        assert!(component.loading);
        component
            .update(Action::PictureLoaded(
                2,
                Box::new(Ok(loaded_picture("new.png"))),
            ))
            .expect("failed to update");
        assert_eq!(
            component.picture.as_ref().expect("picture should be set").image.name,
            "new.png"
        );
        assert!(!component.loading);
    }

    #[test]
    fn focus_changes_restyle_the_path_field() {
        let (mut component, _rx) = component();
        component.activate().expect("failed to activate");
        let focused = component.path.block().cloned();
        assert!(focused.is_some());
        let tab = KeyEvent::new(KeyCode::Tab, KeyModifiers::NONE);
        component
            .handle_key_events(tab)
            .expect("failed to handle key event");
        assert_ne!(component.path.block().cloned(), focused);
        component
            .handle_key_events(tab)
            .expect("failed to handle key event");
        assert_eq!(component.path.block().cloned(), focused);
    }

    #[test]
    fn send_requires_a_selection() {
        let (mut component, _rx) = component();
        component.send();
        let status = component.status.as_ref().expect("status should be set");
        assert!(status.is_failure());
        assert_eq!(status.text(), "Please select an image first!");
        assert!(!component.sending);
    }

    #[tokio::test]
    async fn one_transfer_in_flight_blocks_the_next() {
        let (mut component, mut rx) = component();
        component.picture = Some(loaded_picture("a.png"));
        component.send();
        assert!(component.sending);
        component.send();
        let action = rx.recv().await.expect("send should report an outcome");
        assert!(matches!(
            action,
            Action::PictureSent(SendOutcome::Unreachable)
        ));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn delivery_resets_the_selection() {
        let (mut component, _rx) = component();
        type_str(&mut component, "/tmp/a.png");
        component.picture = Some(loaded_picture("a.png"));
        component.sending = true;
        component
            .update(Action::PictureSent(SendOutcome::Delivered))
            .expect("failed to update");
        assert!(component.picture.is_none());
        assert_eq!(component.path.lines(), [""]);
        assert!(!component.sending);
        let status = component.status.as_ref().expect("status should be set");
        assert!(!status.is_failure());
        assert_eq!(status.text(), "Image sent successfully!");
    }

    #[test]
    fn rejection_keeps_the_selection() {
        let (mut component, _rx) = component();
        component.picture = Some(loaded_picture("a.png"));
        component.sending = true;
        component
            .update(Action::PictureSent(SendOutcome::Rejected))
            .expect("failed to update");
        assert!(component.picture.is_some());
        let status = component.status.as_ref().expect("status should be set");
        assert!(status.is_failure());
        assert_eq!(status.text(), "Failed to send image. Please try again.");
    }
}
