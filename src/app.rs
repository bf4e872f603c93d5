use crate::client::FrameClient;
use crate::components::{Component, LogComponent, PictureComponent, PromptComponent};
use crate::config::{Config, GlobalAction, Keybindings};
use crate::tui::{io, Tui};
use crate::types::{Action, Event};
use chrono::{DateTime, Local};
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Alignment, Constraint, Layout};
use ratatui::style::Stylize;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType};
use ratatui::Terminal;
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedSender};

#[derive(Default)]
struct State {
    selected: usize,
    online: Option<bool>,
    checked_at: Option<DateTime<Local>>,
}

pub struct App {
    config: Config,
    state: State,
}

impl App {
    pub fn new(config: Config) -> Self {
        log::debug!("App::new({config:?})");
        Self {
            config,
            state: State::default(),
        }
    }
    pub async fn run(&mut self) -> Result<()> {
        let (action_tx, mut action_rx) = mpsc::unbounded_channel();

        let client = Arc::new(FrameClient::new(&self.config.server)?);
        log::info!("frame address: {}", client.base());

        let terminal = Terminal::new(CrosstermBackend::new(io()))?;
        log::debug!("terminal size: {}", terminal.size()?);
        let mut tui = Tui::new(terminal);
        tui.start(if self.config.dev { Some(10.0) } else { None })?;

        let mut panes: Vec<Box<dyn Component>> = vec![
            Box::new(PromptComponent::new(action_tx.clone(), Arc::clone(&client))),
            Box::new(PictureComponent::new(action_tx.clone(), Arc::clone(&client))),
        ];
        panes[self.state.selected].activate()?;
        let mut log_pane = LogComponent;

        let hints = footer_hints(&self.config.keybindings);

        // The interval only fires later, so probe the frame once up front
        Self::spawn_health_check(&action_tx, &client);

        let mut constraints = vec![Constraint::Percentage(100)];
        if self.config.dev {
            constraints.push(Constraint::Min(60));
        }
        let mut should_quit = false;
        loop {
            if let Some(e) = tui.next_event().await {
                match self.handle_events(e.clone()) {
                    Some(action) => action_tx.send(action)?,
                    None => {
                        if let Event::Key(key) = e {
                            if let Some(action) = panes[self.state.selected].handle_key_events(key)?
                            {
                                action_tx.send(action)?;
                            }
                        }
                    }
                }
            }
            while let Ok(action) = action_rx.try_recv() {
                if !matches!(action, Action::Tick(_) | Action::Render) {
                    log::info!("Action {action:?}");
                }
                match action {
                    Action::Quit => should_quit = true,
                    Action::Tick(i) => {
                        let interval = self.config.intervals.health_check;
                        if interval > 0 && i as u64 % interval == 0 {
                            Self::spawn_health_check(&action_tx, &client);
                        }
                    }
                    Action::NextFocus => {
                        panes[self.state.selected].deactivate()?;
                        self.state.selected = (self.state.selected + 1) % panes.len();
                        panes[self.state.selected].activate()?;
                    }
                    Action::PrevFocus => {
                        panes[self.state.selected].deactivate()?;
                        self.state.selected =
                            (self.state.selected + panes.len() - 1) % panes.len();
                        panes[self.state.selected].activate()?;
                    }
                    Action::Health(online) => {
                        if self.state.online != Some(online) {
                            if online {
                                log::info!("frame is reachable");
                            } else {
                                log::warn!("frame is unreachable");
                            }
                        }
                        self.state.online = Some(online);
                        self.state.checked_at = Some(Local::now());
                    }
                    Action::Error(e) => log::error!("{e}"),
                    Action::Render => {
                        tui.draw(|f| {
                            // split horizontally, the right side is for log view
                            let chunks = Layout::horizontal(&constraints).split(f.area());
                            let main = Layout::vertical([
                                Constraint::Percentage(100),
                                Constraint::Length(1),
                            ])
                            .split(chunks[0]);
                            let pane_areas = Layout::horizontal(
                                panes.iter().map(|_| Constraint::Fill(1)),
                            )
                            .split(main[0]);
                            for (i, (area, pane)) in
                                pane_areas.iter().zip(panes.iter_mut()).enumerate()
                            {
                                let mut block = Block::bordered()
                                    .title(pane.title())
                                    .title_alignment(Alignment::Center);
                                if self.state.selected == i {
                                    block = block.border_type(BorderType::Double);
                                }
                                if let Err(e) = pane.draw(f, block.inner(*area)) {
                                    if let Err(e) = action_tx
                                        .send(Action::Error(format!("failed to draw: {e:?}")))
                                    {
                                        log::error!("failed to send error: {e}");
                                    }
                                }
                                f.render_widget(block, *area);
                            }
                            let health = match self.state.online {
                                Some(true) => Span::from("frame online").green(),
                                Some(false) => Span::from("frame offline").red(),
                                None => Span::from("checking frame...").dim(),
                            };
                            let mut spans = vec![health];
                            if let Some(at) = self.state.checked_at {
                                spans.push(
                                    Span::from(format!(" as of {}", at.format("%H:%M:%S"))).dim(),
                                );
                            }
                            f.render_widget(Line::from(spans), main[1]);
                            f.render_widget(
                                Line::from(hints.as_str()).right_aligned().dim(),
                                main[1],
                            );
                            if self.config.dev {
                                if let Err(e) = log_pane.draw(f, chunks[1]) {
                                    if let Err(e) = action_tx
                                        .send(Action::Error(format!("failed to draw: {e:?}")))
                                    {
                                        log::error!("failed to send error: {e}");
                                    }
                                }
                            }
                        })?;
                    }
                    _ => {
                        for pane in panes.iter_mut() {
                            if let Some(action) = pane.update(action.clone())? {
                                action_tx.send(action)?;
                            }
                        }
                    }
                }
            }
            if should_quit {
                break;
            }
        }
        tui.end()?;
        Ok(())
    }
    fn spawn_health_check(action_tx: &UnboundedSender<Action>, client: &Arc<FrameClient>) {
        let tx = action_tx.clone();
        let client = Arc::clone(client);
        tokio::spawn(async move {
            let online = client.ping().await;
            if let Err(e) = tx.send(Action::Health(online)) {
                log::error!("failed to send health result: {e}");
            }
        });
    }
    fn handle_events(&mut self, event: Event) -> Option<Action> {
        match event {
            Event::Tick(i) => Some(Action::Tick(i)),
            Event::Render => Some(Action::Render),
            Event::Key(key_event) => self.handle_key_events(key_event),
            Event::Error(e) => Some(Action::Error(e)),
            _ => None,
        }
    }
    fn handle_key_events(&mut self, key_event: KeyEvent) -> Option<Action> {
        if let Some(action) = self.config.keybindings.global.get(&key_event.into()) {
            return Some(action.into());
        }
        if key_event.code == KeyCode::Char('c') && key_event.modifiers == KeyModifiers::CONTROL {
            return Some(Action::Quit);
        }
        None
    }
}

fn footer_hints(keybindings: &Keybindings) -> String {
    let key_for = |target: GlobalAction| {
        keybindings
            .global
            .iter()
            .find(|(_, action)| **action == target)
            .and_then(|(key, _)| serde_json::to_string(key).ok())
            .map(|s| s.trim_matches('"').to_string())
    };
    let mut hints = Vec::new();
    if let Some(key) = key_for(GlobalAction::NextFocus) {
        hints.push(format!("{key}: pane"));
    }
    hints.push(String::from("Tab: field"));
    hints.push(String::from("Enter: confirm"));
    if let Some(key) = key_for(GlobalAction::Quit) {
        hints.push(format!("{key}: quit"));
    }
    hints.join("  ")
}
