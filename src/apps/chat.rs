//! Chat panel: a message log, an input line and a relay connection.

use std::collections::VecDeque;
use std::time::Instant;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::components::{Component, ComponentContext};
use crate::constants::CHAT_HISTORY_LIMIT;
use crate::storage::Storage;
use crate::ui::{UiFrame, truncate_to_width};
use crate::window::PanelId;

use super::relay::{ChatRelay, RelayEvent};

pub const USERNAME_KEY: &str = "chatUsername";
pub const CHANNEL_KEY: &str = "chatChannel";
pub const CHANNELS: [&str; 3] = ["General", "TechTalk", "Random"];

/// Wire format shared with the relay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub data: String,
    #[serde(default)]
    pub channel: String,
    #[serde(default)]
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

impl Envelope {
    pub fn message(data: &str, channel: &str, username: &str, key: Option<String>) -> Self {
        Self {
            kind: "message".to_string(),
            data: data.to_string(),
            channel: channel.to_string(),
            username: username.to_string(),
            key,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Message,
    Username,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineKind {
    Own,
    Remote,
    System,
}

#[derive(Debug, Clone)]
struct ChatLine {
    text: String,
    kind: LineKind,
}

pub struct ChatComponent {
    panel: PanelId,
    storage: Storage,
    relay: Box<dyn ChatRelay>,
    api_key: Option<String>,
    channel: String,
    mode: InputMode,
    input: String,
    lines: VecDeque<ChatLine>,
    clock: fn() -> String,
}

fn local_time() -> String {
    chrono::Local::now().format("%H:%M:%S").to_string()
}

impl ChatComponent {
    pub fn new(panel: PanelId, storage: Storage, relay: Box<dyn ChatRelay>) -> Self {
        let channel = storage
            .get(CHANNEL_KEY)
            .filter(|c| CHANNELS.contains(&c.as_str()))
            .unwrap_or_else(|| CHANNELS[0].to_string());
        let mode = if stored_username(&storage).is_some() {
            InputMode::Message
        } else {
            InputMode::Username
        };
        debug!(panel = %panel, channel, "chat started");
        Self {
            panel,
            storage,
            relay,
            api_key: None,
            channel,
            mode,
            input: String::new(),
            lines: VecDeque::new(),
            clock: local_time,
        }
    }

    /// Attach an API key to every outgoing envelope.
    pub fn with_api_key(mut self, key: Option<String>) -> Self {
        self.api_key = key.filter(|k| !k.is_empty());
        self
    }

    pub fn panel(&self) -> PanelId {
        self.panel
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    pub fn username(&self) -> Option<String> {
        stored_username(&self.storage)
    }

    pub fn mode(&self) -> InputMode {
        self.mode
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// Displayed lines, oldest first, timestamp prefix included.
    pub fn lines(&self) -> Vec<&str> {
        self.lines.iter().map(|l| l.text.as_str()).collect()
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    pub fn begin_username_change(&mut self) {
        self.mode = InputMode::Username;
        self.input.clear();
    }

    pub fn cycle_channel(&mut self) {
        let next = CHANNELS
            .iter()
            .position(|c| *c == self.channel)
            .map_or(0, |i| (i + 1) % CHANNELS.len());
        self.channel = CHANNELS[next].to_string();
        self.storage.set(CHANNEL_KEY, self.channel.clone());
        debug!(panel = %self.panel, channel = self.channel, "switched channel");
    }

    /// Act on the input line: store a username or send a message.
    pub fn submit(&mut self) {
        match self.mode {
            InputMode::Username => self.commit_username(),
            InputMode::Message => self.send_message(),
        }
    }

    fn commit_username(&mut self) {
        let name = self.input.trim().to_string();
        if name.is_empty() {
            return;
        }
        self.storage.set(USERNAME_KEY, name.clone());
        self.input.clear();
        self.mode = InputMode::Message;
        self.display(
            format!("Your username has been changed to {name}"),
            LineKind::System,
        );
    }

    fn send_message(&mut self) {
        let message = self.input.trim().to_string();
        if message.is_empty() {
            return;
        }
        if !self.relay.is_open() {
            debug!(panel = %self.panel, "relay closed; message kept in input");
            return;
        }
        let Some(username) = self.username() else {
            self.begin_username_change();
            return;
        };
        let envelope = Envelope::message(&message, &self.channel, &username, self.api_key.clone());
        let frame = match serde_json::to_string(&envelope) {
            Ok(frame) => frame,
            Err(err) => {
                warn!(error = %err, "failed to encode chat envelope");
                return;
            }
        };
        if let Err(err) = self.relay.send(frame) {
            warn!(panel = %self.panel, error = %err, "failed to send chat message");
            return;
        }
        self.display(format!("You: {message}"), LineKind::Own);
        self.input.clear();
    }

    fn on_relay_event(&mut self, event: RelayEvent) {
        match event {
            RelayEvent::Opened => {
                self.display("Connected to the chat server.".into(), LineKind::System)
            }
            RelayEvent::Closed => {
                self.display("Disconnected from the chat server.".into(), LineKind::System)
            }
            RelayEvent::Frame(raw) => self.on_frame(&raw),
        }
    }

    fn on_frame(&mut self, raw: &str) {
        let envelope: Envelope = match serde_json::from_str(raw) {
            Ok(envelope) => envelope,
            Err(err) => {
                warn!(panel = %self.panel, error = %err, "dropping malformed chat frame");
                return;
            }
        };
        match envelope.kind.as_str() {
            "heartbeat" => {}
            "message" => {
                if envelope.channel == self.channel {
                    self.display(
                        format!("{}: {}", envelope.username, envelope.data),
                        LineKind::Remote,
                    );
                }
            }
            _ => self.display(format!("Server: {}", envelope.data), LineKind::System),
        }
    }

    fn display(&mut self, message: String, kind: LineKind) {
        let text = format!("{} - {}", (self.clock)(), message);
        self.lines.push_back(ChatLine { text, kind });
        while self.lines.len() > CHAT_HISTORY_LIMIT {
            self.lines.pop_front();
        }
    }

    fn handle_key(&mut self, key: &KeyEvent) -> bool {
        if key.kind == KeyEventKind::Release {
            return false;
        }
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('u') if ctrl => self.begin_username_change(),
            KeyCode::Char('l') if ctrl => self.cycle_channel(),
            KeyCode::Char(ch) if !ctrl => self.input.push(ch),
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Enter => self.submit(),
            KeyCode::Esc if self.mode == InputMode::Username && self.username().is_some() => {
                self.mode = InputMode::Message;
                self.input.clear();
            }
            _ => return false,
        }
        true
    }
}

fn stored_username(storage: &Storage) -> Option<String> {
    storage
        .get(USERNAME_KEY)
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
}

impl Component for ChatComponent {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, _ctx: &ComponentContext) {
        if area.height < 3 || area.width == 0 {
            return;
        }
        let width = area.width as usize;
        let user = self.username().unwrap_or_else(|| "-".to_string());
        let status = format!("{user} @ {}  ^U name  ^L channel", self.channel);
        let status_style = Style::default().add_modifier(Modifier::BOLD);
        frame.set_string(area.x, area.y, &truncate_to_width(&status, width), status_style);

        let log_rows = area.height.saturating_sub(2) as usize;
        let skip = self.lines.len().saturating_sub(log_rows);
        for (row, line) in self.lines.iter().skip(skip).enumerate() {
            let style = match line.kind {
                LineKind::Own => Style::default().fg(crate::theme::chat_self_fg()),
                LineKind::Remote => Style::default(),
                LineKind::System => Style::default().fg(crate::theme::chat_system_fg()),
            };
            let y = area.y + 1 + row as u16;
            frame.set_string(area.x, y, &truncate_to_width(&line.text, width), style);
        }

        let prompt = match self.mode {
            InputMode::Message => "> ",
            InputMode::Username => "Username: ",
        };
        let line = format!("{prompt}{}", self.input);
        // Keep the end of a long input visible.
        let visible: String = {
            let count = line.chars().count();
            line.chars().skip(count.saturating_sub(width)).collect()
        };
        let y = area.y + area.height - 1;
        frame.set_string(area.x, y, &visible, Style::default().add_modifier(Modifier::REVERSED));
    }

    fn handle_event(&mut self, event: &Event, _ctx: &ComponentContext) -> bool {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Paste(text) => {
                self.input.push_str(text.trim_end_matches(['\r', '\n']));
                true
            }
            _ => false,
        }
    }

    fn tick(&mut self, _now: Instant) {
        while let Some(event) = self.relay.poll() {
            self.on_relay_event(event);
        }
    }
}
