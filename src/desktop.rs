//! The desktop: dock, launchers and the panel stack they populate.
//!
//! `Desktop` owns the `Document`, the `WindowManager` acting on it and the
//! root dispatcher. Launching an app creates a panel through the manager,
//! inserts it, mounts the content module against the new panel id and opens
//! it. Every launch makes a fresh panel; closed panels stay in the document
//! (hidden) until destroyed.

use std::collections::BTreeMap;
use std::time::Instant;

use crossterm::event::{Event, KeyEventKind, MouseButton, MouseEventKind};
use indoc::indoc;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::Text;
use ratatui::widgets::{Block, Paragraph};
use tracing::{debug, info, warn};

use crate::apps::{ChatComponent, LocalRelay, MemoryGame, TaskManager};
use crate::components::{
    BoardSize, Component, ComponentContext, ConfirmAction, ConfirmOverlayComponent,
    DebugLogComponent, DebugLogHandle, Dock, PickerOutcome, SizePickerComponent,
};
use crate::dispatch::{RootDispatcher, Routed};
use crate::keybindings::{Action, KeyBindings};
use crate::layout::centered;
use crate::storage::Storage;
use crate::ui::UiFrame;
use crate::window::{Document, PanelId, PointerId, WindowManager};

const WELCOME: &str = indoc! {"
    term-desk

    F2  memory game
    F3  chat
    F4  tasks
    F12 debug log

    Drag a panel by its header. Ctrl+Q quits.
"};

const CHAT_SIZE: (u16, u16) = (52, 18);
const TASKS_SIZE: (u16, u16) = (48, 20);
const DEBUG_LOG_SIZE: (u16, u16) = (72, 14);

/// Outer size of a memory game panel for a board.
pub fn memory_panel_size(size: BoardSize) -> (u16, u16) {
    // status + blank row, the grid, result + close marker, then chrome
    let width = (size.cols * 6).max(28) + 2;
    let height = 2 + size.rows * 2 + 2 + 3;
    (width, height)
}

pub struct Desktop {
    wm: WindowManager,
    doc: Document,
    dispatcher: RootDispatcher,
    storage: Storage,
    keys: KeyBindings,
    dock: Dock,
    picker: SizePickerComponent,
    confirm: ConfirmOverlayComponent,
    debug_log: Option<DebugLogHandle>,
    debug_panel: Option<PanelId>,
    chat_key: Option<String>,
    launched: BTreeMap<PanelId, Action>,
    quit: bool,
}

impl Desktop {
    pub fn new(storage: Storage) -> Self {
        let keys = KeyBindings::default();
        let dock = Dock::new(&keys);
        Self {
            wm: WindowManager::new(),
            doc: Document::new(),
            dispatcher: RootDispatcher::new(),
            storage,
            keys,
            dock,
            picker: SizePickerComponent::new(),
            confirm: ConfirmOverlayComponent::new(),
            debug_log: None,
            debug_panel: None,
            chat_key: None,
            launched: BTreeMap::new(),
            quit: false,
        }
    }

    pub fn with_debug_log(mut self, handle: DebugLogHandle) -> Self {
        self.debug_log = Some(handle);
        self
    }

    pub fn with_chat_key(mut self, key: Option<String>) -> Self {
        self.chat_key = key;
        self
    }

    pub fn window_manager(&self) -> &WindowManager {
        &self.wm
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.doc
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    pub fn picker_visible(&self) -> bool {
        self.picker.visible()
    }

    pub fn confirm_visible(&self) -> bool {
        self.confirm.visible()
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Which launcher created a panel.
    pub fn kind_of(&self, id: PanelId) -> Option<Action> {
        self.launched.get(&id).copied()
    }

    pub fn debug_panel(&self) -> Option<PanelId> {
        self.debug_panel
    }

    /// Run a desktop-level action. Returns the panel it created or opened.
    pub fn launch(&mut self, action: Action) -> Option<PanelId> {
        debug!(?action, "desktop action");
        match action {
            Action::LaunchMemory => {
                self.picker.open();
                None
            }
            Action::LaunchChat => Some(self.launch_chat()),
            Action::LaunchTasks => Some(self.launch_tasks()),
            Action::ToggleDebugLog => self.toggle_debug_log(),
            Action::CloseFocused => {
                let id = self.doc.focused()?;
                self.wm.close(&mut self.doc, id);
                Some(id)
            }
            Action::DestroyFocused => {
                let id = self.doc.focused()?;
                self.destroy(id);
                Some(id)
            }
            Action::CycleFocus => self.wm.cycle_focus(&mut self.doc),
            Action::Quit => {
                self.confirm.open("Exit", "Close every panel and leave term-desk?", "Exit");
                None
            }
            _ => None,
        }
    }

    /// Open a memory game panel for a chosen board size.
    pub fn launch_memory(&mut self, size: BoardSize) -> Option<PanelId> {
        let (width, height) = memory_panel_size(size);
        let id = self.spawn("Memory Game", Action::LaunchMemory, (width, height));
        match MemoryGame::new(id, size.rows, size.cols, self.storage.clone()) {
            Ok(game) => {
                self.doc.mount(id, Box::new(game));
                self.wm.open(&mut self.doc, id);
                Some(id)
            }
            Err(err) => {
                warn!(%err, board = %size.label(), "could not start memory game");
                self.destroy(id);
                None
            }
        }
    }

    pub fn launch_chat(&mut self) -> PanelId {
        let id = self.spawn("Chat", Action::LaunchChat, CHAT_SIZE);
        let chat = ChatComponent::new(id, self.storage.clone(), Box::new(LocalRelay::new()))
            .with_api_key(self.chat_key.clone());
        self.doc.mount(id, Box::new(chat));
        self.wm.open(&mut self.doc, id);
        id
    }

    pub fn launch_tasks(&mut self) -> PanelId {
        let id = self.spawn("Tasks", Action::LaunchTasks, TASKS_SIZE);
        let tasks = TaskManager::new(id, self.storage.clone());
        self.doc.mount(id, Box::new(tasks));
        self.wm.open(&mut self.doc, id);
        id
    }

    /// Show the debug log panel, or hide it when it is focused.
    pub fn toggle_debug_log(&mut self) -> Option<PanelId> {
        if let Some(id) = self.debug_panel
            && self.doc.contains(id)
        {
            if self.doc.focused() == Some(id) {
                self.wm.close(&mut self.doc, id);
            } else {
                self.wm.open(&mut self.doc, id);
            }
            return Some(id);
        }
        let Some(handle) = self.debug_log.clone() else {
            warn!("debug log is not installed");
            return None;
        };
        let id = self.spawn("Debug Log", Action::ToggleDebugLog, DEBUG_LOG_SIZE);
        self.doc.mount(id, Box::new(DebugLogComponent::new(handle)));
        self.wm.open(&mut self.doc, id);
        self.debug_panel = Some(id);
        Some(id)
    }

    /// Remove a panel and everything attached to it.
    pub fn destroy(&mut self, id: PanelId) -> bool {
        let removed = self.wm.destroy(&mut self.doc, id).is_some();
        self.launched.remove(&id);
        if self.debug_panel == Some(id) {
            self.debug_panel = None;
        }
        removed
    }

    fn spawn(&mut self, title: &str, kind: Action, (width, height): (u16, u16)) -> PanelId {
        let mut panel = self.wm.create_panel(title, Text::default());
        panel.set_size(width, height);
        let id = self.doc.insert(panel);
        self.launched.insert(id, kind);
        info!(panel = %id, title, "panel created");
        id
    }

    /// Feed one input event through the desktop. Returns whether anything
    /// consumed it.
    pub fn handle_event(&mut self, event: &Event, area: Rect) -> bool {
        if self.confirm.visible() || self.picker.visible() {
            self.release_drags(event);
        }
        if self.confirm.visible() {
            match self.confirm.handle_confirm_event(event) {
                Some(ConfirmAction::Confirm) => {
                    self.confirm.close();
                    self.quit = true;
                }
                Some(ConfirmAction::Cancel) => self.confirm.close(),
                None => {}
            }
            return true;
        }
        if self.picker.visible() {
            match self.picker.handle_picker_event(event) {
                Some(PickerOutcome::Selected(size)) => {
                    self.picker.close();
                    self.launch_memory(size);
                }
                Some(PickerOutcome::Cancelled) => self.picker.close(),
                None => {}
            }
            return true;
        }
        if let Event::Key(key) = event {
            if key.kind == KeyEventKind::Release {
                return false;
            }
            if let Some(action) = self.keys.global_action(key) {
                self.launch(action);
                return true;
            }
        }
        if let Event::Mouse(mouse) = event
            && mouse.kind == MouseEventKind::Down(MouseButton::Left)
            && area.height > 0
            && mouse.row == dock_row(area)
        {
            self.release_drags(event);
            let ctx = ComponentContext::default();
            if self.dock.handle_event(event, &ctx)
                && let Some(action) = self.dock.take_pressed()
            {
                self.launch(action);
                return true;
            }
        }
        !matches!(
            self.dispatcher.dispatch(&mut self.wm, &mut self.doc, event),
            Routed::Ignored
        )
    }

    /// Pointer release, a fresh press or focus loss ends any drag, even when
    /// an overlay or the dock keeps the event from the window manager.
    fn release_drags(&mut self, event: &Event) {
        match event {
            Event::Mouse(mouse)
                if matches!(
                    mouse.kind,
                    MouseEventKind::Up(MouseButton::Left) | MouseEventKind::Down(MouseButton::Left)
                ) =>
            {
                self.wm.end_drag(PointerId::PRIMARY);
            }
            Event::FocusLost => {
                self.wm.release_all_drags();
            }
            _ => {}
        }
    }

    pub fn tick(&mut self, now: Instant) {
        self.doc.tick(now);
    }

    pub fn render(&mut self, frame: &mut UiFrame<'_>) {
        let area = frame.area();
        if area.width == 0 || area.height == 0 {
            return;
        }
        frame.render_widget(
            Block::default().style(Style::default().bg(crate::theme::desktop_bg())),
            area,
        );
        if !self.doc.panels().any(|panel| panel.is_visible()) {
            let lines = WELCOME.lines().count() as u16;
            let width = WELCOME.lines().map(|l| l.chars().count()).max().unwrap_or(0) as u16;
            let rect = centered(area, width.min(area.width), lines.min(area.height));
            frame.render_widget(Paragraph::new(WELCOME), rect);
        }

        let decorator = self.wm.decorator();
        crate::window::render_document(frame, &mut self.doc, &*decorator);

        self.refresh_dock();
        let dock_area = Rect::new(area.x, dock_row(area), area.width, 1);
        self.dock.render(frame, dock_area, &ComponentContext::default());

        let ctx = ComponentContext::new(true);
        self.picker.render(frame, area, &ctx);
        self.confirm.render(frame, area, &ctx);
    }

    fn refresh_dock(&mut self) {
        for action in [
            Action::LaunchMemory,
            Action::LaunchChat,
            Action::LaunchTasks,
            Action::ToggleDebugLog,
        ] {
            let running = self.launched.iter().any(|(id, kind)| {
                *kind == action && self.doc.get(*id).is_some_and(|panel| panel.is_visible())
            });
            self.dock.set_running(action, running);
        }
        let right = self
            .doc
            .focused()
            .and_then(|id| self.doc.get(id))
            .map(|panel| panel.title().to_string())
            .unwrap_or_default();
        self.dock.set_right(right);
    }
}

fn dock_row(area: Rect) -> u16 {
    area.y + area.height.saturating_sub(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::buffer_row;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent};
    use ratatui::buffer::Buffer;

    const AREA: Rect = Rect {
        x: 0,
        y: 0,
        width: 100,
        height: 40,
    };

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn ctrl(c: char) -> Event {
        Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL))
    }

    fn press(column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    fn render(desktop: &mut Desktop) -> Buffer {
        let mut buffer = Buffer::empty(AREA);
        let mut frame = UiFrame::from_parts(AREA, &mut buffer);
        desktop.render(&mut frame);
        buffer
    }

    #[test]
    fn launching_chat_opens_a_focused_panel() {
        let mut desktop = Desktop::new(Storage::in_memory());
        let id = desktop.launch_chat();
        assert_eq!(desktop.document().focused(), Some(id));
        assert_eq!(desktop.kind_of(id), Some(Action::LaunchChat));
        let panel = desktop.document().get(id).unwrap();
        assert_eq!(panel.title(), "Chat");
        assert!(panel.has_module());
    }

    #[test]
    fn memory_launch_goes_through_the_picker() {
        let mut desktop = Desktop::new(Storage::in_memory());
        assert!(desktop.handle_event(&key(KeyCode::F(2)), AREA));
        assert!(desktop.picker_visible());
        assert!(desktop.document().is_empty());

        // second option is 2x4
        desktop.handle_event(&key(KeyCode::Right), AREA);
        desktop.handle_event(&key(KeyCode::Enter), AREA);
        assert!(!desktop.picker_visible());
        let id = desktop.document().focused().expect("memory panel");
        let panel = desktop.document().get(id).unwrap();
        assert_eq!(panel.title(), "Memory Game");
        let (w, h) = memory_panel_size(BoardSize { rows: 2, cols: 4 });
        assert_eq!((panel.rect().width, panel.rect().height), (w, h));
    }

    #[test]
    fn picker_cancel_creates_nothing() {
        let mut desktop = Desktop::new(Storage::in_memory());
        desktop.launch(Action::LaunchMemory);
        desktop.handle_event(&key(KeyCode::Esc), AREA);
        assert!(!desktop.picker_visible());
        assert!(desktop.document().is_empty());
    }

    #[test]
    fn quit_requires_confirmation() {
        let mut desktop = Desktop::new(Storage::in_memory());
        desktop.handle_event(&ctrl('q'), AREA);
        assert!(desktop.confirm_visible());
        assert!(!desktop.should_quit());
        desktop.handle_event(&key(KeyCode::Esc), AREA);
        assert!(!desktop.confirm_visible());
        assert!(!desktop.should_quit());

        desktop.handle_event(&ctrl('q'), AREA);
        desktop.handle_event(&key(KeyCode::Enter), AREA);
        assert!(desktop.should_quit());
    }

    #[test]
    fn close_focused_hides_and_destroy_removes() {
        let mut desktop = Desktop::new(Storage::in_memory());
        let chat = desktop.launch_chat();
        let tasks = desktop.launch_tasks();
        desktop.handle_event(&ctrl('w'), AREA);
        assert!(!desktop.document().get(tasks).unwrap().is_visible());
        assert_eq!(desktop.document().focused(), Some(chat));

        desktop.handle_event(&ctrl('x'), AREA);
        assert!(!desktop.document().contains(chat));
        assert_eq!(desktop.kind_of(chat), None);
    }

    #[test]
    fn debug_log_toggles_one_panel() {
        let handle = DebugLogHandle::new(16);
        handle.push("hello from the log");
        let mut desktop = Desktop::new(Storage::in_memory()).with_debug_log(handle);
        let first = desktop.toggle_debug_log().unwrap();
        assert!(desktop.document().get(first).unwrap().is_visible());
        let again = desktop.toggle_debug_log().unwrap();
        assert_eq!(first, again);
        assert!(!desktop.document().get(first).unwrap().is_visible());
        desktop.toggle_debug_log();
        assert!(desktop.document().get(first).unwrap().is_visible());
        assert_eq!(desktop.document().len(), 1);
    }

    #[test]
    fn debug_log_without_handle_is_noop() {
        let mut desktop = Desktop::new(Storage::in_memory());
        assert_eq!(desktop.toggle_debug_log(), None);
        assert!(desktop.document().is_empty());
    }

    #[test]
    fn dock_click_launches_chat() {
        let mut desktop = Desktop::new(Storage::in_memory());
        let buffer = render(&mut desktop);
        let row = buffer_row(&buffer, AREA.height - 1);
        let column = row.find("Chat").expect("chat launcher drawn") as u16;
        assert!(desktop.handle_event(&press(column, AREA.height - 1), AREA));
        let id = desktop.document().focused().expect("chat panel");
        assert_eq!(desktop.kind_of(id), Some(Action::LaunchChat));
    }

    #[test]
    fn close_button_hides_panel_through_dispatcher() {
        let mut desktop = Desktop::new(Storage::in_memory());
        let id = desktop.launch_tasks();
        let rect = desktop.document().get(id).unwrap().rect();
        let column = (rect.x + rect.width as i32 - 3) as u16;
        let row = (rect.y + 1) as u16;
        assert!(desktop.handle_event(&press(column, row), AREA));
        assert!(!desktop.document().get(id).unwrap().is_visible());
    }

    #[test]
    fn welcome_text_shows_on_an_empty_desktop() {
        let mut desktop = Desktop::new(Storage::in_memory());
        let buffer = render(&mut desktop);
        let text: String = (0..AREA.height).map(|y| buffer_row(&buffer, y)).collect();
        assert!(text.contains("term-desk"));

        desktop.launch_tasks();
        let buffer = render(&mut desktop);
        let text: String = (0..AREA.height).map(|y| buffer_row(&buffer, y)).collect();
        assert!(!text.contains("Ctrl+Q quits"));
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn release_swallowed_by_an_overlay_still_ends_the_drag() {
        let mut desktop = Desktop::new(Storage::in_memory());
        let id = desktop.launch_tasks();
        let (x, y) = desktop.document().get(id).unwrap().position();
        let header = (x as u16 + 3, y as u16 + 1);
        desktop.handle_event(&mouse(MouseEventKind::Down(MouseButton::Left), header.0, header.1), AREA);
        assert!(desktop.window_manager().is_dragging(PointerId::PRIMARY));

        // the quit dialog opens mid-drag and takes the release
        desktop.handle_event(&ctrl('q'), AREA);
        desktop.handle_event(&mouse(MouseEventKind::Up(MouseButton::Left), header.0, header.1), AREA);
        assert!(!desktop.window_manager().is_dragging(PointerId::PRIMARY));
        desktop.handle_event(&key(KeyCode::Esc), AREA);

        desktop.handle_event(
            &mouse(MouseEventKind::Drag(MouseButton::Left), header.0 + 10, header.1 + 5),
            AREA,
        );
        assert_eq!(desktop.document().get(id).unwrap().position(), (x, y));
    }

    #[test]
    fn focus_loss_under_the_picker_releases_drags() {
        let mut desktop = Desktop::new(Storage::in_memory());
        let id = desktop.launch_chat();
        let (x, y) = desktop.document().get(id).unwrap().position();
        desktop.handle_event(
            &mouse(MouseEventKind::Down(MouseButton::Left), x as u16 + 2, y as u16),
            AREA,
        );
        assert_eq!(desktop.window_manager().active_drags(), 1);
        desktop.handle_event(&key(KeyCode::F(2)), AREA);
        assert!(desktop.picker_visible());
        desktop.handle_event(&Event::FocusLost, AREA);
        assert_eq!(desktop.window_manager().active_drags(), 0);
    }

    #[test]
    fn dock_click_mid_drag_ends_the_drag() {
        let mut desktop = Desktop::new(Storage::in_memory());
        let buffer = render(&mut desktop);
        let row = buffer_row(&buffer, AREA.height - 1);
        let column = row.find("Tasks").expect("tasks launcher drawn") as u16;
        let id = desktop.launch_chat();
        let (x, y) = desktop.document().get(id).unwrap().position();
        desktop.handle_event(
            &mouse(MouseEventKind::Down(MouseButton::Left), x as u16 + 2, y as u16 + 1),
            AREA,
        );
        assert!(desktop.handle_event(
            &mouse(MouseEventKind::Down(MouseButton::Left), column, AREA.height - 1),
            AREA
        ));
        assert_eq!(desktop.window_manager().active_drags(), 0);
    }
}
