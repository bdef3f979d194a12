//! Task list with a current and a completed section, persisted under
//! [`TASKS_KEY`].

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind,
};
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::components::{Component, ComponentContext};
use crate::layout::rect_contains;
use crate::storage::Storage;
use crate::ui::{UiFrame, truncate_to_width};
use crate::window::PanelId;

pub const TASKS_KEY: &str = "tasks";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub text: String,
    #[serde(default)]
    pub completed: bool,
}

/// Which part of the panel receives keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskFocus {
    Input,
    Current,
    Completed,
}

#[derive(Debug, Clone)]
struct EditState {
    index: usize,
    buffer: String,
}

pub struct TaskManager {
    panel: PanelId,
    storage: Storage,
    tasks: Vec<Task>,
    input: String,
    focus: TaskFocus,
    selected: usize,
    editing: Option<EditState>,
    row_hits: Vec<(Rect, TaskFocus, usize)>,
}

impl TaskManager {
    pub fn new(panel: PanelId, storage: Storage) -> Self {
        let tasks: Vec<Task> = storage.get_json(TASKS_KEY).unwrap_or_default();
        debug!(panel = %panel, tasks = tasks.len(), "task manager loaded");
        Self {
            panel,
            storage,
            tasks,
            input: String::new(),
            focus: TaskFocus::Input,
            selected: 0,
            editing: None,
            row_hits: Vec::new(),
        }
    }

    pub fn panel(&self) -> PanelId {
        self.panel
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Indices into [`Self::tasks`] of the unfinished tasks, in list order.
    pub fn current(&self) -> Vec<usize> {
        self.indices(false)
    }

    pub fn completed(&self) -> Vec<usize> {
        self.indices(true)
    }

    fn indices(&self, completed: bool) -> Vec<usize> {
        self.tasks
            .iter()
            .enumerate()
            .filter(|(_, t)| t.completed == completed)
            .map(|(i, _)| i)
            .collect()
    }

    pub fn focus(&self) -> TaskFocus {
        self.focus
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    /// Append a task. Blank text is rejected.
    pub fn add(&mut self, text: &str) -> bool {
        let text = text.trim();
        if text.is_empty() {
            return false;
        }
        self.tasks.push(Task {
            text: text.to_string(),
            completed: false,
        });
        self.persist();
        true
    }

    pub fn begin_edit(&mut self, index: usize) -> bool {
        let Some(task) = self.tasks.get(index) else {
            return false;
        };
        self.editing = Some(EditState {
            index,
            buffer: task.text.clone(),
        });
        true
    }

    pub fn edit_buffer_mut(&mut self) -> Option<&mut String> {
        self.editing.as_mut().map(|e| &mut e.buffer)
    }

    /// Store the edited text. A blank edit leaves the task unchanged.
    pub fn commit_edit(&mut self) -> bool {
        let Some(edit) = self.editing.take() else {
            return false;
        };
        let text = edit.buffer.trim();
        match self.tasks.get_mut(edit.index) {
            Some(task) if !text.is_empty() => {
                task.text = text.to_string();
                self.persist();
                true
            }
            _ => false,
        }
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    pub fn delete(&mut self, index: usize) -> Option<Task> {
        if index >= self.tasks.len() {
            return None;
        }
        self.editing = None;
        let removed = self.tasks.remove(index);
        self.persist();
        self.clamp_selection();
        Some(removed)
    }

    /// Move a task to the end of the completed or current list.
    pub fn set_completed(&mut self, index: usize, completed: bool) -> bool {
        if index >= self.tasks.len() {
            return false;
        }
        self.editing = None;
        let mut task = self.tasks.remove(index);
        task.completed = completed;
        self.tasks.push(task);
        self.persist();
        self.clamp_selection();
        true
    }

    fn persist(&self) {
        self.storage.set_json(TASKS_KEY, &self.tasks);
    }

    fn visible_list(&self) -> Vec<usize> {
        match self.focus {
            TaskFocus::Input => Vec::new(),
            TaskFocus::Current => self.current(),
            TaskFocus::Completed => self.completed(),
        }
    }

    fn selected_task(&self) -> Option<usize> {
        self.visible_list().get(self.selected).copied()
    }

    fn clamp_selection(&mut self) {
        let len = self.visible_list().len();
        self.selected = self.selected.min(len.saturating_sub(1));
    }

    fn cycle_focus(&mut self) {
        self.focus = match self.focus {
            TaskFocus::Input => TaskFocus::Current,
            TaskFocus::Current => TaskFocus::Completed,
            TaskFocus::Completed => TaskFocus::Input,
        };
        self.selected = 0;
    }

    fn handle_key(&mut self, key: &KeyEvent) -> bool {
        if key.kind == KeyEventKind::Release || key.modifiers.contains(KeyModifiers::CONTROL) {
            return false;
        }
        if let Some(edit) = self.editing.as_mut() {
            match key.code {
                KeyCode::Char(ch) => edit.buffer.push(ch),
                KeyCode::Backspace => {
                    edit.buffer.pop();
                }
                KeyCode::Enter => {
                    self.commit_edit();
                }
                KeyCode::Esc => self.cancel_edit(),
                _ => return false,
            }
            return true;
        }
        if key.code == KeyCode::Tab {
            self.cycle_focus();
            return true;
        }
        match self.focus {
            TaskFocus::Input => match key.code {
                KeyCode::Char(ch) => self.input.push(ch),
                KeyCode::Backspace => {
                    self.input.pop();
                }
                KeyCode::Enter => {
                    let text = std::mem::take(&mut self.input);
                    if !self.add(&text) {
                        self.input = text;
                    }
                }
                _ => return false,
            },
            TaskFocus::Current | TaskFocus::Completed => {
                let len = self.visible_list().len();
                match key.code {
                    KeyCode::Up => self.selected = self.selected.saturating_sub(1),
                    KeyCode::Down => {
                        self.selected = (self.selected + 1).min(len.saturating_sub(1))
                    }
                    KeyCode::Char(' ') => {
                        if let Some(index) = self.selected_task() {
                            let done = self.focus == TaskFocus::Current;
                            self.set_completed(index, done);
                        }
                    }
                    KeyCode::Char('e') => {
                        if let Some(index) = self.selected_task() {
                            self.begin_edit(index);
                        }
                    }
                    KeyCode::Char('d') | KeyCode::Delete => {
                        if let Some(index) = self.selected_task() {
                            self.delete(index);
                        }
                    }
                    _ => return false,
                }
            }
        }
        true
    }

    fn render_list(
        &mut self,
        frame: &mut UiFrame<'_>,
        area: Rect,
        y: &mut u16,
        list: TaskFocus,
        focused: bool,
    ) {
        let bottom = area.y + area.height;
        let (heading, indices) = match list {
            TaskFocus::Completed => ("Completed Tasks", self.completed()),
            _ => ("Current Tasks", self.current()),
        };
        let width = area.width as usize;
        if *y < bottom {
            let style = Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
            frame.set_string(area.x, *y, heading, style);
            *y += 1;
        }
        for (pos, index) in indices.into_iter().enumerate() {
            if *y >= bottom {
                break;
            }
            let task = &self.tasks[index];
            let mark = if task.completed { "[x]" } else { "[ ]" };
            let text = match &self.editing {
                Some(edit) if edit.index == index => format!("{}_", edit.buffer),
                _ => task.text.clone(),
            };
            let mut style = if task.completed {
                Style::default()
                    .fg(crate::theme::task_completed_fg())
                    .add_modifier(Modifier::CROSSED_OUT)
            } else {
                Style::default()
            };
            if focused && self.focus == list && self.selected == pos {
                style = style.add_modifier(Modifier::REVERSED);
            }
            let line = truncate_to_width(&format!("{mark} {text}"), width);
            frame.set_string(area.x, *y, &line, style);
            self.row_hits
                .push((Rect::new(area.x, *y, area.width, 1), list, pos));
            *y += 1;
        }
    }
}

impl Component for TaskManager {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, ctx: &ComponentContext) {
        self.row_hits.clear();
        if area.width == 0 || area.height < 2 {
            return;
        }
        let width = area.width as usize;
        let input_style = if ctx.focused() && self.focus == TaskFocus::Input {
            Style::default().add_modifier(Modifier::REVERSED)
        } else {
            Style::default()
        };
        let input = truncate_to_width(&format!("Add Task: {}", self.input), width);
        frame.set_string(area.x, area.y, &input, input_style);

        let mut y = area.y + 2;
        self.render_list(frame, area, &mut y, TaskFocus::Current, ctx.focused());
        y += 1;
        self.render_list(frame, area, &mut y, TaskFocus::Completed, ctx.focused());

        let hint = "Tab switch  Space done  e edit  d delete";
        let footer = area.y + area.height - 1;
        if y <= footer {
            let style = Style::default().fg(crate::theme::chat_system_fg());
            frame.set_string(area.x, footer, &truncate_to_width(hint, width), style);
        }
    }

    fn handle_event(&mut self, event: &Event, _ctx: &ComponentContext) -> bool {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Paste(text) if self.editing.is_none() && self.focus == TaskFocus::Input => {
                self.input.push_str(text.trim_end_matches(['\r', '\n']));
                true
            }
            Event::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
                let hit = self
                    .row_hits
                    .iter()
                    .find(|(rect, _, _)| rect_contains(*rect, mouse.column, mouse.row))
                    .map(|(_, list, pos)| (*list, *pos));
                match hit {
                    Some((list, pos)) => {
                        self.focus = list;
                        self.selected = pos;
                        true
                    }
                    None => false,
                }
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn press(tm: &mut TaskManager, codes: &[KeyCode]) {
        let ctx = ComponentContext::new(true);
        for code in codes {
            tm.handle_event(&key(*code), &ctx);
        }
    }

    fn type_text(tm: &mut TaskManager, text: &str) {
        let codes: Vec<KeyCode> = text.chars().map(KeyCode::Char).collect();
        press(tm, &codes);
    }

    #[test]
    fn add_trims_and_rejects_blank() {
        let storage = Storage::in_memory();
        let mut tm = TaskManager::new(PanelId::new(1), storage.clone());
        assert!(!tm.add("   "));
        assert!(tm.add("  write docs "));
        assert_eq!(tm.tasks()[0].text, "write docs");
        let stored: Vec<Task> = storage.get_json(TASKS_KEY).unwrap();
        assert_eq!(stored, tm.tasks());
    }

    #[test]
    fn completion_flag_is_persisted() {
        let storage = Storage::in_memory();
        let mut tm = TaskManager::new(PanelId::new(1), storage.clone());
        tm.add("a");
        tm.add("b");
        assert!(tm.set_completed(0, true));
        assert_eq!(tm.current(), vec![0]);
        assert_eq!(tm.tasks()[1], Task { text: "a".into(), completed: true });

        let reloaded = TaskManager::new(PanelId::new(2), storage);
        assert_eq!(reloaded.completed().len(), 1);
        assert_eq!(reloaded.tasks()[reloaded.completed()[0]].text, "a");
    }

    #[test]
    fn delete_is_persisted() {
        let storage = Storage::in_memory();
        let mut tm = TaskManager::new(PanelId::new(1), storage.clone());
        tm.add("a");
        tm.add("b");
        assert_eq!(tm.delete(0).map(|t| t.text), Some("a".to_string()));
        assert!(tm.delete(5).is_none());
        let stored: Vec<Task> = storage.get_json(TASKS_KEY).unwrap();
        assert_eq!(stored.len(), 1);
    }

    #[test]
    fn edit_commits_trimmed_text_and_blank_is_ignored() {
        let mut tm = TaskManager::new(PanelId::new(1), Storage::in_memory());
        tm.add("draft");
        assert!(tm.begin_edit(0));
        if let Some(buffer) = tm.edit_buffer_mut() {
            *buffer = " final ".into();
        }
        assert!(tm.commit_edit());
        assert_eq!(tm.tasks()[0].text, "final");

        tm.begin_edit(0);
        if let Some(buffer) = tm.edit_buffer_mut() {
            buffer.clear();
        }
        assert!(!tm.commit_edit());
        assert_eq!(tm.tasks()[0].text, "final");
        assert!(!tm.is_editing());
    }

    #[test]
    fn corrupt_storage_starts_empty() {
        let storage = Storage::in_memory();
        storage.set(TASKS_KEY, "[{oops");
        let tm = TaskManager::new(PanelId::new(1), storage);
        assert!(tm.tasks().is_empty());
    }

    #[test]
    fn missing_completed_field_defaults_to_false() {
        let storage = Storage::in_memory();
        storage.set(TASKS_KEY, r#"[{"text":"legacy"}]"#);
        let tm = TaskManager::new(PanelId::new(1), storage);
        assert_eq!(tm.current(), vec![0]);
    }

    #[test]
    fn keyboard_flow() {
        let mut tm = TaskManager::new(PanelId::new(1), Storage::in_memory());
        type_text(&mut tm, "one");
        press(&mut tm, &[KeyCode::Enter]);
        type_text(&mut tm, "two");
        press(&mut tm, &[KeyCode::Enter]);
        assert_eq!(tm.current().len(), 2);
        assert_eq!(tm.input(), "");

        // complete "two", then rename "one"
        press(&mut tm, &[KeyCode::Tab, KeyCode::Down, KeyCode::Char(' ')]);
        assert_eq!(tm.focus(), TaskFocus::Current);
        assert_eq!(tm.completed().len(), 1);
        press(&mut tm, &[KeyCode::Char('e'), KeyCode::Backspace, KeyCode::Backspace]);
        press(&mut tm, &[KeyCode::Backspace]);
        type_text(&mut tm, "uno");
        press(&mut tm, &[KeyCode::Enter]);
        assert_eq!(tm.tasks()[tm.current()[0]].text, "uno");

        // back to current from the completed list, then delete it
        press(&mut tm, &[KeyCode::Tab, KeyCode::Char(' ')]);
        assert_eq!(tm.completed().len(), 0);
        press(&mut tm, &[KeyCode::Tab, KeyCode::Tab, KeyCode::Char('d')]);
        assert_eq!(tm.tasks().len(), 1);
    }
}
