//! The launcher strip along the bottom row of the desktop.

use crossterm::event::{Event, MouseButton, MouseEventKind};
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};

use crate::components::{Component, ComponentContext};
use crate::keybindings::{Action, KeyBindings};
use crate::layout::rect_contains;
use crate::ui::{UiFrame, safe_set_string, truncate_to_width};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DockItem {
    pub action: Action,
    pub label: String,
    pub running: bool,
}

pub struct Dock {
    items: Vec<DockItem>,
    hits: Vec<(Rect, Action)>,
    right: String,
    pressed: Option<Action>,
}

impl Dock {
    pub fn new(keys: &KeyBindings) -> Self {
        let items = [
            Action::LaunchMemory,
            Action::LaunchChat,
            Action::LaunchTasks,
            Action::ToggleDebugLog,
        ]
        .into_iter()
        .map(|action| {
            let combo = keys.combos_for(action).join("/");
            DockItem {
                action,
                label: format!("[{combo} {action}]"),
                running: false,
            }
        })
        .collect();
        Self {
            items,
            hits: Vec::new(),
            right: String::new(),
            pressed: None,
        }
    }

    pub fn items(&self) -> &[DockItem] {
        &self.items
    }

    /// Mark which launchers currently have an open panel.
    pub fn set_running(&mut self, action: Action, running: bool) {
        if let Some(item) = self.items.iter_mut().find(|i| i.action == action) {
            item.running = running;
        }
    }

    pub fn set_right<T: Into<String>>(&mut self, value: T) {
        self.right = value.into();
    }

    /// The launcher under a screen cell, as of the last render.
    pub fn item_at(&self, column: u16, row: u16) -> Option<Action> {
        self.hits
            .iter()
            .find(|(rect, _)| rect_contains(*rect, column, row))
            .map(|(_, action)| *action)
    }

    /// Take the launcher activated by the last handled click.
    pub fn take_pressed(&mut self) -> Option<Action> {
        self.pressed.take()
    }
}

impl Component for Dock {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, _ctx: &ComponentContext) {
        self.hits.clear();
        if area.height == 0 || area.width == 0 {
            return;
        }
        let y = area.y;
        let width = area.width as usize;
        let base = Style::default()
            .bg(crate::theme::dock_bg())
            .fg(crate::theme::dock_fg());
        let buffer = frame.buffer_mut();
        let bounds = area.intersection(buffer.area);
        if bounds.width == 0 || bounds.height == 0 {
            return;
        }
        safe_set_string(buffer, bounds, area.x, y, &" ".repeat(width), base);

        let mut x = area.x;
        let max_x = area.x.saturating_add(area.width);
        for item in &self.items {
            if x >= max_x {
                break;
            }
            let style = if item.running {
                base.fg(crate::theme::dock_running_fg())
                    .add_modifier(Modifier::BOLD)
            } else {
                base
            };
            safe_set_string(buffer, bounds, x, y, &item.label, style);
            let label_width = (item.label.chars().count() as u16).min(max_x - x);
            self.hits
                .push((Rect::new(x, y, label_width, 1), item.action));
            x = x.saturating_add(label_width + 1);
        }

        if !self.right.is_empty() {
            let used = (x - area.x) as usize;
            let room = width.saturating_sub(used);
            let right = truncate_to_width(&self.right, room);
            let right_width = right.chars().count();
            if right_width > 0 {
                let start_x = area.x.saturating_add((width - right_width) as u16);
                safe_set_string(buffer, bounds, start_x, y, &right, base);
            }
        }
    }

    fn handle_event(&mut self, event: &Event, _ctx: &ComponentContext) -> bool {
        let Event::Mouse(mouse) = event else {
            return false;
        };
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return false;
        }
        self.pressed = self.item_at(mouse.column, mouse.row);
        self.pressed.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::buffer_row;
    use crossterm::event::{KeyModifiers, MouseEvent};
    use ratatui::buffer::Buffer;

    #[test]
    fn renders_launchers_and_reports_clicks() {
        let mut dock = Dock::new(&KeyBindings::default());
        dock.set_right("Ctrl+Q quit");
        let area = Rect::new(0, 9, 80, 1);
        let mut buffer = Buffer::empty(Rect::new(0, 0, 80, 10));
        let mut frame = UiFrame::from_parts(area, &mut buffer);
        dock.render(&mut frame, area, &ComponentContext::default());

        let row = buffer_row(&buffer, 9);
        assert!(row.starts_with("[F2 Memory game] [F3 Chat] [F4 Tasks] [F12 Debug log]"));
        assert!(row.trim_end().ends_with("Ctrl+Q quit"));

        let column = "[F2 Memory game] [F3 ".len() as u16;
        let click = Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row: 9,
            modifiers: KeyModifiers::NONE,
        });
        assert!(dock.handle_event(&click, &ComponentContext::default()));
        assert_eq!(dock.take_pressed(), Some(Action::LaunchChat));
        assert_eq!(dock.take_pressed(), None);
    }

    #[test]
    fn running_flag_is_tracked() {
        let mut dock = Dock::new(&KeyBindings::default());
        dock.set_running(Action::LaunchTasks, true);
        assert!(dock.items().iter().any(|i| i.action == Action::LaunchTasks && i.running));
    }
}
