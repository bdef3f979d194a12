use crossterm::event::{Event, KeyEvent, MouseButton, MouseEventKind};
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Paragraph, Wrap};

use crate::components::{Component, ComponentContext, DialogOverlay};
use crate::keybindings::{Action, KeyBindings};
use crate::layout::rect_contains;
use crate::ui::{UiFrame, safe_set_string};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmAction {
    Confirm,
    Cancel,
}

/// Yes/no dialog. The desktop uses it to confirm quitting.
#[derive(Debug)]
pub struct ConfirmOverlayComponent {
    dialog: DialogOverlay,
    keys: KeyBindings,
    visible: bool,
    body: String,
    confirm_label: String,
    selected_confirm: bool,
    cancel_rect: Option<Rect>,
    confirm_rect: Option<Rect>,
}

impl Default for ConfirmOverlayComponent {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfirmOverlayComponent {
    pub fn new() -> Self {
        Self {
            dialog: DialogOverlay::confirm(""),
            keys: KeyBindings::default(),
            visible: false,
            body: String::new(),
            confirm_label: "[ OK ]".to_string(),
            selected_confirm: false,
            cancel_rect: None,
            confirm_rect: None,
        }
    }

    pub fn open(&mut self, title: &str, body: &str, confirm: &str) {
        self.dialog = DialogOverlay::confirm(title);
        self.visible = true;
        self.body = body.to_string();
        self.confirm_label = format!("[ {confirm} ]");
        self.selected_confirm = true;
    }

    pub fn close(&mut self) {
        self.visible = false;
        self.cancel_rect = None;
        self.confirm_rect = None;
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    fn handle_key(&mut self, key: &KeyEvent) -> Option<ConfirmAction> {
        if self.keys.matches(Action::ConfirmToggle, key) {
            self.selected_confirm = !self.selected_confirm;
            None
        } else if self.keys.matches(Action::ConfirmLeft, key) {
            self.selected_confirm = false;
            None
        } else if self.keys.matches(Action::ConfirmRight, key) {
            self.selected_confirm = true;
            None
        } else if self.keys.matches(Action::ConfirmAccept, key) {
            if self.selected_confirm {
                Some(ConfirmAction::Confirm)
            } else {
                Some(ConfirmAction::Cancel)
            }
        } else if self.keys.matches(Action::ConfirmCancel, key) {
            Some(ConfirmAction::Cancel)
        } else {
            None
        }
    }

    /// Resolve an event into a decision, if it makes one.
    pub fn handle_confirm_event(&mut self, event: &Event) -> Option<ConfirmAction> {
        match event {
            Event::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
                if self
                    .confirm_rect
                    .is_some_and(|rect| rect_contains(rect, mouse.column, mouse.row))
                {
                    return Some(ConfirmAction::Confirm);
                }
                if self
                    .cancel_rect
                    .is_some_and(|rect| rect_contains(rect, mouse.column, mouse.row))
                {
                    return Some(ConfirmAction::Cancel);
                }
                None
            }
            Event::Key(key) => self.handle_key(key),
            _ => None,
        }
    }
}

impl Component for ConfirmOverlayComponent {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, _ctx: &ComponentContext) {
        self.cancel_rect = None;
        self.confirm_rect = None;
        if !self.visible || area.width == 0 || area.height == 0 {
            return;
        }
        let Some(layout) = self.dialog.draw(frame, area) else {
            return;
        };
        let button_y = layout.footer.y;
        let paragraph = Paragraph::new(self.body.as_str())
            .alignment(Alignment::Left)
            .style(Style::default().fg(crate::theme::dialog_fg()))
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, layout.body);

        let buffer = frame.buffer_mut();
        let bounds = area.intersection(buffer.area);
        let cancel = "[ Cancel ]";
        let confirm = self.confirm_label.as_str();
        let selected_style = Style::default()
            .fg(crate::theme::decorator_header_fg())
            .bg(crate::theme::decorator_header_bg())
            .add_modifier(Modifier::BOLD);
        let unselected_style = Style::default()
            .fg(crate::theme::dialog_fg())
            .bg(crate::theme::menu_bg());
        let (cancel_style, confirm_style) = if self.selected_confirm {
            (unselected_style, selected_style)
        } else {
            (selected_style, unselected_style)
        };
        let total_width = cancel.len() + 1 + confirm.len();
        let start_x = layout
            .footer
            .x
            .saturating_add(layout.footer.width.saturating_sub(total_width as u16));
        safe_set_string(buffer, bounds, start_x, button_y, cancel, cancel_style);
        let confirm_x = start_x.saturating_add(cancel.len() as u16 + 1);
        safe_set_string(buffer, bounds, confirm_x, button_y, confirm, confirm_style);
        self.cancel_rect = Some(Rect::new(start_x, button_y, cancel.len() as u16, 1));
        self.confirm_rect = Some(Rect::new(confirm_x, button_y, confirm.len() as u16, 1));
    }

    fn handle_event(&mut self, event: &Event, _ctx: &ComponentContext) -> bool {
        if !self.visible {
            return false;
        }
        self.handle_confirm_event(event).is_some() || matches!(event, Event::Key(_))
    }
}
