//! Board size selection shown before a memory game starts.

use crossterm::event::{Event, KeyEvent, MouseButton, MouseEventKind};
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::Paragraph;

use crate::components::{Component, ComponentContext, DialogOverlay};
use crate::keybindings::{Action, KeyBindings};
use crate::layout::rect_contains;
use crate::ui::UiFrame;

const PROMPT: &str = "Choose a board size";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardSize {
    pub rows: u16,
    pub cols: u16,
}

impl BoardSize {
    pub const OPTIONS: [BoardSize; 3] = [
        BoardSize { rows: 2, cols: 2 },
        BoardSize { rows: 2, cols: 4 },
        BoardSize { rows: 4, cols: 4 },
    ];

    pub fn label(&self) -> String {
        format!("{}x{}", self.rows, self.cols)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerOutcome {
    Selected(BoardSize),
    Cancelled,
}

#[derive(Debug)]
pub struct SizePickerComponent {
    dialog: DialogOverlay,
    keys: KeyBindings,
    visible: bool,
    selected: usize,
    option_rects: Vec<Rect>,
}

impl Default for SizePickerComponent {
    fn default() -> Self {
        Self::new()
    }
}

impl SizePickerComponent {
    pub fn new() -> Self {
        Self {
            dialog: DialogOverlay::picker("Memory Game"),
            keys: KeyBindings::default(),
            visible: false,
            selected: 0,
            option_rects: Vec::new(),
        }
    }

    pub fn open(&mut self) {
        self.visible = true;
        self.selected = 0;
    }

    pub fn close(&mut self) {
        self.visible = false;
        self.option_rects.clear();
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    pub fn selected(&self) -> BoardSize {
        BoardSize::OPTIONS[self.selected]
    }

    fn step(&mut self, delta: isize) {
        let len = BoardSize::OPTIONS.len() as isize;
        self.selected = (self.selected as isize + delta).rem_euclid(len) as usize;
    }

    fn handle_key(&mut self, key: &KeyEvent) -> Option<PickerOutcome> {
        if self.keys.matches(Action::MenuLeft, key) || self.keys.matches(Action::MenuUp, key) {
            self.step(-1);
            None
        } else if self.keys.matches(Action::MenuRight, key)
            || self.keys.matches(Action::MenuDown, key)
        {
            self.step(1);
            None
        } else if self.keys.matches(Action::MenuSelect, key) {
            Some(PickerOutcome::Selected(self.selected()))
        } else if self.keys.matches(Action::MenuCancel, key) {
            Some(PickerOutcome::Cancelled)
        } else {
            None
        }
    }

    /// Resolve an event into a choice, if it makes one.
    pub fn handle_picker_event(&mut self, event: &Event) -> Option<PickerOutcome> {
        if !self.visible {
            return None;
        }
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
                let index = self
                    .option_rects
                    .iter()
                    .position(|rect| rect_contains(*rect, mouse.column, mouse.row))?;
                self.selected = index;
                Some(PickerOutcome::Selected(self.selected()))
            }
            _ => None,
        }
    }
}

impl Component for SizePickerComponent {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, _ctx: &ComponentContext) {
        self.option_rects.clear();
        if !self.visible {
            return;
        }
        let Some(layout) = self.dialog.draw(frame, area) else {
            return;
        };
        let prompt = Paragraph::new(PROMPT)
            .alignment(Alignment::Center)
            .style(Style::default().fg(crate::theme::dialog_fg()));
        frame.render_widget(prompt, Rect { height: 1, ..layout.body });
        let y = layout.footer.y;
        let labels: Vec<String> = BoardSize::OPTIONS
            .iter()
            .map(|size| format!("[ {} ]", size.label()))
            .collect();
        let total: usize = labels.iter().map(|l| l.len()).sum::<usize>() + labels.len() - 1;
        let mut x = layout.footer.x + layout.footer.width.saturating_sub(total as u16) / 2;
        for (index, label) in labels.iter().enumerate() {
            let style = if index == self.selected {
                Style::default()
                    .bg(crate::theme::menu_selected_bg())
                    .fg(crate::theme::menu_selected_fg())
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
                    .bg(crate::theme::menu_bg())
                    .fg(crate::theme::menu_fg())
            };
            frame.set_string(x, y, label, style);
            self.option_rects
                .push(Rect::new(x, y, label.len() as u16, 1).intersection(area));
            x += label.len() as u16 + 1;
        }
    }

    fn handle_event(&mut self, event: &Event, _ctx: &ComponentContext) -> bool {
        self.visible && (self.handle_picker_event(event).is_some() || matches!(event, Event::Key(_)))
    }
}
