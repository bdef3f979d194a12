//! Panel chrome: border, header bar and close button.
//!
//! Decorators paint into a panel's offscreen buffer, so every rect they see is
//! panel-local with the origin at the top-left border cell.

use ratatui::prelude::Rect;
use ratatui::style::{Modifier, Style};

use crate::layout::rect_contains;
use crate::ui::{UiFrame, safe_set_string};

/// What a press on the panel chrome should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderAction {
    Close,
    Drag,
    None,
}

pub trait WindowDecorator: std::fmt::Debug {
    fn render_window(&self, frame: &mut UiFrame<'_>, area: Rect, title: &str, focused: bool);

    /// Classify a panel-local cell.
    fn hit_test(&self, area: Rect, column: u16, row: u16) -> HeaderAction;

    /// The region left for the panel's content.
    fn content_area(&self, area: Rect) -> Rect;
}

const CLOSE_LABEL: &str = "[x]";
const HEADER_ROWS: u16 = 2;

#[derive(Debug, Default)]
pub struct DefaultDecorator;

impl DefaultDecorator {
    pub fn close_button(&self, area: Rect) -> Option<Rect> {
        let label = CLOSE_LABEL.len() as u16;
        if area.width < label + 4 || area.height < HEADER_ROWS {
            return None;
        }
        Some(Rect {
            x: area.x + area.width - label - 1,
            y: area.y + 1,
            width: label,
            height: 1,
        })
    }

    fn header(&self, area: Rect) -> Rect {
        Rect {
            x: area.x,
            y: area.y,
            width: area.width,
            height: area.height.min(HEADER_ROWS),
        }
    }
}

impl WindowDecorator for DefaultDecorator {
    fn render_window(&self, frame: &mut UiFrame<'_>, area: Rect, title: &str, focused: bool) {
        if area.width < 2 || area.height < 2 {
            return;
        }
        let bounds = frame.area();
        let buffer = frame.buffer_mut();

        let header_style = if focused {
            Style::default()
                .bg(crate::theme::decorator_header_bg())
                .fg(crate::theme::decorator_header_fg())
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
                .bg(crate::theme::decorator_inactive_bg())
                .fg(crate::theme::decorator_header_fg())
        };
        let border_style = Style::default().fg(crate::theme::decorator_border());

        let left = area.x;
        let top = area.y;
        let right = area.x + area.width - 1;
        let bottom = area.y + area.height - 1;
        let header_y = top + 1;

        for x in left..=right {
            let (top_symbol, bottom_symbol) = if x == left {
                ("┌", "└")
            } else if x == right {
                ("┐", "┘")
            } else {
                ("─", "─")
            };
            if let Some(cell) = buffer.cell_mut((x, top)) {
                cell.set_symbol(top_symbol);
                cell.set_style(border_style);
            }
            if bottom > header_y
                && let Some(cell) = buffer.cell_mut((x, bottom))
            {
                cell.set_symbol(bottom_symbol);
                cell.set_style(border_style);
            }
        }
        for y in header_y..bottom.max(header_y + 1) {
            for x in [left, right] {
                if let Some(cell) = buffer.cell_mut((x, y)) {
                    cell.set_symbol("│");
                    cell.set_style(border_style);
                }
            }
        }

        // Header bar
        if header_y < top + area.height {
            for x in left + 1..right {
                if let Some(cell) = buffer.cell_mut((x, header_y)) {
                    cell.set_symbol(" ");
                    cell.set_style(header_style);
                }
            }
            let close = self.close_button(area);
            let reserved = close.map_or(0, |rect| rect.width + 1);
            let header_width = area.width.saturating_sub(2).saturating_sub(reserved);
            let title_len = title.chars().count() as u16;
            let start_x = if title_len <= header_width {
                left + 1 + (header_width - title_len) / 2
            } else {
                left + 1
            };
            let title_bounds = Rect {
                x: left + 1,
                y: header_y,
                width: header_width,
                height: 1,
            }
            .intersection(bounds);
            safe_set_string(buffer, title_bounds, start_x, header_y, title, header_style);

            if let Some(rect) = close {
                let close_style = header_style.fg(crate::theme::decorator_close_fg());
                safe_set_string(buffer, bounds, rect.x, rect.y, CLOSE_LABEL, close_style);
            }
        }
    }

    fn hit_test(&self, area: Rect, column: u16, row: u16) -> HeaderAction {
        if let Some(close) = self.close_button(area)
            && rect_contains(close, column, row)
        {
            return HeaderAction::Close;
        }
        if rect_contains(self.header(area), column, row) {
            HeaderAction::Drag
        } else {
            HeaderAction::None
        }
    }

    fn content_area(&self, area: Rect) -> Rect {
        Rect {
            x: area.x.saturating_add(1),
            y: area.y.saturating_add(HEADER_ROWS),
            width: area.width.saturating_sub(2),
            height: area.height.saturating_sub(HEADER_ROWS + 1),
        }
    }
}
