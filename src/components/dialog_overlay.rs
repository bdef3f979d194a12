//! Modal frame shared by the size picker and the confirm dialog.
//!
//! The frame owns no visibility or input state. Its owner decides when to
//! draw it and fills the returned [`DialogLayout`] with its own content.

use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear};

use crate::layout::centered;
use crate::ui::UiFrame;

/// How a dialog picks its outer size from the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogSize {
    Fixed { width: u16, height: u16 },
    /// Width is a share of the screen, kept within `min..=max`.
    Proportional {
        percent: u16,
        min: u16,
        max: u16,
        height: u16,
    },
}

/// Where an owner draws inside a dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DialogLayout {
    pub outer: Rect,
    pub body: Rect,
    /// Single row at the bottom of the content area, for buttons or options.
    pub footer: Rect,
}

#[derive(Debug, Clone)]
pub struct DialogOverlay {
    title: String,
    size: DialogSize,
    separator: bool,
    dim_backdrop: bool,
}

impl DialogOverlay {
    /// Small fixed box with options along the bottom row.
    pub fn picker(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            size: DialogSize::Fixed {
                width: 36,
                height: 7,
            },
            separator: false,
            dim_backdrop: false,
        }
    }

    /// Screen-relative box over a dimmed desktop, buttons under a rule.
    pub fn confirm(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            size: DialogSize::Proportional {
                percent: 50,
                min: 30,
                max: 56,
                height: 8,
            },
            separator: true,
            dim_backdrop: true,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn rect_for(&self, area: Rect) -> Rect {
        let (width, height) = match self.size {
            DialogSize::Fixed { width, height } => (width, height),
            DialogSize::Proportional {
                percent,
                min,
                max,
                height,
            } => {
                let share = u32::from(area.width) * u32::from(percent) / 100;
                let share = u16::try_from(share).unwrap_or(u16::MAX);
                (share.clamp(min, max), height)
            }
        };
        centered(area, width, height)
    }

    /// Content regions for `area`, or `None` when the screen cannot hold a
    /// body row above the footer.
    pub fn layout(&self, area: Rect) -> Option<DialogLayout> {
        let outer = self.rect_for(area);
        let content = Rect {
            x: outer.x.saturating_add(2),
            y: outer.y.saturating_add(1),
            width: outer.width.saturating_sub(4),
            height: outer.height.saturating_sub(2),
        };
        let reserved = if self.separator { 2 } else { 1 };
        if content.width == 0 || content.height <= reserved {
            return None;
        }
        let footer = Rect {
            y: content.y + content.height - 1,
            height: 1,
            ..content
        };
        let body = Rect {
            height: content.height - reserved,
            ..content
        };
        Some(DialogLayout {
            outer,
            body,
            footer,
        })
    }

    pub fn draw(&self, frame: &mut UiFrame<'_>, area: Rect) -> Option<DialogLayout> {
        if self.dim_backdrop {
            let dim = Style::default().add_modifier(Modifier::DIM);
            let buffer = frame.buffer_mut();
            let region = area.intersection(buffer.area);
            for y in region.top()..region.bottom() {
                for x in region.left()..region.right() {
                    if let Some(cell) = buffer.cell_mut((x, y)) {
                        cell.set_style(dim);
                    }
                }
            }
        }
        let outer = self.rect_for(area);
        if outer.is_empty() {
            return None;
        }
        frame.render_widget(Clear, outer);
        let block = Block::default()
            .title(self.title.as_str())
            .borders(Borders::ALL)
            .style(
                Style::default()
                    .bg(crate::theme::dialog_bg())
                    .fg(crate::theme::dialog_fg()),
            );
        frame.render_widget(block, outer);

        let layout = self.layout(area)?;
        if self.separator {
            let rule = Style::default().fg(crate::theme::dialog_separator());
            let y = layout.footer.y - 1;
            let buffer = frame.buffer_mut();
            for x in layout.footer.left()..layout.footer.right() {
                if let Some(cell) = buffer.cell_mut((x, y)) {
                    cell.set_symbol("─");
                    cell.set_style(rule);
                }
            }
        }
        Some(layout)
    }
}
