//! UiFrame: a thin wrapper around a ratatui buffer that clamps drawing to the
//! visible area.
//!
//! Panels render into an offscreen buffer the size of the panel and are then
//! composited onto the terminal with [`UiFrame::blit_from_signed`], which
//! copes with panels dragged partially past the top-left edge.
use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::Widget;

use crate::layout::FloatRect;

pub struct UiFrame<'a> {
    area: Rect,
    buffer: &'a mut Buffer,
}

impl<'a> UiFrame<'a> {
    pub fn new(frame: &'a mut Frame<'_>) -> Self {
        let area = frame.area();
        let buffer = frame.buffer_mut();
        Self { area, buffer }
    }

    /// Construct a `UiFrame` directly from an area and buffer. Used for the
    /// offscreen panel buffers and by tests.
    pub fn from_parts(area: Rect, buffer: &'a mut Buffer) -> Self {
        Self { area, buffer }
    }

    pub fn area(&self) -> Rect {
        self.area
    }

    pub fn buffer_mut(&mut self) -> &mut Buffer {
        self.buffer
    }

    fn clip_rect(&self, rect: Rect) -> Option<Rect> {
        let clipped = rect.intersection(self.area);
        if clipped.width == 0 || clipped.height == 0 {
            None
        } else {
            Some(clipped)
        }
    }

    pub fn render_widget<W>(&mut self, widget: W, area: Rect)
    where
        W: Widget,
    {
        if let Some(clipped) = self.clip_rect(area) {
            widget.render(clipped, self.buffer);
        }
    }

    /// Write `text` at `(x, y)`, truncated to the frame width.
    pub fn set_string(&mut self, x: u16, y: u16, text: &str, style: Style) {
        let bounds = self.area;
        safe_set_string(self.buffer, bounds, x, y, text, style);
    }

    /// Copy an origin-anchored `src` buffer to `dest`, skipping cells that
    /// fall outside this frame.
    pub fn blit_from_signed(&mut self, src: &Buffer, dest: FloatRect) {
        let frame_x0 = self.area.x as i32;
        let frame_y0 = self.area.y as i32;
        let frame_x1 = frame_x0 + self.area.width as i32;
        let frame_y1 = frame_y0 + self.area.height as i32;
        for sy in 0..dest.height as i32 {
            let dy = dest.y + sy;
            if dy < frame_y0 || dy >= frame_y1 {
                continue;
            }
            for sx in 0..dest.width as i32 {
                let dx = dest.x + sx;
                if dx < frame_x0 || dx >= frame_x1 {
                    continue;
                }
                if let (Some(src_cell), Some(dst_cell)) = (
                    src.cell((sx as u16, sy as u16)),
                    self.buffer.cell_mut((dx as u16, dy as u16)),
                ) {
                    *dst_cell = src_cell.clone();
                }
            }
        }
    }
}

pub(crate) fn safe_set_string(
    buffer: &mut Buffer,
    bounds: Rect,
    x: u16,
    y: u16,
    text: &str,
    style: Style,
) {
    let bounds = bounds.intersection(buffer.area);
    if bounds.width == 0 || bounds.height == 0 {
        return;
    }
    let max_x = bounds.x.saturating_add(bounds.width);
    let max_y = bounds.y.saturating_add(bounds.height);
    if x < bounds.x || x >= max_x || y < bounds.y || y >= max_y {
        return;
    }
    let available = max_x.saturating_sub(x);
    let text = truncate_to_width(text, available as usize);
    buffer.set_string(x, y, text, style);
}

pub(crate) fn truncate_to_width(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    value.chars().take(width).collect()
}

/// Read back one row of a buffer as plain text. Handy for render assertions.
pub fn buffer_row(buffer: &Buffer, y: u16) -> String {
    let area = buffer.area;
    (area.x..area.x.saturating_add(area.width))
        .filter_map(|x| buffer.cell((x, y)).map(|cell| cell.symbol().to_string()))
        .collect()
}
