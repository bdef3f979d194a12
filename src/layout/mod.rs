use ratatui::prelude::Rect;

/// Signed floating rectangle origin with unsigned size.
///
/// Panels may be dragged partially off screen, so the origin is signed while
/// the size stays a terminal cell count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FloatRect {
    pub x: i32,
    pub y: i32,
    pub width: u16,
    pub height: u16,
}

impl FloatRect {
    pub const fn new(x: i32, y: i32, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn contains(&self, column: u16, row: u16) -> bool {
        self.local(column, row).is_some()
    }

    /// Translate a screen cell into coordinates relative to this rect's origin.
    pub fn local(&self, column: u16, row: u16) -> Option<(u16, u16)> {
        if self.width == 0 || self.height == 0 {
            return None;
        }
        let dx = column as i32 - self.x;
        let dy = row as i32 - self.y;
        if dx < 0 || dy < 0 || dx >= self.width as i32 || dy >= self.height as i32 {
            return None;
        }
        Some((dx as u16, dy as u16))
    }

    pub fn translate(&mut self, dx: i32, dy: i32) {
        self.x = self.x.saturating_add(dx);
        self.y = self.y.saturating_add(dy);
    }

    pub fn origin(&self) -> (i32, i32) {
        (self.x, self.y)
    }
}

pub fn rect_contains(rect: Rect, column: u16, row: u16) -> bool {
    if rect.width == 0 || rect.height == 0 {
        return false;
    }
    let max_x = rect.x.saturating_add(rect.width);
    let max_y = rect.y.saturating_add(rect.height);
    column >= rect.x && column < max_x && row >= rect.y && row < max_y
}

/// The part of `rect` that lands inside `bounds`, or an empty rect.
pub fn float_rect_visible(rect: FloatRect, bounds: Rect) -> Rect {
    let bounds_x0 = bounds.x as i32;
    let bounds_y0 = bounds.y as i32;
    let bounds_x1 = bounds_x0 + bounds.width as i32;
    let bounds_y1 = bounds_y0 + bounds.height as i32;
    let x0 = rect.x.max(bounds_x0);
    let y0 = rect.y.max(bounds_y0);
    let x1 = (rect.x + rect.width as i32).min(bounds_x1);
    let y1 = (rect.y + rect.height as i32).min(bounds_y1);
    if x1 <= x0 || y1 <= y0 {
        return Rect::default();
    }
    Rect {
        x: x0 as u16,
        y: y0 as u16,
        width: (x1 - x0) as u16,
        height: (y1 - y0) as u16,
    }
}

/// Center a `width` x `height` box inside `area`, shrinking it to fit.
pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x.saturating_add(area.width.saturating_sub(width) / 2),
        y: area.y.saturating_add(area.height.saturating_sub(height) / 2),
        width,
        height,
    }
}
