use ratatui::buffer::Buffer;
use ratatui::layout::Rect;

use crate::components::ComponentContext;
use crate::layout::float_rect_visible;
use crate::ui::UiFrame;

use super::{Document, WindowDecorator};

/// Paint every visible panel bottom to top.
///
/// Each panel renders into its own buffer anchored at the origin, which is
/// then blitted at the panel's signed position. Panels dragged partly off
/// screen only lose the cells that fall outside the frame.
pub fn render_document(
    frame: &mut UiFrame<'_>,
    doc: &mut Document,
    decorator: &dyn WindowDecorator,
) {
    let focused = doc.focused();
    for id in doc.draw_order() {
        let Some(panel) = doc.get_mut(id) else {
            continue;
        };
        let rect = panel.rect();
        if float_rect_visible(rect, frame.area()).is_empty() {
            continue;
        }
        let local = Rect::new(0, 0, rect.width, rect.height);
        let mut offscreen = Buffer::empty(local);
        {
            let mut surface = UiFrame::from_parts(local, &mut offscreen);
            let is_focused = focused == Some(id);
            decorator.render_window(&mut surface, local, panel.title(), is_focused);
            let ctx = ComponentContext::new(is_focused).in_panel(id);
            let content = decorator.content_area(local);
            panel.render_content(&mut surface, content, &ctx);
        }
        frame.blit_from_signed(&offscreen, rect);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::buffer_row;
    use crate::window::{DefaultDecorator, WindowManager};

    #[test]
    fn upper_panel_covers_lower_panel() {
        let mut wm = WindowManager::new();
        let mut doc = Document::new();
        let mut lower = wm.create_panel("Lower", "lower body");
        lower.move_to(0, 0);
        lower.set_size(20, 6);
        let lower = doc.insert(lower);
        let mut upper = wm.create_panel("Upper", "upper body");
        upper.move_to(4, 2);
        upper.set_size(20, 6);
        let upper = doc.insert(upper);
        wm.open(&mut doc, lower);
        wm.open(&mut doc, upper);

        let area = Rect::new(0, 0, 30, 10);
        let mut buffer = Buffer::empty(area);
        let mut frame = UiFrame::from_parts(area, &mut buffer);
        render_document(&mut frame, &mut doc, &DefaultDecorator);

        assert!(buffer_row(&buffer, 1).contains("Lower"));
        assert!(buffer_row(&buffer, 3).contains("Upper"));
        assert!(buffer_row(&buffer, 4).contains("upper body"));
        assert!(!buffer_row(&buffer, 2).contains("lower body"));
    }

    #[test]
    fn panel_partly_off_screen_is_clipped() {
        let mut wm = WindowManager::new();
        let mut doc = Document::new();
        let mut panel = wm.create_panel("Edge", "");
        panel.move_to(-5, -1);
        panel.set_size(20, 6);
        let id = doc.insert(panel);
        wm.open(&mut doc, id);

        let area = Rect::new(0, 0, 30, 8);
        let mut buffer = Buffer::empty(area);
        let mut frame = UiFrame::from_parts(area, &mut buffer);
        render_document(&mut frame, &mut doc, &DefaultDecorator);

        // Row 0 on screen is the panel's header row.
        assert!(buffer_row(&buffer, 0).contains("[x]"));
        assert!(buffer_row(&buffer, 4).starts_with("──────────────┘"));
    }
}
