//! The window manager: creation, stacking, dragging, visibility.
//!
//! The manager never holds on to panels. Every operation takes the
//! [`Document`] and resolves the target id at call time, so a panel that was
//! destroyed in between simply turns the call into a logged no-op.

use std::sync::Arc;

use crossterm::event::{Event, MouseButton, MouseEventKind};
use ratatui::layout::Rect;
use ratatui::text::Text;
use tracing::{debug, warn};

use crate::constants::{
    CASCADE_ORIGIN, CASCADE_SLOTS, CASCADE_STEP, DEFAULT_PANEL_HEIGHT, DEFAULT_PANEL_WIDTH,
};
use crate::layout::rect_contains;

use super::{
    DefaultDecorator, Document, DragSessions, Element, FloatRect, HeaderAction, Panel, PanelId,
    PanelIdGenerator, PointerId, StackCounter, Visibility, WindowDecorator,
};

#[derive(Debug)]
pub struct WindowManager {
    stack: StackCounter,
    ids: PanelIdGenerator,
    drags: DragSessions,
    decorator: Arc<dyn WindowDecorator>,
}

impl Default for WindowManager {
    fn default() -> Self {
        Self::new()
    }
}

impl WindowManager {
    pub fn new() -> Self {
        Self::with_decorator(Arc::new(DefaultDecorator))
    }

    pub fn with_decorator(decorator: Arc<dyn WindowDecorator>) -> Self {
        Self {
            stack: StackCounter::default(),
            ids: PanelIdGenerator::default(),
            drags: DragSessions::default(),
            decorator,
        }
    }

    pub fn decorator(&self) -> Arc<dyn WindowDecorator> {
        Arc::clone(&self.decorator)
    }

    /// The most recently assigned stacking value.
    pub fn stacking_value(&self) -> u64 {
        self.stack.current()
    }

    /// Build a hidden panel with a header, close control and `markup` as
    /// its content. The panel is not part of any document until inserted.
    pub fn create_panel(
        &mut self,
        title: impl Into<String>,
        markup: impl Into<Text<'static>>,
    ) -> Panel {
        let id = self.ids.mint();
        let mut panel = Panel::new(id, title.into(), markup.into(), cascade_rect(id));
        self.enable_dragging(&mut panel);
        self.enable_focus_on_interaction(&mut panel);
        debug!(panel = %id, title = panel.title(), "created panel");
        panel
    }

    pub fn open(&mut self, doc: &mut Document, id: PanelId) -> bool {
        let Some(panel) = doc.get_mut(id) else {
            warn!(panel = %id, "open: no such panel");
            return false;
        };
        panel.set_visibility(Visibility::Visible);
        let z = self.bring_to_front(panel);
        debug!(panel = %id, z, "opened panel");
        true
    }

    /// Hide a panel. Returns whether anything changed; closing a hidden or
    /// missing panel is a no-op.
    pub fn close(&mut self, doc: &mut Document, id: PanelId) -> bool {
        let Some(panel) = doc.get_mut(id) else {
            debug!(panel = %id, "close: no such panel");
            return false;
        };
        if !panel.is_visible() {
            return false;
        }
        panel.set_visibility(Visibility::Hidden);
        self.drags.forget_panel(id);
        debug!(panel = %id, "closed panel");
        true
    }

    /// Remove a panel from the document and hand it back so the caller can
    /// drop whatever it owns.
    pub fn destroy(&mut self, doc: &mut Document, id: PanelId) -> Option<Panel> {
        self.drags.forget_panel(id);
        let removed = doc.remove(id);
        match &removed {
            Some(_) => debug!(panel = %id, "destroyed panel"),
            None => warn!(panel = %id, "destroy: no such panel"),
        }
        removed
    }

    /// Stack `panel` above every other panel and return its new z.
    pub fn bring_to_front(&mut self, panel: &mut Panel) -> u64 {
        let z = self.stack.next();
        panel.set_z(z);
        z
    }

    /// Raise a panel in the document by id.
    pub fn focus(&mut self, doc: &mut Document, id: PanelId) -> bool {
        match doc.get_mut(id) {
            Some(panel) if panel.is_visible() => {
                self.bring_to_front(panel);
                true
            }
            Some(_) => false,
            None => {
                warn!(panel = %id, "focus: no such panel");
                false
            }
        }
    }

    /// Raise the bottom-most visible panel, rotating focus through the stack.
    pub fn cycle_focus(&mut self, doc: &mut Document) -> Option<PanelId> {
        let order = doc.draw_order();
        if order.len() < 2 {
            return order.first().copied();
        }
        let id = order[0];
        self.focus(doc, id).then_some(id)
    }

    pub fn enable_focus_on_interaction(&self, panel: &mut Panel) {
        panel.set_focus_on_press(true);
    }

    pub fn enable_dragging(&self, panel: &mut Panel) {
        panel.set_draggable(true);
    }

    /// Classify the topmost element under a screen cell.
    pub fn element_at(&self, doc: &Document, column: u16, row: u16) -> Option<(PanelId, Element)> {
        let id = doc.topmost_at(column, row)?;
        let panel = doc.get(id)?;
        let (local_x, local_y) = panel.rect().local(column, row)?;
        let local = Rect::new(0, 0, panel.rect().width, panel.rect().height);
        let element = match self.decorator.hit_test(local, local_x, local_y) {
            HeaderAction::Close => Element::CloseMarker,
            HeaderAction::Drag => Element::Header,
            HeaderAction::None => {
                let on_marker = panel
                    .close_markers()
                    .into_iter()
                    .any(|marker| rect_contains(marker, local_x, local_y));
                if on_marker {
                    Element::CloseMarker
                } else {
                    Element::Body
                }
            }
        };
        Some((id, element))
    }

    pub fn begin_drag(
        &mut self,
        doc: &Document,
        pointer: PointerId,
        id: PanelId,
        column: u16,
        row: u16,
    ) -> bool {
        match doc.get(id) {
            Some(panel) if panel.draggable() && panel.is_visible() => {
                self.drags.begin(pointer, id, column, row);
                true
            }
            Some(_) => false,
            None => {
                warn!(panel = %id, "begin_drag: no such panel");
                false
            }
        }
    }

    /// Move the dragged panel by the pointer delta since the previous event.
    pub fn drag_to(&mut self, doc: &mut Document, pointer: PointerId, column: u16, row: u16) -> bool {
        let Some((id, dx, dy)) = self.drags.update(pointer, column, row) else {
            return false;
        };
        match doc.get_mut(id) {
            Some(panel) => {
                panel.translate(dx, dy);
                true
            }
            None => {
                self.drags.end(pointer);
                false
            }
        }
    }

    pub fn end_drag(&mut self, pointer: PointerId) -> bool {
        self.drags.end(pointer)
    }

    pub fn release_all_drags(&mut self) -> usize {
        self.drags.release_all()
    }

    pub fn is_dragging(&self, pointer: PointerId) -> bool {
        self.drags.get(pointer).is_some()
    }

    pub fn active_drags(&self) -> usize {
        self.drags.len()
    }

    /// Focus and drag handling for one input event. Returns true when the
    /// event hit a panel or advanced a drag.
    pub fn handle_event(&mut self, doc: &mut Document, event: &Event) -> bool {
        match event {
            Event::Mouse(mouse) => match mouse.kind {
                MouseEventKind::Down(MouseButton::Left) => {
                    // A press means any earlier release was lost.
                    if self.drags.end(PointerId::PRIMARY) {
                        debug!("press without release; dropped stale drag");
                    }
                    let Some((id, element)) = self.element_at(doc, mouse.column, mouse.row) else {
                        return false;
                    };
                    if let Some(panel) = doc.get_mut(id)
                        && panel.focus_on_press()
                    {
                        self.bring_to_front(panel);
                    }
                    if element == Element::Header {
                        self.begin_drag(doc, PointerId::PRIMARY, id, mouse.column, mouse.row);
                    }
                    true
                }
                MouseEventKind::Drag(MouseButton::Left) => {
                    self.drag_to(doc, PointerId::PRIMARY, mouse.column, mouse.row)
                }
                MouseEventKind::Up(MouseButton::Left) => self.end_drag(PointerId::PRIMARY),
                _ => false,
            },
            Event::FocusLost => {
                let released = self.release_all_drags();
                if released > 0 {
                    debug!(released, "focus lost; released drags");
                }
                false
            }
            _ => false,
        }
    }
}

fn cascade_rect(id: PanelId) -> FloatRect {
    let slot = (id.get().saturating_sub(1) % CASCADE_SLOTS) as i32;
    FloatRect::new(
        CASCADE_ORIGIN.0 + CASCADE_STEP.0 * slot,
        CASCADE_ORIGIN.1 + CASCADE_STEP.1 * slot,
        DEFAULT_PANEL_WIDTH,
        DEFAULT_PANEL_HEIGHT,
    )
}
