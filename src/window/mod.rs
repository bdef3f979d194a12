//! Floating panels and the manager that stacks, drags, and hides them.
//!
//! The [`Document`] owns every [`Panel`]; the [`WindowManager`] owns only the
//! stacking counter, the identity generator and the in-flight drag sessions,
//! and looks panels up by id whenever it is asked to act on one.

pub mod compositor;
pub mod decorator;
pub mod document;
pub mod drag;
pub mod manager;
pub mod stack;

use std::fmt;
use std::str::FromStr;

use crossterm::event::{Event, MouseEvent};
use ratatui::layout::Rect;
use ratatui::text::Text;
use ratatui::widgets::{Paragraph, Wrap};

use crate::components::{Component, ComponentContext};
use crate::constants::{PANEL_MIN_HEIGHT, PANEL_MIN_WIDTH};
use crate::ui::UiFrame;

pub use crate::layout::FloatRect;
pub use compositor::render_document;
pub use decorator::{DefaultDecorator, HeaderAction, WindowDecorator};
pub use document::Document;
pub use drag::{DragSession, DragSessions, PointerId};
pub use manager::WindowManager;
pub use stack::{PanelIdGenerator, StackCounter};

/// Identity of a panel, unique per [`WindowManager`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PanelId(u64);

impl PanelId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for PanelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "panel-{}", self.0)
    }
}

impl FromStr for PanelId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.strip_prefix("panel-").unwrap_or(s).parse().map(PanelId)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Hidden,
    Visible,
}

/// Where a panel sits in the per-panel interaction state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelState {
    Hidden,
    Unfocused,
    Focused,
}

/// What a pointer press landed on inside a panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Element {
    /// Anything carrying the close marker: the header close button or a
    /// marker reported by the content module.
    CloseMarker,
    Header,
    Body,
}

/// The content region: static markup supplied at creation, optionally
/// replaced by a mounted content module.
struct ContentRegion {
    markup: Text<'static>,
    module: Option<Box<dyn Component>>,
}

pub struct Panel {
    id: PanelId,
    title: String,
    z: u64,
    visibility: Visibility,
    rect: FloatRect,
    focus_on_press: bool,
    draggable: bool,
    content: ContentRegion,
}

impl fmt::Debug for Panel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Panel")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("z", &self.z)
            .field("visibility", &self.visibility)
            .field("rect", &self.rect)
            .field("focus_on_press", &self.focus_on_press)
            .field("draggable", &self.draggable)
            .field("mounted", &self.content.module.is_some())
            .finish()
    }
}

impl Panel {
    pub(crate) fn new(id: PanelId, title: String, markup: Text<'static>, rect: FloatRect) -> Self {
        Self {
            id,
            title,
            z: 0,
            visibility: Visibility::Hidden,
            rect,
            focus_on_press: false,
            draggable: false,
            content: ContentRegion {
                markup,
                module: None,
            },
        }
    }

    pub fn id(&self) -> PanelId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn z(&self) -> u64 {
        self.z
    }

    pub(crate) fn set_z(&mut self, z: u64) {
        self.z = z;
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn is_visible(&self) -> bool {
        self.visibility == Visibility::Visible
    }

    pub(crate) fn set_visibility(&mut self, visibility: Visibility) {
        self.visibility = visibility;
    }

    pub fn rect(&self) -> FloatRect {
        self.rect
    }

    pub fn position(&self) -> (i32, i32) {
        self.rect.origin()
    }

    pub fn move_to(&mut self, x: i32, y: i32) {
        self.rect.x = x;
        self.rect.y = y;
    }

    pub(crate) fn translate(&mut self, dx: i32, dy: i32) {
        self.rect.translate(dx, dy);
    }

    pub fn set_size(&mut self, width: u16, height: u16) {
        self.rect.width = width.max(PANEL_MIN_WIDTH);
        self.rect.height = height.max(PANEL_MIN_HEIGHT);
    }

    pub fn focus_on_press(&self) -> bool {
        self.focus_on_press
    }

    pub(crate) fn set_focus_on_press(&mut self, enabled: bool) {
        self.focus_on_press = enabled;
    }

    pub fn draggable(&self) -> bool {
        self.draggable
    }

    pub(crate) fn set_draggable(&mut self, enabled: bool) {
        self.draggable = enabled;
    }

    pub fn markup(&self) -> &Text<'static> {
        &self.content.markup
    }

    /// Hand the content region to a module. Any previous module is dropped.
    pub fn mount(&mut self, module: Box<dyn Component>) {
        self.content.module = Some(module);
    }

    pub fn has_module(&self) -> bool {
        self.content.module.is_some()
    }

    pub(crate) fn render_content(
        &mut self,
        frame: &mut UiFrame<'_>,
        area: Rect,
        ctx: &ComponentContext,
    ) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        match self.content.module.as_mut() {
            Some(module) => module.render(frame, area, ctx),
            None => {
                let paragraph =
                    Paragraph::new(self.content.markup.clone()).wrap(Wrap { trim: false });
                frame.render_widget(paragraph, area);
            }
        }
    }

    pub(crate) fn deliver(&mut self, event: &Event, ctx: &ComponentContext) -> bool {
        self.content
            .module
            .as_mut()
            .is_some_and(|module| module.handle_event(event, ctx))
    }

    pub(crate) fn tick(&mut self, now: std::time::Instant) {
        if let Some(module) = self.content.module.as_mut() {
            module.tick(now);
        }
    }

    pub(crate) fn close_markers(&self) -> Vec<Rect> {
        self.content
            .module
            .as_ref()
            .map(|module| module.close_markers())
            .unwrap_or_default()
    }
}

/// Rebase mouse coordinates to be relative to `rect`'s origin. Mouse events
/// outside the rect yield `None`; other events pass through unchanged.
pub fn localize_event(rect: FloatRect, event: &Event) -> Option<Event> {
    match event {
        Event::Mouse(mouse) => {
            let (column, row) = rect.local(mouse.column, mouse.row)?;
            Some(Event::Mouse(MouseEvent {
                column,
                row,
                ..*mouse
            }))
        }
        other => Some(other.clone()),
    }
}
