//! Shared component rendering context
//!
//! `ComponentContext` carries the UI state a content module needs while it
//! renders or handles input: whether its panel is the focused one, and which
//! panel it lives in.

use crate::window::PanelId;

#[derive(Debug, Clone, Copy, Default)]
pub struct ComponentContext {
    focused: bool,
    panel: Option<PanelId>,
}

impl ComponentContext {
    pub const fn new(focused: bool) -> Self {
        Self {
            focused,
            panel: None,
        }
    }

    pub const fn focused(&self) -> bool {
        self.focused
    }

    /// The panel hosting the component, when it is rendered inside one.
    pub const fn panel(&self) -> Option<PanelId> {
        self.panel
    }

    pub const fn with_focus(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    pub const fn in_panel(mut self, panel: PanelId) -> Self {
        self.panel = Some(panel);
        self
    }
}
