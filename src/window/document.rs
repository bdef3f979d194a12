use std::collections::BTreeMap;
use std::time::Instant;

use crossterm::event::Event;
use tracing::{debug, warn};

use crate::components::{Component, ComponentContext};

use super::{Panel, PanelId, PanelState, localize_event};

/// The desktop surface: owns every panel that has been inserted.
#[derive(Debug, Default)]
pub struct Document {
    panels: BTreeMap<PanelId, Panel>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a panel created by a [`super::WindowManager`]. A panel with the
    /// same id is replaced.
    pub fn insert(&mut self, panel: Panel) -> PanelId {
        let id = panel.id();
        if self.panels.insert(id, panel).is_some() {
            warn!(panel = %id, "replaced panel with duplicate id");
        }
        id
    }

    pub fn get(&self, id: PanelId) -> Option<&Panel> {
        self.panels.get(&id)
    }

    pub fn get_mut(&mut self, id: PanelId) -> Option<&mut Panel> {
        self.panels.get_mut(&id)
    }

    pub fn contains(&self, id: PanelId) -> bool {
        self.panels.contains_key(&id)
    }

    pub(crate) fn remove(&mut self, id: PanelId) -> Option<Panel> {
        self.panels.remove(&id)
    }

    pub fn len(&self) -> usize {
        self.panels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = PanelId> + '_ {
        self.panels.keys().copied()
    }

    pub fn panels(&self) -> impl Iterator<Item = &Panel> {
        self.panels.values()
    }

    /// Visible panels from bottom to top. Equal z values fall back to
    /// creation order.
    pub fn draw_order(&self) -> Vec<PanelId> {
        let mut visible: Vec<&Panel> = self
            .panels
            .values()
            .filter(|p| p.is_visible())
            .collect();
        visible.sort_by_key(|p| (p.z(), p.id()));
        visible.into_iter().map(Panel::id).collect()
    }

    /// The topmost visible panel covering a screen cell.
    pub fn topmost_at(&self, column: u16, row: u16) -> Option<PanelId> {
        self.draw_order().into_iter().rev().find(|id| {
            self.panels
                .get(id)
                .is_some_and(|p| p.rect().contains(column, row))
        })
    }

    /// The focused panel is the visible panel stacked highest.
    pub fn focused(&self) -> Option<PanelId> {
        self.draw_order().last().copied()
    }

    pub fn state(&self, id: PanelId) -> Option<PanelState> {
        let panel = self.panels.get(&id)?;
        Some(if !panel.is_visible() {
            PanelState::Hidden
        } else if self.focused() == Some(id) {
            PanelState::Focused
        } else {
            PanelState::Unfocused
        })
    }

    pub fn find_by_title(&self, title: &str) -> Vec<PanelId> {
        self.panels
            .values()
            .filter(|p| p.title() == title)
            .map(Panel::id)
            .collect()
    }

    /// Mount a content module into the panel with `id`.
    pub fn mount(&mut self, id: PanelId, module: Box<dyn Component>) -> bool {
        match self.panels.get_mut(&id) {
            Some(panel) => {
                panel.mount(module);
                debug!(panel = %id, "mounted content module");
                true
            }
            None => {
                warn!(panel = %id, "mount: no such panel");
                false
            }
        }
    }

    /// Forward an event to the content module of `id`, with mouse
    /// coordinates rebased to the panel.
    pub fn deliver(&mut self, id: PanelId, event: &Event) -> bool {
        let focused = self.focused() == Some(id);
        let Some(panel) = self.panels.get_mut(&id) else {
            return false;
        };
        let Some(local) = localize_event(panel.rect(), event) else {
            return false;
        };
        let ctx = ComponentContext::new(focused).in_panel(id);
        panel.deliver(&local, &ctx)
    }

    pub fn tick(&mut self, now: Instant) {
        for panel in self.panels.values_mut() {
            panel.tick(now);
        }
    }
}
