//! The single root listener.
//!
//! Every input event enters here. Pointer presses are classified against the
//! panel stack once, so panels created after startup need no listener of
//! their own: a close marker closes its enclosing panel, anything else goes
//! to the manager for focus and drag handling and then to the content module.

use crossterm::event::{Event, MouseButton, MouseEventKind};
use tracing::trace;

use crate::window::{Document, Element, PanelId, WindowManager};

/// Where an event ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Routed {
    /// A close marker was pressed and its panel hidden.
    Closed(PanelId),
    /// The event reached a content module, which reports whether it acted.
    Delivered(PanelId, bool),
    /// The window manager consumed it (header press, drag motion, release).
    Manager,
    Ignored,
}

#[derive(Debug, Default)]
pub struct RootDispatcher;

impl RootDispatcher {
    pub fn new() -> Self {
        Self
    }

    pub fn dispatch(
        &mut self,
        wm: &mut WindowManager,
        doc: &mut Document,
        event: &Event,
    ) -> Routed {
        let routed = match event {
            Event::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
                let hit = wm.element_at(doc, mouse.column, mouse.row);
                wm.handle_event(doc, event);
                match hit {
                    Some((id, Element::CloseMarker)) => {
                        wm.close(doc, id);
                        Routed::Closed(id)
                    }
                    Some((id, Element::Body)) => Routed::Delivered(id, doc.deliver(id, event)),
                    Some((_, Element::Header)) => Routed::Manager,
                    None => Routed::Ignored,
                }
            }
            Event::Mouse(mouse) => {
                if wm.handle_event(doc, event) {
                    Routed::Manager
                } else if let Some(id) = doc.topmost_at(mouse.column, mouse.row) {
                    Routed::Delivered(id, doc.deliver(id, event))
                } else {
                    Routed::Ignored
                }
            }
            Event::Key(_) | Event::Paste(_) => match doc.focused() {
                Some(id) => Routed::Delivered(id, doc.deliver(id, event)),
                None => Routed::Ignored,
            },
            other => {
                wm.handle_event(doc, other);
                Routed::Ignored
            }
        };
        trace!(?routed, "dispatched event");
        routed
    }
}
