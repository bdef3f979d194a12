use std::time::Instant;

use crossterm::event::Event;
use ratatui::layout::Rect;

use crate::ui::UiFrame;

pub mod confirm_overlay;
pub mod dialog_overlay;
pub mod dock;
pub mod size_picker;
pub mod sys;

pub use confirm_overlay::{ConfirmAction, ConfirmOverlayComponent};
pub use dialog_overlay::DialogOverlay;
pub use dock::{Dock, DockItem};
pub use size_picker::{BoardSize, PickerOutcome, SizePickerComponent};
pub use sys::*;

pub use crate::component_context::ComponentContext;

/// A self-contained piece of UI.
///
/// Content modules mounted in a panel receive panel-local coordinates: the
/// `area` handed to `render` and every mouse event are relative to the
/// panel's top-left cell.
pub trait Component {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, ctx: &ComponentContext);

    fn handle_event(&mut self, _event: &Event, _ctx: &ComponentContext) -> bool {
        false
    }

    /// Called on every idle pass of the event loop.
    fn tick(&mut self, _now: Instant) {}

    /// Areas (same coordinate space as `render`) that close the hosting
    /// panel when pressed.
    fn close_markers(&self) -> Vec<Rect> {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::UiFrame;
    use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
    use ratatui::prelude::Rect;

    struct DummyComp;
    impl Component for DummyComp {
        fn render(&mut self, _frame: &mut UiFrame<'_>, _area: Rect, _ctx: &ComponentContext) {}
    }

    #[test]
    fn default_hooks_are_inert() {
        let mut d = DummyComp;
        assert!(!d.handle_event(
            &Event::Key(KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE)),
            &ComponentContext::default()
        ));
        d.tick(Instant::now());
        assert!(d.close_markers().is_empty());
    }
}
