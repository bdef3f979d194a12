//! Pointer drag sessions.
//!
//! A session lives from a primary press on a panel header to the matching
//! release. Sessions are keyed by pointer so two pointers can never share one.

use std::collections::BTreeMap;

use tracing::debug;

use super::PanelId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PointerId(pub u8);

impl PointerId {
    /// Terminals report a single mouse.
    pub const PRIMARY: PointerId = PointerId(0);
}

#[derive(Debug)]
pub struct DragSession {
    pointer: PointerId,
    panel: PanelId,
    last: (u16, u16),
}

impl DragSession {
    pub fn begin(pointer: PointerId, panel: PanelId, column: u16, row: u16) -> Self {
        debug!(panel = %panel, pointer = pointer.0, column, row, "drag started");
        Self {
            pointer,
            panel,
            last: (column, row),
        }
    }

    pub fn panel(&self) -> PanelId {
        self.panel
    }

    pub fn last(&self) -> (u16, u16) {
        self.last
    }

    /// Record a new pointer position and return the delta since the previous
    /// one.
    pub fn advance(&mut self, column: u16, row: u16) -> (i32, i32) {
        let dx = column as i32 - self.last.0 as i32;
        let dy = row as i32 - self.last.1 as i32;
        self.last = (column, row);
        (dx, dy)
    }
}

impl Drop for DragSession {
    fn drop(&mut self) {
        debug!(panel = %self.panel, pointer = self.pointer.0, "drag released");
    }
}

#[derive(Debug, Default)]
pub struct DragSessions {
    active: BTreeMap<PointerId, DragSession>,
}

impl DragSessions {
    /// Start a session, replacing any stale one on the same pointer.
    pub fn begin(&mut self, pointer: PointerId, panel: PanelId, column: u16, row: u16) {
        self.active
            .insert(pointer, DragSession::begin(pointer, panel, column, row));
    }

    /// Advance the session on `pointer`, returning its panel and the delta.
    pub fn update(
        &mut self,
        pointer: PointerId,
        column: u16,
        row: u16,
    ) -> Option<(PanelId, i32, i32)> {
        let session = self.active.get_mut(&pointer)?;
        let (dx, dy) = session.advance(column, row);
        Some((session.panel(), dx, dy))
    }

    pub fn end(&mut self, pointer: PointerId) -> bool {
        self.active.remove(&pointer).is_some()
    }

    /// Drop every session that targets `panel`.
    pub fn forget_panel(&mut self, panel: PanelId) {
        self.active.retain(|_, session| session.panel() != panel);
    }

    pub fn release_all(&mut self) -> usize {
        let released = self.active.len();
        self.active.clear();
        released
    }

    pub fn get(&self, pointer: PointerId) -> Option<&DragSession> {
        self.active.get(&pointer)
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_reports_delta_since_previous_event() {
        let mut session = DragSession::begin(PointerId::PRIMARY, PanelId::new(1), 10, 10);
        assert_eq!(session.advance(20, 10), (10, 0));
        assert_eq!(session.advance(25, 7), (5, -3));
        assert_eq!(session.last(), (25, 7));
    }

    #[test]
    fn sessions_are_keyed_by_pointer() {
        let mut sessions = DragSessions::default();
        sessions.begin(PointerId(0), PanelId::new(1), 0, 0);
        sessions.begin(PointerId(1), PanelId::new(2), 5, 5);
        assert_eq!(sessions.len(), 2);
        assert_eq!(
            sessions.update(PointerId(1), 6, 5),
            Some((PanelId::new(2), 1, 0))
        );
        assert_eq!(
            sessions.get(PointerId(0)).map(DragSession::last),
            Some((0, 0))
        );
        assert!(sessions.end(PointerId(0)));
        assert!(!sessions.end(PointerId(0)));
        assert_eq!(sessions.release_all(), 1);
        assert!(sessions.is_empty());
    }

    #[test]
    fn forget_panel_drops_its_sessions() {
        let mut sessions = DragSessions::default();
        sessions.begin(PointerId::PRIMARY, PanelId::new(3), 0, 0);
        sessions.forget_panel(PanelId::new(3));
        assert!(sessions.update(PointerId::PRIMARY, 1, 1).is_none());
    }
}
