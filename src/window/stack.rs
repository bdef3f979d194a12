use crate::constants::STACK_BASE;

use super::PanelId;

/// Monotonic stacking counter. Each call to [`StackCounter::next`] yields a
/// value strictly greater than every value handed out before it.
#[derive(Debug, Clone)]
pub struct StackCounter {
    current: u64,
}

impl StackCounter {
    pub const fn new(base: u64) -> Self {
        Self { current: base }
    }

    pub fn next(&mut self) -> u64 {
        self.current = self.current.saturating_add(1);
        self.current
    }

    pub fn current(&self) -> u64 {
        self.current
    }
}

impl Default for StackCounter {
    fn default() -> Self {
        Self::new(STACK_BASE)
    }
}

/// Hands out panel ids in creation order, starting at 1.
#[derive(Debug, Clone, Default)]
pub struct PanelIdGenerator {
    issued: u64,
}

impl PanelIdGenerator {
    pub fn mint(&mut self) -> PanelId {
        self.issued += 1;
        PanelId::new(self.issued)
    }
}
