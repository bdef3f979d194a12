//! Shared crate-wide constants.

use std::time::Duration;

/// First value handed out by the stacking counter is `STACK_BASE + 1`.
pub const STACK_BASE: u64 = 100;

/// Size of a freshly created panel before its owner resizes it.
pub const DEFAULT_PANEL_WIDTH: u16 = 48;
pub const DEFAULT_PANEL_HEIGHT: u16 = 16;

/// Smallest panel that still fits the border, header and one content row.
pub const PANEL_MIN_WIDTH: u16 = 12;
pub const PANEL_MIN_HEIGHT: u16 = 4;

/// New panels cascade from the top-left corner so they do not stack exactly
/// on top of each other. The cascade wraps after `CASCADE_SLOTS` panels.
pub const CASCADE_ORIGIN: (i32, i32) = (2, 1);
pub const CASCADE_STEP: (i32, i32) = (4, 2);
pub const CASCADE_SLOTS: u64 = 8;

/// How long two mismatched memory cards stay face up.
pub const REVEAL_DELAY: Duration = Duration::from_millis(1000);

/// Maximum number of lines kept in a chat panel.
pub const CHAT_HISTORY_LIMIT: usize = 20;

/// Maximum number of lines retained by the in-app debug log.
pub const DEBUG_LOG_MAX_LINES: usize = 2000;

/// Frame cadence of the event loop; drives redraws and content timers.
pub const POLL_INTERVAL: Duration = Duration::from_millis(16);
