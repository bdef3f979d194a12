//! Content modules hosted inside desktop panels.

pub mod chat;
pub mod memory_game;
pub mod relay;
pub mod task_manager;

pub use chat::{ChatComponent, Envelope, InputMode};
pub use memory_game::{Card, MemoryGame};
pub use relay::{ChannelRelay, ChatRelay, LocalRelay, RelayEvent, RelayPeer};
pub use task_manager::{Task, TaskFocus, TaskManager};
