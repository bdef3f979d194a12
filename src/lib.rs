pub mod apps;
pub mod cli;
pub mod component_context;
pub mod components;
pub mod constants;
pub mod desktop;
pub mod dispatch;
pub mod drivers;
pub mod error;
pub mod event_loop;
pub mod keybindings;
pub mod layout;
pub mod runner;
pub mod storage;
pub mod theme;
pub mod tracing_sub;
pub mod ui;
pub mod window;

pub use desktop::Desktop;
pub use error::{DeskError, Result};
