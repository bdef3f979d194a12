use std::io;

use clap::Parser;
use tracing::{info, warn};

use term_desk::apps::chat::USERNAME_KEY;
use term_desk::cli::Cli;
use term_desk::components::{DebugLogHandle, install_panic_hook, set_global_debug_log};
use term_desk::constants::{DEBUG_LOG_MAX_LINES, POLL_INTERVAL};
use term_desk::desktop::Desktop;
use term_desk::drivers::{ConsoleInputDriver, ConsoleOutputDriver};
use term_desk::runner::run_desktop;
use term_desk::storage::Storage;
use term_desk::{DeskError, tracing_sub};

fn main() -> io::Result<()> {
    let cli = Cli::parse();

    // The log buffer must exist before the subscriber so nothing reaches
    // stderr while the alternate screen is up.
    let log = DebugLogHandle::new(DEBUG_LOG_MAX_LINES);
    set_global_debug_log(log.clone());
    install_panic_hook();
    tracing_sub::init(cli.log_level);

    let storage = open_storage(&cli).map_err(|err| io::Error::other(err.to_string()))?;
    if let Some(name) = cli.username.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
        storage.init_if_absent(USERNAME_KEY, name);
    }
    info!(path = ?storage.path(), "storage ready");

    let mut desktop = Desktop::new(storage)
        .with_debug_log(log)
        .with_chat_key(cli.chat_key.clone());
    if cli.debug_log {
        desktop.toggle_debug_log();
    }

    let mut output = ConsoleOutputDriver::new()?;
    output.enter()?;
    let mut input = ConsoleInputDriver::new();
    let result = run_desktop::<_, _, io::Error>(
        output.terminal_mut(),
        &mut input,
        &mut desktop,
        POLL_INTERVAL,
    );
    output.exit()?;
    result
}

fn open_storage(cli: &Cli) -> Result<Storage, DeskError> {
    if cli.ephemeral {
        return Ok(Storage::in_memory());
    }
    match &cli.data_dir {
        Some(dir) => Storage::open(dir),
        None => Storage::open_default().or_else(|err| {
            warn!(%err, "falling back to in-memory storage");
            Ok(Storage::in_memory())
        }),
    }
}
