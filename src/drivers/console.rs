use std::collections::VecDeque;
use std::io::{self, Stdout};
use std::time::Duration;

use crossterm::event::{
    DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture, Event,
    KeyCode, KeyEventKind, KeyModifiers,
};
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{execute, terminal};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use super::InputDriver;

/// Reads crossterm events from the real terminal.
///
/// Key releases never reach the desktop, and Shift+Tab always arrives as a
/// bare `BackTab` whichever form the terminal reports it in.
pub struct ConsoleInputDriver {
    event_queue: VecDeque<Event>,
}

impl Default for ConsoleInputDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleInputDriver {
    pub fn new() -> Self {
        Self {
            event_queue: VecDeque::new(),
        }
    }

    /// Queue an event ahead of terminal input.
    pub fn inject(&mut self, event: Event) {
        self.event_queue.push_back(event);
    }
}

fn desk_event(event: Event) -> Option<Event> {
    let Event::Key(mut key) = event else {
        return Some(event);
    };
    if key.kind == KeyEventKind::Release {
        return None;
    }
    let shift_tab = key.code == KeyCode::Tab && key.modifiers.contains(KeyModifiers::SHIFT);
    if shift_tab || key.code == KeyCode::BackTab {
        key.code = KeyCode::BackTab;
        key.modifiers.remove(KeyModifiers::SHIFT);
    }
    Some(Event::Key(key))
}

impl InputDriver for ConsoleInputDriver {
    fn poll(&mut self, timeout: Duration) -> io::Result<bool> {
        if !self.event_queue.is_empty() {
            return Ok(true);
        }
        crossterm::event::poll(timeout)
    }

    fn read(&mut self) -> io::Result<Event> {
        loop {
            let raw = match self.event_queue.pop_front() {
                Some(queued) => queued,
                None => crossterm::event::read()?,
            };
            if let Some(event) = desk_event(raw) {
                return Ok(event);
            }
        }
    }

    fn set_mouse_capture(&mut self, enabled: bool) -> io::Result<()> {
        if enabled {
            execute!(io::stdout(), EnableMouseCapture)
        } else {
            execute!(io::stdout(), DisableMouseCapture)
        }
    }
}

/// Owns the terminal while the desktop runs and restores it on exit.
pub struct ConsoleOutputDriver {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    entered: bool,
}

impl ConsoleOutputDriver {
    pub fn new() -> io::Result<Self> {
        let backend = CrosstermBackend::new(io::stdout());
        let terminal = Terminal::new(backend)?;
        Ok(Self {
            terminal,
            entered: false,
        })
    }

    pub fn terminal_mut(&mut self) -> &mut Terminal<CrosstermBackend<Stdout>> {
        &mut self.terminal
    }

    /// Alternate screen, raw mode and focus reporting. Focus loss is what
    /// releases drags whose button-up never arrives.
    pub fn enter(&mut self) -> io::Result<()> {
        if self.entered {
            return Ok(());
        }
        execute!(
            self.terminal.backend_mut(),
            EnterAlternateScreen,
            EnableFocusChange
        )?;
        terminal::enable_raw_mode()?;
        self.terminal.hide_cursor()?;
        self.entered = true;
        Ok(())
    }

    pub fn exit(&mut self) -> io::Result<()> {
        if !self.entered {
            return Ok(());
        }
        terminal::disable_raw_mode()?;
        execute!(
            self.terminal.backend_mut(),
            DisableMouseCapture,
            DisableFocusChange,
            LeaveAlternateScreen
        )?;
        self.terminal.show_cursor()?;
        self.entered = false;
        Ok(())
    }
}

impl Drop for ConsoleOutputDriver {
    fn drop(&mut self) {
        let _ = self.exit();
    }
}
