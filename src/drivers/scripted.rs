use std::collections::VecDeque;
use std::io;
use std::time::Duration;

use crossterm::event::Event;

use super::InputDriver;

/// Replays a fixed list of events; used to drive the desktop headlessly.
///
/// Once the script runs dry the driver reports no input, so the caller's
/// loop keeps ticking until something asks it to quit.
#[derive(Debug, Default)]
pub struct ScriptedInputDriver {
    events: VecDeque<Event>,
    mouse_capture: bool,
}

impl ScriptedInputDriver {
    pub fn new(events: impl IntoIterator<Item = Event>) -> Self {
        Self {
            events: events.into_iter().collect(),
            mouse_capture: false,
        }
    }

    pub fn push(&mut self, event: Event) {
        self.events.push_back(event);
    }

    pub fn remaining(&self) -> usize {
        self.events.len()
    }

    pub fn mouse_capture(&self) -> bool {
        self.mouse_capture
    }
}

impl InputDriver for ScriptedInputDriver {
    fn poll(&mut self, _timeout: Duration) -> io::Result<bool> {
        Ok(!self.events.is_empty())
    }

    fn read(&mut self) -> io::Result<Event> {
        self.events
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "script exhausted"))
    }

    fn set_mouse_capture(&mut self, enabled: bool) -> io::Result<()> {
        self.mouse_capture = enabled;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    #[test]
    fn replays_then_runs_dry() {
        let key = Event::Key(KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE));
        let mut driver = ScriptedInputDriver::new([key.clone()]);
        assert!(driver.poll(Duration::ZERO).unwrap());
        assert_eq!(driver.read().unwrap(), key);
        assert!(!driver.poll(Duration::ZERO).unwrap());
        assert!(driver.read().is_err());
    }

    #[test]
    fn blanket_impl_for_mut_ref_works() {
        let mut driver = ScriptedInputDriver::new([Event::FocusGained]);
        let mut by_ref = &mut driver;
        assert!(InputDriver::poll(&mut by_ref, Duration::ZERO).unwrap());
        by_ref.set_mouse_capture(true).unwrap();
        assert!(driver.mouse_capture());
    }
}
