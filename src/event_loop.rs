use std::io;
use std::time::Duration;

use crossterm::event::Event;

use crate::drivers::InputDriver;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlFlow {
    Continue,
    Quit,
}

/// The message pump on the UI thread.
///
/// It is the only place that polls the input driver. Each pass first calls
/// the handler with `None` (the idle tick that redraws and advances content
/// timers such as the memory game's reveal delay), then drains every queued
/// event into the handler. Nothing here blocks longer than `poll_interval`.
pub struct EventLoop<D> {
    driver: D,
    poll_interval: Duration,
}

impl<D: InputDriver> EventLoop<D> {
    pub fn new(driver: D, poll_interval: Duration) -> Self {
        Self {
            driver,
            poll_interval,
        }
    }

    pub fn driver(&mut self) -> &mut D {
        &mut self.driver
    }

    /// Run until the handler returns [`ControlFlow::Quit`].
    pub fn run<F>(&mut self, mut handler: F) -> io::Result<()>
    where
        F: FnMut(&mut D, Option<Event>) -> io::Result<ControlFlow>,
    {
        loop {
            if let ControlFlow::Quit = handler(&mut self.driver, None)? {
                break;
            }

            if self.driver.poll(self.poll_interval)? {
                // Drain the queue so drag bursts do not lag behind rendering.
                loop {
                    let event = self.driver.read()?;
                    if let ControlFlow::Quit = handler(&mut self.driver, Some(event))? {
                        return Ok(());
                    }
                    if !self.driver.poll(Duration::from_millis(0))? {
                        break;
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::ScriptedInputDriver;

    #[test]
    fn drains_events_between_ticks() {
        let driver = ScriptedInputDriver::new([Event::FocusGained, Event::FocusLost]);
        let mut event_loop = EventLoop::new(driver, Duration::ZERO);
        let mut seen = Vec::new();
        event_loop
            .run(|_, event| {
                seen.push(event.clone());
                Ok(if seen.len() >= 4 {
                    ControlFlow::Quit
                } else {
                    ControlFlow::Continue
                })
            })
            .unwrap();
        assert_eq!(
            seen,
            vec![None, Some(Event::FocusGained), Some(Event::FocusLost), None]
        );
    }

    #[test]
    fn quit_from_event_stops_immediately() {
        let driver = ScriptedInputDriver::new([Event::FocusGained, Event::FocusLost]);
        let mut event_loop = EventLoop::new(driver, Duration::ZERO);
        event_loop
            .run(|_, event| {
                Ok(match event {
                    Some(Event::FocusGained) => ControlFlow::Quit,
                    _ => ControlFlow::Continue,
                })
            })
            .unwrap();
        assert_eq!(event_loop.driver().remaining(), 1);
    }
}
