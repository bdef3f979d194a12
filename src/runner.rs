use std::io;
use std::time::{Duration, Instant};

use crossterm::event::Event;
use ratatui::Terminal;
use ratatui::backend::Backend;
use tracing::info;

use crate::desktop::Desktop;
use crate::drivers::InputDriver;
use crate::event_loop::{ControlFlow, EventLoop};
use crate::ui::UiFrame;

/// Drive a desktop until it asks to quit.
///
/// Idle passes tick content timers and redraw; input events go through
/// [`Desktop::handle_event`] against the current terminal area.
pub fn run_desktop<B, D, E>(
    terminal: &mut Terminal<B>,
    driver: &mut D,
    desktop: &mut Desktop,
    poll_interval: Duration,
) -> Result<(), E>
where
    B: Backend,
    D: InputDriver,
    E: From<io::Error> + From<<B as Backend>::Error>,
{
    let mut event_loop = EventLoop::new(driver, poll_interval);
    event_loop.driver().set_mouse_capture(true)?;

    let mut area = terminal.get_frame().area();
    event_loop.run(|_driver, event| {
        match event {
            Some(Event::Resize(_, _)) => {
                terminal.autoresize().map_err(|e| io::Error::other(e.to_string()))?;
                area = terminal.get_frame().area();
            }
            Some(evt) => {
                desktop.handle_event(&evt, area);
            }
            None => {
                if desktop.should_quit() {
                    return Ok(ControlFlow::Quit);
                }
                desktop.tick(Instant::now());
                let completed = terminal
                    .draw(|frame| {
                        let mut ui = UiFrame::new(frame);
                        desktop.render(&mut ui);
                    })
                    .map_err(|e| io::Error::other(e.to_string()))?;
                area = completed.area;
            }
        }
        if desktop.should_quit() {
            return Ok(ControlFlow::Quit);
        }
        Ok(ControlFlow::Continue)
    })?;

    info!("desktop closed");
    Ok(())
}
