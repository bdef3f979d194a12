use std::collections::VecDeque;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, OnceLock};

use crossterm::event::{Event, KeyCode, MouseEventKind};
use ratatui::layout::Rect;
use ratatui::style::Style;

use crate::components::{Component, ComponentContext};
use crate::ui::UiFrame;

static GLOBAL_LOG: OnceLock<DebugLogHandle> = OnceLock::new();
static PANIC_HOOK_INSTALLED: OnceLock<()> = OnceLock::new();

pub fn set_global_debug_log(handle: DebugLogHandle) -> bool {
    GLOBAL_LOG.set(handle).is_ok()
}

pub fn global_debug_log() -> Option<DebugLogHandle> {
    GLOBAL_LOG.get().cloned()
}

/// Mirror panics into the debug log before the previous hook runs, so they
/// are still readable after the terminal is restored.
pub fn install_panic_hook() {
    if PANIC_HOOK_INSTALLED.set(()).is_err() {
        return;
    }
    let prev = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        if let Some(handle) = GLOBAL_LOG.get() {
            handle.push("=== PANIC ===");
            if let Some(location) = info.location() {
                handle.push(format!(
                    "{}:{}:{}",
                    location.file(),
                    location.line(),
                    location.column()
                ));
            }
            if let Some(msg) = info.payload().downcast_ref::<&str>() {
                handle.push(format!("message: {msg}"));
            } else if let Some(msg) = info.payload().downcast_ref::<String>() {
                handle.push(format!("message: {msg}"));
            } else {
                handle.push("message: <non-string panic>");
            }
        }
        prev(info);
    }));
}

#[derive(Debug)]
struct DebugLogBuffer {
    lines: VecDeque<String>,
    max_lines: usize,
}

impl DebugLogBuffer {
    fn new(max_lines: usize) -> Self {
        Self {
            lines: VecDeque::new(),
            max_lines: max_lines.max(1),
        }
    }

    fn push_line(&mut self, line: String) {
        self.lines.push_back(line);
        while self.lines.len() > self.max_lines {
            self.lines.pop_front();
        }
    }
}

/// Shared ring buffer of log lines. Cloning shares the buffer.
#[derive(Clone, Debug)]
pub struct DebugLogHandle {
    inner: Arc<Mutex<DebugLogBuffer>>,
}

impl DebugLogHandle {
    pub fn new(max_lines: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(DebugLogBuffer::new(max_lines))),
        }
    }

    pub fn push(&self, line: impl Into<String>) {
        if let Ok(mut buffer) = self.inner.lock() {
            buffer.push_line(line.into());
        }
    }

    pub fn lines(&self) -> Vec<String> {
        self.inner
            .lock()
            .map(|buffer| buffer.lines.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().map(|b| b.lines.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn writer(&self) -> DebugLogWriter {
        DebugLogWriter::new(self.clone())
    }
}

/// `io::Write` adapter that splits output into lines for the ring buffer.
#[derive(Debug)]
pub struct DebugLogWriter {
    handle: DebugLogHandle,
    pending: Vec<u8>,
}

impl DebugLogWriter {
    pub fn new(handle: DebugLogHandle) -> Self {
        Self {
            handle,
            pending: Vec::new(),
        }
    }

    fn flush_pending(&mut self, force: bool) {
        if self.pending.is_empty() {
            return;
        }
        let drained: Vec<u8> = if force {
            std::mem::take(&mut self.pending)
        } else {
            let Some(pos) = self.pending.iter().rposition(|b| *b == b'\n') else {
                return;
            };
            self.pending.drain(..=pos).collect()
        };
        let text = String::from_utf8_lossy(&drained);
        for line in text.split('\n') {
            if !line.is_empty() {
                self.handle.push(line.to_string());
            }
        }
    }
}

impl Write for DebugLogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.pending.extend_from_slice(buf);
        self.flush_pending(false);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.flush_pending(true);
        Ok(())
    }
}

/// Panel content that tails the debug log.
#[derive(Debug)]
pub struct DebugLogComponent {
    handle: DebugLogHandle,
    // lines scrolled up from the tail; 0 follows new output
    back: usize,
    last_view: usize,
}

impl DebugLogComponent {
    pub fn new(handle: DebugLogHandle) -> Self {
        Self {
            handle,
            back: 0,
            last_view: 0,
        }
    }

    pub fn following_tail(&self) -> bool {
        self.back == 0
    }

    fn scroll(&mut self, delta: isize) {
        let max_back = self.handle.len().saturating_sub(self.last_view.max(1));
        self.back = if delta.is_negative() {
            self.back.saturating_add(delta.unsigned_abs()).min(max_back)
        } else {
            self.back.saturating_sub(delta as usize)
        };
    }
}

impl Component for DebugLogComponent {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, _ctx: &ComponentContext) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let lines = self.handle.lines();
        let view = area.height as usize;
        self.last_view = view;
        let end = lines.len().saturating_sub(self.back);
        let start = end.saturating_sub(view);
        for (row, line) in lines[start..end].iter().enumerate() {
            frame.set_string(
                area.x,
                area.y.saturating_add(row as u16),
                line,
                Style::default(),
            );
        }
    }

    fn handle_event(&mut self, event: &Event, _ctx: &ComponentContext) -> bool {
        let page = self.last_view.max(1) as isize;
        match event {
            Event::Key(key) => match key.code {
                KeyCode::Up => self.scroll(-1),
                KeyCode::Down => self.scroll(1),
                KeyCode::PageUp => self.scroll(-page),
                KeyCode::PageDown => self.scroll(page),
                KeyCode::End => self.back = 0,
                _ => return false,
            },
            Event::Mouse(mouse) => match mouse.kind {
                MouseEventKind::ScrollUp => self.scroll(-3),
                MouseEventKind::ScrollDown => self.scroll(3),
                _ => return false,
            },
            _ => return false,
        }
        true
    }
}
