use std::convert::Infallible;
use std::io;
use std::time::Duration;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use ratatui::Terminal;
use ratatui::backend::TestBackend;

use term_desk::apps::Task;
use term_desk::apps::chat::USERNAME_KEY;
use term_desk::drivers::ScriptedInputDriver;
use term_desk::runner::run_desktop;
use term_desk::storage::Storage;
use term_desk::ui::buffer_row;
use term_desk::Desktop;

#[derive(Debug)]
enum LoopError {
    Io(io::Error),
}

impl From<io::Error> for LoopError {
    fn from(err: io::Error) -> Self {
        LoopError::Io(err)
    }
}

impl From<Infallible> for LoopError {
    fn from(err: Infallible) -> Self {
        match err {}
    }
}

fn key(code: KeyCode) -> Event {
    Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

fn ctrl(c: char) -> Event {
    Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL))
}

fn typed(text: &str) -> Vec<Event> {
    text.chars().map(|c| key(KeyCode::Char(c))).collect()
}

fn run(desktop: &mut Desktop, events: Vec<Event>) -> (Terminal<TestBackend>, ScriptedInputDriver) {
    let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
    let mut driver = ScriptedInputDriver::new(events);
    run_desktop::<_, _, LoopError>(&mut terminal, &mut driver, desktop, Duration::ZERO).unwrap();
    (terminal, driver)
}

#[test]
fn adding_a_task_then_quitting_persists_it() {
    let storage = Storage::in_memory();
    let mut desktop = Desktop::new(storage.clone());
    let mut events = vec![key(KeyCode::F(4))];
    events.extend(typed("buy milk"));
    events.push(key(KeyCode::Enter));
    events.push(ctrl('q'));
    events.push(key(KeyCode::Enter));

    let (_, driver) = run(&mut desktop, events);
    assert!(desktop.should_quit());
    assert_eq!(driver.remaining(), 0);
    assert!(driver.mouse_capture());

    let tasks: Vec<Task> = storage.get_json("tasks").unwrap();
    assert_eq!(
        tasks,
        vec![Task {
            text: "buy milk".into(),
            completed: false
        }]
    );
}

#[test]
fn chat_username_entry_is_stored() {
    let storage = Storage::in_memory();
    let mut desktop = Desktop::new(storage.clone());
    let mut events = vec![key(KeyCode::F(3))];
    events.extend(typed("  ada "));
    events.push(key(KeyCode::Enter));
    events.push(ctrl('q'));
    events.push(key(KeyCode::Char('y')));

    run(&mut desktop, events);
    assert_eq!(storage.get(USERNAME_KEY).as_deref(), Some("ada"));
}

#[test]
fn first_frame_shows_dock_and_welcome() {
    let mut desktop = Desktop::new(Storage::in_memory());
    // a cancelled quit keeps the loop alive until the next confirmed one
    let events = vec![ctrl('q'), key(KeyCode::Esc), ctrl('q'), key(KeyCode::Enter)];
    let (terminal, _) = run(&mut desktop, events);
    let buffer = terminal.backend().buffer();
    let dock = buffer_row(buffer, 39);
    assert!(dock.contains("Memory game"));
    assert!(dock.contains("Chat"));
    assert!(dock.contains("Tasks"));
    let screen: String = (0..40).map(|y| buffer_row(buffer, y)).collect();
    assert!(screen.contains("term-desk"));
}
