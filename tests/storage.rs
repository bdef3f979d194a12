use std::fs;

use term_desk::apps::{Task, TaskManager};
use term_desk::storage::{STORAGE_FILE, Storage};
use term_desk::window::PanelId;

#[test]
fn values_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    {
        let storage = Storage::open(dir.path()).unwrap();
        storage.set("chatChannel", "TechTalk");
        assert!(storage.init_if_absent("chatUsername", "ada"));
    }
    let reopened = Storage::open(dir.path()).unwrap();
    assert_eq!(reopened.get("chatChannel").as_deref(), Some("TechTalk"));
    assert!(!reopened.init_if_absent("chatUsername", "bob"));
    assert_eq!(reopened.get("chatUsername").as_deref(), Some("ada"));
    assert_eq!(reopened.path(), Some(dir.path().join(STORAGE_FILE)));
}

#[test]
fn corrupt_file_opens_empty() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join(STORAGE_FILE), "{ this is not json").unwrap();
    let storage = Storage::open(dir.path()).unwrap();
    assert!(storage.get("tasks").is_none());

    // the next write replaces the corrupt file
    storage.set("tasks", "[]");
    let reopened = Storage::open(dir.path()).unwrap();
    assert_eq!(reopened.get("tasks").as_deref(), Some("[]"));
}

#[test]
fn directory_in_place_of_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join(STORAGE_FILE)).unwrap();
    assert!(Storage::open(dir.path()).is_err());
}

#[test]
fn missing_directory_is_created() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("a").join("b");
    let storage = Storage::open(&nested).unwrap();
    storage.set("k", "v");
    assert!(nested.join(STORAGE_FILE).is_file());
}

#[test]
fn task_list_persists_across_instances() {
    let dir = tempfile::tempdir().unwrap();
    let storage = Storage::open(dir.path()).unwrap();
    let panel = PanelId::new(1);
    let mut tasks = TaskManager::new(panel, storage);
    assert!(tasks.add("  water plants  "));
    assert!(tasks.add("send invoice"));
    assert!(tasks.set_completed(0, true));

    let reloaded = TaskManager::new(PanelId::new(2), Storage::open(dir.path()).unwrap());
    assert_eq!(
        reloaded.tasks(),
        &[
            Task {
                text: "send invoice".into(),
                completed: false
            },
            Task {
                text: "water plants".into(),
                completed: true
            },
        ]
    );
}

#[test]
fn corrupt_task_value_loads_empty() {
    let storage = Storage::in_memory();
    storage.set("tasks", "not a list");
    let tasks = TaskManager::new(PanelId::new(1), storage);
    assert!(tasks.tasks().is_empty());
}
