use std::collections::HashMap;
use std::fmt;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Quit,
    // Launchers
    LaunchMemory,
    LaunchChat,
    LaunchTasks,
    ToggleDebugLog,
    // Panel management
    CloseFocused,
    DestroyFocused,
    CycleFocus,
    // Picker navigation
    MenuUp,
    MenuDown,
    MenuLeft,
    MenuRight,
    MenuSelect,
    MenuCancel,
    // Confirm dialog navigation/actions
    ConfirmToggle,
    ConfirmLeft,
    ConfirmRight,
    ConfirmAccept,
    ConfirmCancel,
}

impl Action {
    /// Actions the desktop handles before any panel sees the key.
    pub const GLOBAL: [Action; 8] = [
        Action::Quit,
        Action::LaunchMemory,
        Action::LaunchChat,
        Action::LaunchTasks,
        Action::ToggleDebugLog,
        Action::CloseFocused,
        Action::DestroyFocused,
        Action::CycleFocus,
    ];
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Action::Quit => "Quit",
            Action::LaunchMemory => "Memory game",
            Action::LaunchChat => "Chat",
            Action::LaunchTasks => "Tasks",
            Action::ToggleDebugLog => "Debug log",
            Action::CloseFocused => "Close panel",
            Action::DestroyFocused => "Destroy panel",
            Action::CycleFocus => "Next panel",
            Action::MenuUp => "Menu up",
            Action::MenuDown => "Menu down",
            Action::MenuLeft => "Menu left",
            Action::MenuRight => "Menu right",
            Action::MenuSelect => "Menu select",
            Action::MenuCancel => "Menu cancel",
            Action::ConfirmToggle => "Confirm toggle (Tab)",
            Action::ConfirmLeft => "Confirm left",
            Action::ConfirmRight => "Confirm right",
            Action::ConfirmAccept => "Confirm accept",
            Action::ConfirmCancel => "Confirm cancel",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCombo {
    pub code: KeyCode,
    pub mods: KeyModifiers,
}

impl KeyCombo {
    pub fn new(code: KeyCode, mods: KeyModifiers) -> Self {
        Self { code, mods }
    }

    pub fn matches(&self, key: &KeyEvent) -> bool {
        key.code == self.code && key.modifiers == self.mods
    }

    pub fn display(&self) -> String {
        let mut parts = Vec::new();
        if self.mods.contains(KeyModifiers::CONTROL) {
            parts.push("Ctrl".to_string());
        }
        if self.mods.contains(KeyModifiers::SHIFT) {
            parts.push("Shift".to_string());
        }
        if self.mods.contains(KeyModifiers::ALT) {
            parts.push("Alt".to_string());
        }
        let code = match self.code {
            KeyCode::Char(c) => c.to_ascii_uppercase().to_string(),
            KeyCode::Esc => "Esc".to_string(),
            KeyCode::Enter => "Enter".to_string(),
            KeyCode::Tab => "Tab".to_string(),
            KeyCode::BackTab => "BackTab".to_string(),
            KeyCode::Left => "Left".to_string(),
            KeyCode::Right => "Right".to_string(),
            KeyCode::Up => "Up".to_string(),
            KeyCode::Down => "Down".to_string(),
            KeyCode::F(n) => format!("F{}", n),
            _ => format!("{:?}", self.code),
        };
        parts.push(code);
        parts.join("+")
    }
}

impl fmt::Display for KeyCombo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

#[derive(Debug, Clone)]
pub struct KeyBindings {
    map: HashMap<Action, Vec<KeyCombo>>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        use Action::*;
        let mut kb = Self::new();
        let none = KeyModifiers::NONE;
        let ctrl = KeyModifiers::CONTROL;
        kb.add(Quit, KeyCombo::new(KeyCode::Char('q'), ctrl));
        // Launchers
        kb.add(LaunchMemory, KeyCombo::new(KeyCode::F(2), none));
        kb.add(LaunchChat, KeyCombo::new(KeyCode::F(3), none));
        kb.add(LaunchTasks, KeyCombo::new(KeyCode::F(4), none));
        kb.add(ToggleDebugLog, KeyCombo::new(KeyCode::F(12), none));
        // Panel management
        kb.add(CloseFocused, KeyCombo::new(KeyCode::Char('w'), ctrl));
        kb.add(DestroyFocused, KeyCombo::new(KeyCode::Char('x'), ctrl));
        kb.add(CycleFocus, KeyCombo::new(KeyCode::Char('n'), ctrl));
        kb.add(CycleFocus, KeyCombo::new(KeyCode::F(6), none));
        // Picker navigation
        kb.add(MenuUp, KeyCombo::new(KeyCode::Up, none));
        kb.add(MenuDown, KeyCombo::new(KeyCode::Down, none));
        kb.add(MenuLeft, KeyCombo::new(KeyCode::Left, none));
        kb.add(MenuRight, KeyCombo::new(KeyCode::Right, none));
        kb.add(MenuSelect, KeyCombo::new(KeyCode::Enter, none));
        kb.add(MenuCancel, KeyCombo::new(KeyCode::Esc, none));
        // Confirm overlay
        kb.add(ConfirmToggle, KeyCombo::new(KeyCode::Tab, none));
        kb.add(ConfirmToggle, KeyCombo::new(KeyCode::BackTab, none));
        kb.add(ConfirmLeft, KeyCombo::new(KeyCode::Left, none));
        kb.add(ConfirmRight, KeyCombo::new(KeyCode::Right, none));
        kb.add(ConfirmAccept, KeyCombo::new(KeyCode::Enter, none));
        kb.add(ConfirmAccept, KeyCombo::new(KeyCode::Char('y'), none));
        kb.add(ConfirmCancel, KeyCombo::new(KeyCode::Esc, none));
        kb.add(ConfirmCancel, KeyCombo::new(KeyCode::Char('n'), none));
        kb
    }
}

impl KeyBindings {
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    pub fn add(&mut self, action: Action, combo: KeyCombo) {
        self.map.entry(action).or_default().push(combo);
    }

    pub fn matches(&self, action: Action, key: &KeyEvent) -> bool {
        if let Some(list) = self.map.get(&action) {
            list.iter().any(|c| c.matches(key))
        } else {
            false
        }
    }

    /// The first desktop-level action bound to `key`.
    pub fn global_action(&self, key: &KeyEvent) -> Option<Action> {
        Action::GLOBAL
            .into_iter()
            .find(|action| self.matches(*action, key))
    }

    /// Return the display strings for all combos mapped to `action`.
    pub fn combos_for(&self, action: Action) -> Vec<String> {
        self.map
            .get(&action)
            .map(|list| list.iter().map(|c| c.display()).collect())
            .unwrap_or_default()
    }

    /// Return the first `KeyCombo` mapped to `action`, if any.
    pub fn first_combo(&self, action: Action) -> Option<KeyCombo> {
        self.map.get(&action).and_then(|list| list.first().cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEvent;

    #[test]
    fn defaults_match_quit() {
        let kb = KeyBindings::default();
        let ev = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL);
        assert!(kb.matches(Action::Quit, &ev));
        assert_eq!(kb.global_action(&ev), Some(Action::Quit));
    }

    #[test]
    fn plain_characters_are_not_global() {
        let kb = KeyBindings::default();
        let ev = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        assert_eq!(kb.global_action(&ev), None);
    }

    #[test]
    fn combos_display_function_keys() {
        let kb = KeyBindings::default();
        assert_eq!(kb.combos_for(Action::LaunchChat), vec!["F3".to_string()]);
        assert_eq!(kb.combos_for(Action::CycleFocus), vec!["Ctrl+N", "F6"]);
    }
}
