use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::action::Action;
use crate::app::Mode;

/// Map a key event to a semantic action based on current mode.
pub fn map_key(key: KeyEvent, mode: &Mode) -> Action {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Action::Quit;
    }
    match mode {
        Mode::Normal => map_normal(key),
        Mode::Help => match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => Action::ClosePanel,
            _ => Action::None,
        },
        Mode::Settings { .. } => map_settings(key),
    }
}

fn map_normal(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Char('h') | KeyCode::Left => Action::ScrollLeft,
        KeyCode::Char('l') | KeyCode::Right => Action::ScrollRight,
        KeyCode::Home | KeyCode::Char('g') => Action::ScrollStart,
        KeyCode::End | KeyCode::Char('G') => Action::ScrollEnd,
        KeyCode::Esc => Action::CancelDrag,
        KeyCode::Char('s') => Action::OpenSettings,
        KeyCode::Char('?') => Action::ShowHelp,
        KeyCode::Char('q') => Action::Quit,
        _ => Action::None,
    }
}

fn map_settings(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => Action::SettingsDown,
        KeyCode::Char('k') | KeyCode::Up => Action::SettingsUp,
        KeyCode::Enter | KeyCode::Char(' ') => Action::SettingsToggle,
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('s') => Action::ClosePanel,
        _ => Action::None,
    }
}

/// A keybinding entry for the help overlay.
pub struct Binding {
    pub key: &'static str,
    pub description: &'static str,
}

/// A named group of bindings.
pub struct BindingGroup {
    pub name: &'static str,
    pub bindings: &'static [Binding],
}

pub const MOUSE_BINDINGS: &[Binding] = &[
    Binding { key: "drag card", description: "Move a card within or between columns" },
    Binding { key: "drag title", description: "Reorder a column" },
    Binding { key: "drag board", description: "Pan the board sideways" },
    Binding { key: "wheel", description: "Scroll the column under the pointer" },
];

pub const NORMAL_BINDINGS: &[Binding] = &[
    Binding { key: "h / l", description: "Scroll the board one column" },
    Binding { key: "g / G", description: "Jump to the first / last column" },
    Binding { key: "Esc", description: "Cancel the current drag" },
    Binding { key: "s", description: "Settings" },
    Binding { key: "?", description: "This help" },
    Binding { key: "q", description: "Quit" },
];

pub const SETTINGS_BINDINGS: &[Binding] = &[
    Binding { key: "j / k", description: "Select a setting" },
    Binding { key: "Enter", description: "Toggle it" },
    Binding { key: "Esc", description: "Close" },
];

/// All binding groups for the help overlay.
pub const HELP_GROUPS: &[BindingGroup] = &[
    BindingGroup { name: "Mouse", bindings: MOUSE_BINDINGS },
    BindingGroup { name: "Keys", bindings: NORMAL_BINDINGS },
    BindingGroup { name: "Settings (s)", bindings: SETTINGS_BINDINGS },
];
