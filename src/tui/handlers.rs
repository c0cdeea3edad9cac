use crate::keyboard::processor::{REDO_KEY, UNDO_KEY};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

pub struct KeyHandler;

impl KeyHandler {
    pub fn handle_normal_mode_key(key_event: KeyEvent) -> NormalModeAction {
        let ctrl = key_event.modifiers.contains(KeyModifiers::CONTROL);
        let alt = key_event.modifiers.contains(KeyModifiers::ALT);

        match key_event.code {
            KeyCode::Esc => NormalModeAction::Quit,
            KeyCode::Char('c') if ctrl => NormalModeAction::Quit,
            KeyCode::F(1) => NormalModeAction::ToggleHelpMode,
            KeyCode::Char('z') if ctrl => NormalModeAction::Press(UNDO_KEY.to_string()),
            KeyCode::Char('y') if ctrl => NormalModeAction::Press(REDO_KEY.to_string()),
            KeyCode::Char(c) if ctrl => NormalModeAction::Press(format!("ctrl+{}", c.to_ascii_lowercase())),
            KeyCode::Char(c) if alt => NormalModeAction::Press(format!("alt+{}", c.to_ascii_lowercase())),
            KeyCode::Char(c) => NormalModeAction::Press(c.to_string()),
            KeyCode::F(n) => NormalModeAction::Press(format!("f{}", n)),
            _ => NormalModeAction::None,
        }
    }

    pub fn handle_help_mode_key(key_event: KeyEvent) -> HelpModeAction {
        match key_event.code {
            KeyCode::Esc | KeyCode::F(1) => HelpModeAction::ExitHelpMode,
            _ => HelpModeAction::None,
        }
    }
}

#[derive(Debug, PartialEq)]
pub enum NormalModeAction {
    None,
    Quit,
    ToggleHelpMode,
    Press(String),
}

#[derive(Debug, PartialEq)]
pub enum HelpModeAction {
    None,
    ExitHelpMode,
}
