use crate::keyboard::{Keyboard, KeyboardError, MemorySink};
use crate::tui::handlers::{HelpModeAction, KeyHandler, NormalModeAction};
use anyhow::Result;
use crossterm::event::KeyEvent;
use std::path::PathBuf;

pub struct App {
    pub keyboard: Keyboard,
    pub console: MemorySink,
    pub binds_file: PathBuf,
    pub should_quit: bool,
    pub help_mode: bool,
    pub last_error: Option<KeyboardError>,
}

impl App {
    pub fn new(keyboard: Keyboard, console: MemorySink, binds_file: PathBuf) -> Self {
        Self {
            keyboard,
            console,
            binds_file,
            should_quit: false,
            help_mode: false,
            last_error: None,
        }
    }

    pub fn handle_key_event(&mut self, key_event: KeyEvent) -> Result<()> {
        if self.help_mode {
            if KeyHandler::handle_help_mode_key(key_event) == HelpModeAction::ExitHelpMode {
                self.help_mode = false;
            }
            return Ok(());
        }

        match KeyHandler::handle_normal_mode_key(key_event) {
            NormalModeAction::Quit => self.quit(),
            NormalModeAction::ToggleHelpMode => self.help_mode = true,
            NormalModeAction::Press(key) => self.press(&key),
            NormalModeAction::None => {}
        }
        Ok(())
    }

    pub fn press(&mut self, key: &str) {
        self.last_error = self.keyboard.press(key).err();
    }

    pub fn quit(&mut self) {
        self.last_error = self.keyboard.save(&self.binds_file).err();
        self.should_quit = true;
    }

    pub fn recent_log(&self, count: usize) -> Vec<String> {
        self.console.tail(count)
    }
}
