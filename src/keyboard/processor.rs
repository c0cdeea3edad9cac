use crate::keyboard::command::KeyCommand;
use crate::keyboard::error::KeyboardError;
use crate::keyboard::history::{History, HistoryEntry};
use crate::keyboard::log::Reporter;
use crate::keyboard::memento::{self, Snapshot, StoredCommand};
use crate::keyboard::state::DeviceState;
use anyhow::{Context, Result, anyhow};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub type Bindings = BTreeMap<String, Option<KeyCommand>>;

pub const UNDO_KEY: &str = "undo";
pub const REDO_KEY: &str = "redo";

const EMBEDDED_DEFAULT_BINDS: &str = include_str!("../../assets/default_binds.json");

#[derive(Debug, Clone)]
pub struct StatePaths {
    pub binds_file: PathBuf,
    // None means the bundled defaults.
    pub default_binds_file: Option<PathBuf>,
}

pub struct Keyboard {
    state: DeviceState,
    bindings: Bindings,
    history: History,
    reporter: Reporter,
}

impl Keyboard {
    pub fn new(reporter: Reporter) -> Self {
        Self {
            state: DeviceState::default(),
            bindings: Bindings::new(),
            history: History::new(),
            reporter,
        }
    }

    // Only an unusable default source is fatal.
    pub fn bootstrap(paths: &StatePaths, reporter: Reporter) -> Result<Self> {
        let mut keyboard = Self::new(reporter);
        if let Ok(true) = keyboard.load(&paths.binds_file) {
            return Ok(keyboard);
        }
        keyboard.reset_to_defaults(paths)?;
        Ok(keyboard)
    }

    pub fn reset_to_defaults(&mut self, paths: &StatePaths) -> Result<()> {
        self.reporter.status("Back to default binds");

        let snapshot = match &paths.default_binds_file {
            Some(path) => memento::read_snapshot(path)
                .with_context(|| format!("Failed to read default bindings: {}", path.display()))?
                .ok_or_else(|| anyhow!("Default bindings file does not exist: {}", path.display()))?,
            None => Snapshot::from_json(EMBEDDED_DEFAULT_BINDS).context("Bundled default bindings are invalid")?,
        };
        self.restore_state(snapshot)
            .context("Failed to apply default bindings")?;

        if self.save(&paths.binds_file).is_err() {
            tracing::warn!("continuing with default bindings that were not saved");
        }
        Ok(())
    }

    pub fn state(&self) -> &DeviceState {
        &self.state
    }

    pub fn bindings(&self) -> &Bindings {
        &self.bindings
    }

    #[cfg(test)]
    pub fn binding(&self, key: &str) -> Option<&Option<KeyCommand>> {
        self.bindings.get(key)
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn bind(&mut self, key: &str, command: Option<KeyCommand>) {
        self.bindings.insert(key.to_string(), command);
    }

    pub fn unbind(&mut self, key: &str) -> Option<Option<KeyCommand>> {
        self.bindings.remove(key)
    }

    pub fn press(&mut self, key: &str) -> Result<String, KeyboardError> {
        match key {
            UNDO_KEY => return self.undo(),
            REDO_KEY => return self.redo(),
            _ => {}
        }

        let _span = tracing::debug_span!("dispatch", key).entered();

        let command = match self.resolve(key) {
            Some(command) => command,
            None => {
                let err = KeyboardError::UnknownKey(key.to_string());
                self.reporter.error(&err);
                return Err(err);
            }
        };

        let result = command.execute(&mut self.state);
        tracing::debug!(command = %command, "executed");
        self.history.record(HistoryEntry::new(key.to_string(), command));
        self.reporter.action(None, &result);
        Ok(result)
    }

    fn resolve(&mut self, key: &str) -> Option<KeyCommand> {
        match self.bindings.get(key) {
            Some(Some(command)) => Some(command.clone()),
            // explicitly disabled
            Some(None) => None,
            None => {
                let mut chars = key.chars();
                match (chars.next(), chars.next()) {
                    (Some(ch), None) => {
                        let command = KeyCommand::character(ch);
                        self.bind(key, Some(command.clone()));
                        Some(command)
                    }
                    _ => None,
                }
            }
        }
    }

    pub fn undo(&mut self) -> Result<String, KeyboardError> {
        let _span = tracing::debug_span!("replay", direction = "undo").entered();

        let Some(entry) = self.history.pop_back() else {
            return Err(self.empty_history());
        };
        let result = entry.command.undo(&mut self.state);
        self.history.push_forward(entry);
        self.reporter.action(Some(UNDO_KEY), &result);
        Ok(result)
    }

    pub fn redo(&mut self) -> Result<String, KeyboardError> {
        let _span = tracing::debug_span!("replay", direction = "redo").entered();

        let Some(entry) = self.history.pop_forward() else {
            return Err(self.empty_history());
        };
        let result = entry.command.redo(&mut self.state);
        self.history.push_back(entry);
        self.reporter.action(Some(REDO_KEY), &result);
        Ok(result)
    }

    fn empty_history(&mut self) -> KeyboardError {
        let err = KeyboardError::EmptyHistory;
        self.reporter.status(&err.to_string());
        err
    }

    pub fn capture_state(&self) -> Snapshot {
        let key_binds = self
            .bindings
            .iter()
            .map(|(key, command)| (key.clone(), command.as_ref().map(StoredCommand::encode)))
            .collect();

        Snapshot {
            text: self.state.text.clone(),
            volume: self.state.volume,
            media_player: self.state.media_player,
            key_binds,
            back_history: self.history.back_keys(),
            forward_history: self.history.forward_keys(),
        }
    }

    // Nothing changes if any binding fails to decode.
    pub fn restore_state(&mut self, snapshot: Snapshot) -> Result<(), KeyboardError> {
        match decode_snapshot(snapshot) {
            Ok((state, bindings, history)) => {
                self.state = state;
                self.bindings = bindings;
                self.history = history;
                Ok(())
            }
            Err(err) => {
                self.reporter.error(&err);
                Err(err)
            }
        }
    }

    pub fn save(&mut self, path: &Path) -> Result<(), KeyboardError> {
        match memento::write_snapshot(path, &self.capture_state()) {
            Ok(()) => {
                self.reporter.status("State saved");
                Ok(())
            }
            Err(err) => {
                self.reporter.error(&err);
                Err(err)
            }
        }
    }

    pub fn load(&mut self, path: &Path) -> Result<bool, KeyboardError> {
        let snapshot = match memento::read_snapshot(path) {
            Ok(Some(snapshot)) => snapshot,
            Ok(None) => {
                tracing::debug!(path = %path.display(), "no saved state");
                return Ok(false);
            }
            Err(err) => {
                self.reporter.error(&err);
                return Err(err);
            }
        };
        self.restore_state(snapshot)?;
        self.reporter.status("State loaded");
        Ok(true)
    }
}

fn decode_snapshot(snapshot: Snapshot) -> Result<(DeviceState, Bindings, History), KeyboardError> {
    let mut bindings = Bindings::new();
    for (key, stored) in snapshot.key_binds {
        let command = stored.map(|stored| stored.decode()).transpose()?;
        bindings.insert(key, command);
    }

    // History keys whose binding is gone or null are dropped.
    let rehydrate = |keys: Vec<String>| -> Vec<HistoryEntry> {
        keys.into_iter()
            .filter_map(|key| match bindings.get(&key) {
                Some(Some(command)) => Some(HistoryEntry::new(key, command.clone())),
                _ => None,
            })
            .collect()
    };
    let history = History {
        back: rehydrate(snapshot.back_history),
        forward: rehydrate(snapshot.forward_history),
    };

    let state = DeviceState::new(snapshot.text, snapshot.volume, snapshot.media_player);
    Ok((state, bindings, history))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyboard::log::MemorySink;
    use std::fs;
    use tempfile::TempDir;

    fn keyboard() -> Keyboard {
        Keyboard::new(Reporter::silent())
    }

    fn keyboard_with_sinks() -> (Keyboard, MemorySink, MemorySink) {
        let output = MemorySink::new();
        let console = MemorySink::new();
        let reporter = Reporter::new(Box::new(output.clone()), Box::new(console.clone()));
        (Keyboard::new(reporter), output, console)
    }

    fn with_default_binds(keyboard: &mut Keyboard) {
        keyboard.bind("ctrl++", Some(KeyCommand::volume_up_default()));
        keyboard.bind("ctrl+-", Some(KeyCommand::volume_down_default()));
        keyboard.bind("ctrl+p", Some(KeyCommand::MediaPlayer));
    }

    fn paths(dir: &TempDir) -> StatePaths {
        StatePaths {
            binds_file: dir.path().join("binds.json"),
            default_binds_file: None,
        }
    }

    #[test]
    fn test_type_undo_redo_scenario() {
        let mut keyboard = keyboard();

        keyboard.press("a").unwrap();
        keyboard.press("b").unwrap();
        assert_eq!(keyboard.press("c").unwrap(), "abc");

        keyboard.press("undo").unwrap();
        keyboard.press("undo").unwrap();
        assert_eq!(keyboard.state().text, "a");

        assert_eq!(keyboard.press("redo").unwrap(), "ab");
        assert_eq!(keyboard.state().text, "ab");
    }

    #[test]
    fn test_single_char_key_is_auto_bound() {
        let mut keyboard = keyboard();
        assert_eq!(keyboard.binding("x"), None);

        keyboard.press("x").unwrap();

        assert_eq!(keyboard.binding("x"), Some(&Some(KeyCommand::character('x'))));
    }

    #[test]
    fn test_unknown_multi_char_key_changes_nothing() {
        let (mut keyboard, output, console) = keyboard_with_sinks();
        keyboard.press("a").unwrap();
        let before = keyboard.capture_state();

        let err = keyboard.press("ctrl+z").unwrap_err();

        assert_eq!(err, KeyboardError::UnknownKey("ctrl+z".to_string()));
        assert_eq!(keyboard.capture_state(), before);
        assert_eq!(output.lines(), vec!["a"]);
        assert_eq!(console.last(), Some("ERROR: Unknown key: ctrl+z".to_string()));
    }

    #[test]
    fn test_null_binding_is_not_auto_bound() {
        let mut keyboard = keyboard();
        keyboard.bind("q", None);

        assert_eq!(keyboard.press("q"), Err(KeyboardError::UnknownKey("q".to_string())));
        assert_eq!(keyboard.binding("q"), Some(&None));
        assert!(keyboard.state().text.is_empty());
    }

    #[test]
    fn test_bind_overwrites_and_unbind_removes() {
        let mut keyboard = keyboard();
        keyboard.bind("k", Some(KeyCommand::volume_up(5)));
        keyboard.bind("k", Some(KeyCommand::MediaPlayer));
        assert_eq!(keyboard.binding("k"), Some(&Some(KeyCommand::MediaPlayer)));

        assert_eq!(keyboard.unbind("k"), Some(Some(KeyCommand::MediaPlayer)));
        assert_eq!(keyboard.binding("k"), None);

        keyboard.press("k").unwrap();
        assert_eq!(keyboard.state().text, "k");
    }

    #[test]
    fn test_presses_then_undos_restore_state() {
        let mut keyboard = keyboard();
        with_default_binds(&mut keyboard);
        keyboard.press("z").unwrap();
        let start = keyboard.state().clone();

        let keys = ["h", "ctrl++", "i", "ctrl+p", "ctrl+-", "ctrl+-", "!"];
        for key in keys {
            keyboard.press(key).unwrap();
        }
        assert_ne!(keyboard.state(), &start);

        for _ in keys {
            keyboard.undo().unwrap();
        }
        assert_eq!(keyboard.state(), &start);
    }

    #[test]
    fn test_undos_then_redos_restore_state() {
        let mut keyboard = keyboard();
        with_default_binds(&mut keyboard);
        for key in ["a", "ctrl++", "b", "ctrl+p", "ctrl+-"] {
            keyboard.press(key).unwrap();
        }
        let before = keyboard.state().clone();

        for _ in 0..4 {
            keyboard.press("undo").unwrap();
        }
        for _ in 0..4 {
            keyboard.press("redo").unwrap();
        }

        assert_eq!(keyboard.state(), &before);
        assert!(keyboard.history().forward.is_empty());
        assert_eq!(keyboard.history().back.len(), 5);
    }

    #[test]
    fn test_volume_up_twice_then_undone_has_no_drift() {
        let mut keyboard = keyboard();
        with_default_binds(&mut keyboard);

        keyboard.press("ctrl++").unwrap();
        assert_eq!(keyboard.press("ctrl++").unwrap(), "volume increased +20% (40%)");
        keyboard.undo().unwrap();
        assert_eq!(keyboard.undo().unwrap(), "volume decreased +20% (0%)");

        assert_eq!(keyboard.state().volume, 0);
    }

    #[test]
    fn test_new_press_clears_redo() {
        let mut keyboard = keyboard();
        keyboard.press("a").unwrap();
        keyboard.press("b").unwrap();
        keyboard.undo().unwrap();
        assert_eq!(keyboard.history().forward.len(), 1);

        keyboard.press("c").unwrap();

        assert!(keyboard.history().forward.is_empty());
        assert_eq!(keyboard.redo(), Err(KeyboardError::EmptyHistory));
        assert_eq!(keyboard.state().text, "ac");
    }

    #[test]
    fn test_undo_on_empty_history() {
        let (mut keyboard, output, console) = keyboard_with_sinks();
        keyboard.bind("ctrl+p", Some(KeyCommand::MediaPlayer));
        let before = keyboard.state().clone();

        assert_eq!(keyboard.press("undo"), Err(KeyboardError::EmptyHistory));
        assert_eq!(keyboard.press("redo"), Err(KeyboardError::EmptyHistory));

        assert_eq!(keyboard.state(), &before);
        assert!(output.lines().is_empty());
        assert_eq!(console.lines(), vec!["History empty", "History empty"]);
    }

    #[test]
    fn test_actions_are_reported() {
        let (mut keyboard, output, console) = keyboard_with_sinks();
        keyboard.bind("ctrl+p", Some(KeyCommand::MediaPlayer));

        keyboard.press("ctrl+p").unwrap();
        keyboard.undo().unwrap();
        keyboard.redo().unwrap();

        assert_eq!(
            output.lines(),
            vec!["media player launched", "media player closed", "media player launched"]
        );
        assert_eq!(
            console.lines(),
            vec![
                "media player launched",
                "undo: media player closed",
                "redo: media player launched"
            ]
        );
    }

    #[test]
    fn test_capture_restore_is_noop() {
        let mut keyboard = keyboard();
        with_default_binds(&mut keyboard);
        keyboard.bind("ctrl+x", None);
        for key in ["a", "ctrl++", "b", "ctrl+p", "undo", "undo"] {
            keyboard.press(key).unwrap();
        }
        let state = keyboard.state().clone();
        let bindings = keyboard.bindings().clone();
        let history = keyboard.history().clone();

        let snapshot = keyboard.capture_state();
        keyboard.restore_state(snapshot.clone()).unwrap();

        assert_eq!(keyboard.state(), &state);
        assert_eq!(keyboard.bindings(), &bindings);
        assert_eq!(keyboard.history(), &history);
        assert_eq!(keyboard.capture_state(), snapshot);
    }

    #[test]
    fn test_restore_drops_history_keys_without_binding() {
        let mut keyboard = keyboard();
        let snapshot = Snapshot::from_json(
            r#"{
                "text": "a",
                "volume": 0,
                "media_player": false,
                "key_binds": {
                    "a": {"class": "KeyCommand", "state": {"char": "a"}},
                    "ctrl+x": null
                },
                "back_history": ["a", "gone", "ctrl+x"],
                "forward_history": ["ctrl+x", "a"]
            }"#,
        )
        .unwrap();

        keyboard.restore_state(snapshot).unwrap();

        assert_eq!(keyboard.history().back_keys(), vec!["a"]);
        assert_eq!(keyboard.history().forward_keys(), vec!["a"]);
        assert_eq!(keyboard.binding("ctrl+x"), Some(&None));
    }

    #[test]
    fn test_restore_with_bad_binding_keeps_prior_state() {
        let (mut keyboard, _output, console) = keyboard_with_sinks();
        keyboard.press("a").unwrap();
        let before = keyboard.capture_state();

        let mut snapshot = before.clone();
        snapshot.text = "replaced".to_string();
        snapshot.key_binds.insert(
            "ctrl+q".to_string(),
            Some(StoredCommand {
                class: "QuitCommand".to_string(),
                state: serde_json::json!({}),
            }),
        );

        let err = keyboard.restore_state(snapshot).unwrap_err();

        assert!(matches!(err, KeyboardError::Decode(_)));
        assert_eq!(keyboard.capture_state(), before);
        assert!(console.last().unwrap().starts_with("ERROR: "));
    }

    #[test]
    fn test_save_then_load_reconstructs_everything() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("binds.json");

        let mut first = keyboard();
        with_default_binds(&mut first);
        first.bind("ctrl+x", None);
        for key in ["a", "b", "ctrl++", "ctrl+p", "c", "undo"] {
            first.press(key).unwrap();
        }
        first.save(&path).unwrap();

        let mut second = keyboard();
        assert_eq!(second.load(&path), Ok(true));

        assert_eq!(second.state(), first.state());
        assert_eq!(second.bindings(), first.bindings());
        assert_eq!(second.history(), first.history());

        assert_eq!(second.redo().unwrap(), "abc");
    }

    #[test]
    fn test_load_missing_file_keeps_state() {
        let dir = TempDir::new().unwrap();
        let mut keyboard = keyboard();
        keyboard.press("a").unwrap();

        assert_eq!(keyboard.load(&dir.path().join("missing.json")), Ok(false));
        assert_eq!(keyboard.state().text, "a");
    }

    #[test]
    fn test_load_corrupt_file_keeps_state() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("binds.json");
        fs::write(&path, "{ not json").unwrap();
        let mut keyboard = keyboard();
        keyboard.press("a").unwrap();
        let before = keyboard.capture_state();

        assert!(matches!(keyboard.load(&path), Err(KeyboardError::Decode(_))));
        assert_eq!(keyboard.capture_state(), before);
    }

    #[test]
    fn test_save_failure_is_reported() {
        let dir = TempDir::new().unwrap();
        let (mut keyboard, _output, console) = keyboard_with_sinks();
        keyboard.press("a").unwrap();

        let result = keyboard.save(&dir.path().join("no-such-dir").join("binds.json"));

        assert!(matches!(result, Err(KeyboardError::Persistence { .. })));
        assert_eq!(keyboard.state().text, "a");
        assert!(console.last().unwrap().starts_with("ERROR: file not found"));
    }

    #[test]
    fn test_bootstrap_without_session_uses_defaults_and_saves() {
        let dir = TempDir::new().unwrap();
        let paths = paths(&dir);

        let keyboard = Keyboard::bootstrap(&paths, Reporter::silent()).unwrap();

        assert_eq!(keyboard.binding("ctrl++"), Some(&Some(KeyCommand::volume_up(20))));
        assert_eq!(keyboard.binding("ctrl+-"), Some(&Some(KeyCommand::volume_down(20))));
        assert_eq!(keyboard.binding("ctrl+p"), Some(&Some(KeyCommand::MediaPlayer)));
        assert_eq!(keyboard.state(), &DeviceState::default());

        let saved = memento::read_snapshot(&paths.binds_file).unwrap().unwrap();
        assert_eq!(saved, keyboard.capture_state());
    }

    #[test]
    fn test_bootstrap_resumes_saved_session() {
        let dir = TempDir::new().unwrap();
        let paths = paths(&dir);

        let mut first = Keyboard::bootstrap(&paths, Reporter::silent()).unwrap();
        first.press("h").unwrap();
        first.press("ctrl++").unwrap();
        first.save(&paths.binds_file).unwrap();

        let second = Keyboard::bootstrap(&paths, Reporter::silent()).unwrap();
        assert_eq!(second.state().text, "h");
        assert_eq!(second.state().volume, 20);
        assert_eq!(second.history().back_keys(), vec!["h", "ctrl++"]);
    }

    #[test]
    fn test_bootstrap_with_corrupt_session_falls_back() {
        let dir = TempDir::new().unwrap();
        let paths = paths(&dir);
        fs::write(&paths.binds_file, r#"{"text": 5}"#).unwrap();

        let keyboard = Keyboard::bootstrap(&paths, Reporter::silent()).unwrap();

        assert_eq!(keyboard.bindings().len(), 3);
        assert!(memento::read_snapshot(&paths.binds_file).unwrap().is_some());
    }

    #[test]
    fn test_bootstrap_uses_configured_default_file() {
        let dir = TempDir::new().unwrap();
        let defaults = dir.path().join("default_binds.json");
        fs::write(
            &defaults,
            r#"{"text": "hi", "volume": 50, "media_player": false,
                "key_binds": {"ctrl+m": {"class": "MediaPlayerCommand", "state": {}}}}"#,
        )
        .unwrap();
        let paths = StatePaths {
            binds_file: dir.path().join("binds.json"),
            default_binds_file: Some(defaults),
        };

        let keyboard = Keyboard::bootstrap(&paths, Reporter::silent()).unwrap();

        assert_eq!(keyboard.state().text, "hi");
        assert_eq!(keyboard.state().volume, 50);
        assert_eq!(keyboard.binding("ctrl+m"), Some(&Some(KeyCommand::MediaPlayer)));
    }

    #[test]
    fn test_bootstrap_fails_on_bad_default_file() {
        let dir = TempDir::new().unwrap();
        let defaults = dir.path().join("default_binds.json");
        fs::write(
            &defaults,
            r#"{"text": "", "volume": 0, "media_player": false,
                "key_binds": {"x": {"class": "Nope", "state": {}}}}"#,
        )
        .unwrap();
        let mut paths = StatePaths {
            binds_file: dir.path().join("binds.json"),
            default_binds_file: Some(defaults),
        };

        assert!(Keyboard::bootstrap(&paths, Reporter::silent()).is_err());
        assert!(!paths.binds_file.exists());

        paths.default_binds_file = Some(dir.path().join("missing_defaults.json"));
        assert!(Keyboard::bootstrap(&paths, Reporter::silent()).is_err());
    }

    #[test]
    fn test_bundled_defaults_are_valid() {
        let snapshot = Snapshot::from_json(EMBEDDED_DEFAULT_BINDS).unwrap();
        assert!(decode_snapshot(snapshot).is_ok());
    }

    #[test]
    fn test_press_near_volume_limit_does_not_panic() {
        let mut keyboard = keyboard();
        let snapshot = Snapshot::from_json(
            r#"{
                "text": "",
                "volume": 9223372036854775800,
                "media_player": false,
                "key_binds": {
                    "ctrl++": {"class": "VolumeUpCommand", "state": {"amount": 20}}
                }
            }"#,
        )
        .unwrap();
        keyboard.restore_state(snapshot).unwrap();

        assert!(keyboard.press("ctrl++").is_ok());
        keyboard.undo().unwrap();

        assert_eq!(keyboard.state().volume, 9223372036854775800);
    }

    mod proptest_keyboard {
        use super::*;
        use proptest::prelude::*;

        fn key_strategy() -> impl Strategy<Value = String> {
            prop_oneof![
                "[a-z]",
                Just("ctrl++".to_string()),
                Just("ctrl+-".to_string()),
                Just("ctrl+p".to_string()),
            ]
        }

        fn seeded_keyboard(text: String, volume: i64, up: i64, down: i64) -> Keyboard {
            let mut keyboard = keyboard();
            keyboard.state = DeviceState::new(text, volume, false);
            keyboard.bind("ctrl++", Some(KeyCommand::volume_up(up)));
            keyboard.bind("ctrl+-", Some(KeyCommand::volume_down(down)));
            keyboard.bind("ctrl+p", Some(KeyCommand::MediaPlayer));
            keyboard.bind("ctrl+x", None);
            keyboard
        }

        proptest! {
            #[test]
            fn presses_then_as_many_undos_restore_state(
                text in "[a-z]{0,5}",
                volume in any::<i64>(),
                up in any::<i64>(),
                down in any::<i64>(),
                keys in proptest::collection::vec(key_strategy(), 0..30),
            ) {
                let mut keyboard = seeded_keyboard(text, volume, up, down);
                let start = keyboard.state().clone();

                for key in &keys {
                    prop_assert!(keyboard.press(key).is_ok());
                }
                for _ in &keys {
                    prop_assert!(keyboard.undo().is_ok());
                }

                prop_assert_eq!(keyboard.state(), &start);
                prop_assert!(keyboard.history().back.is_empty());
                prop_assert_eq!(keyboard.history().forward.len(), keys.len());
            }

            #[test]
            fn undos_then_as_many_redos_restore_state(
                volume in any::<i64>(),
                up in any::<i64>(),
                down in any::<i64>(),
                keys in proptest::collection::vec(key_strategy(), 0..30),
                undos in 0usize..30,
            ) {
                let mut keyboard = seeded_keyboard(String::new(), volume, up, down);
                for key in &keys {
                    keyboard.press(key).unwrap();
                }
                let before = keyboard.state().clone();
                let back_keys = keyboard.history().back_keys();
                let undos = undos.min(keys.len());

                for _ in 0..undos {
                    prop_assert!(keyboard.press("undo").is_ok());
                }
                for _ in 0..undos {
                    prop_assert!(keyboard.press("redo").is_ok());
                }

                prop_assert_eq!(keyboard.state(), &before);
                prop_assert_eq!(keyboard.history().back_keys(), back_keys);
                prop_assert!(keyboard.history().forward.is_empty());
            }

            #[test]
            fn capture_then_restore_changes_nothing(
                text in "[a-z]{0,5}",
                volume in any::<i64>(),
                up in any::<i64>(),
                down in any::<i64>(),
                keys in proptest::collection::vec(key_strategy(), 0..30),
                undos in 0usize..30,
            ) {
                let mut keyboard = seeded_keyboard(text, volume, up, down);
                for key in &keys {
                    keyboard.press(key).unwrap();
                }
                for _ in 0..undos.min(keys.len()) {
                    keyboard.undo().unwrap();
                }
                let state = keyboard.state().clone();
                let bindings = keyboard.bindings().clone();
                let history = keyboard.history().clone();

                let snapshot = keyboard.capture_state();
                prop_assert!(keyboard.restore_state(snapshot.clone()).is_ok());

                prop_assert_eq!(keyboard.state(), &state);
                prop_assert_eq!(keyboard.bindings(), &bindings);
                prop_assert_eq!(keyboard.history(), &history);
                prop_assert_eq!(keyboard.capture_state(), snapshot);
            }
        }
    }
}
