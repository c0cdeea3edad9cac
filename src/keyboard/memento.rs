use crate::keyboard::command::{DEFAULT_VOLUME_STEP, KeyCommand};
use crate::keyboard::error::KeyboardError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use tempfile::NamedTempFile;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub text: String,
    pub volume: i64,
    pub media_player: bool,
    #[serde(default)]
    pub key_binds: BTreeMap<String, Option<StoredCommand>>,
    #[serde(default)]
    pub back_history: Vec<String>,
    #[serde(default)]
    pub forward_history: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredCommand {
    pub class: String,
    #[serde(default)]
    pub state: Value,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct CharacterParams {
    #[serde(rename = "char")]
    ch: String,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct VolumeParams {
    #[serde(default = "default_volume_step")]
    amount: i64,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct NoParams {}

fn default_volume_step() -> i64 {
    DEFAULT_VOLUME_STEP
}

fn params<T: for<'de> Deserialize<'de>>(class: &str, state: &Value) -> Result<T, KeyboardError> {
    // A missing parameter record means "no parameters".
    let state = if state.is_null() {
        Value::Object(Default::default())
    } else {
        state.clone()
    };
    serde_json::from_value(state)
        .map_err(|e| KeyboardError::decode(format!("bad parameters for {}: {}", class, e)))
}

impl StoredCommand {
    pub fn encode(command: &KeyCommand) -> Self {
        let state = match command {
            KeyCommand::Character { ch } => serde_json::json!({ "char": ch.to_string() }),
            KeyCommand::VolumeUp { amount } | KeyCommand::VolumeDown { amount } => {
                serde_json::json!({ "amount": amount })
            }
            KeyCommand::MediaPlayer => Value::Object(Default::default()),
        };
        Self {
            class: command.tag().to_string(),
            state,
        }
    }

    pub fn decode(&self) -> Result<KeyCommand, KeyboardError> {
        match self.class.as_str() {
            "KeyCommand" => {
                let p: CharacterParams = params(&self.class, &self.state)?;
                let mut chars = p.ch.chars();
                match (chars.next(), chars.next()) {
                    (Some(ch), None) => Ok(KeyCommand::character(ch)),
                    _ => Err(KeyboardError::decode(format!(
                        "KeyCommand needs exactly one character, got {:?}",
                        p.ch
                    ))),
                }
            }
            "VolumeUpCommand" => {
                let p: VolumeParams = params(&self.class, &self.state)?;
                Ok(KeyCommand::volume_up(p.amount))
            }
            "VolumeDownCommand" => {
                let p: VolumeParams = params(&self.class, &self.state)?;
                Ok(KeyCommand::volume_down(p.amount))
            }
            "MediaPlayerCommand" => {
                let _: NoParams = params(&self.class, &self.state)?;
                Ok(KeyCommand::MediaPlayer)
            }
            other => Err(KeyboardError::decode(format!("unknown command class: {}", other))),
        }
    }
}

impl Snapshot {
    pub fn from_json(content: &str) -> Result<Self, KeyboardError> {
        serde_json::from_str(content).map_err(|e| KeyboardError::decode(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut serializer)?;
        // serde_json only emits valid UTF-8
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

pub fn read_snapshot(path: &Path) -> Result<Option<Snapshot>, KeyboardError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(KeyboardError::persistence(path, &e)),
    };
    Snapshot::from_json(&content).map(Some)
}

pub fn write_snapshot(path: &Path, snapshot: &Snapshot) -> Result<(), KeyboardError> {
    let content = snapshot
        .to_json()
        .map_err(|e| KeyboardError::persistence(path, &io::Error::from(e)))?;

    // Write next to the target and rename over it so a reader never sees half a file.
    let dir = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut file = NamedTempFile::new_in(dir).map_err(|e| KeyboardError::persistence(path, &e))?;
    writeln!(file, "{}", content).map_err(|e| KeyboardError::persistence(path, &e))?;
    file.persist(path)
        .map_err(|e| KeyboardError::persistence(path, &e.error))?;
    Ok(())
}
