use crate::keyboard::state::DeviceState;
use std::fmt;

pub const DEFAULT_VOLUME_STEP: i64 = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyCommand {
    Character { ch: char },
    VolumeUp { amount: i64 },
    VolumeDown { amount: i64 },
    MediaPlayer,
}

impl KeyCommand {
    pub fn character(ch: char) -> Self {
        Self::Character { ch }
    }

    pub fn volume_up(amount: i64) -> Self {
        Self::VolumeUp { amount }
    }

    pub fn volume_down(amount: i64) -> Self {
        Self::VolumeDown { amount }
    }

    pub fn volume_up_default() -> Self {
        Self::volume_up(DEFAULT_VOLUME_STEP)
    }

    pub fn volume_down_default() -> Self {
        Self::volume_down(DEFAULT_VOLUME_STEP)
    }

    pub fn tag(&self) -> &'static str {
        match self {
            Self::Character { .. } => "KeyCommand",
            Self::VolumeUp { .. } => "VolumeUpCommand",
            Self::VolumeDown { .. } => "VolumeDownCommand",
            Self::MediaPlayer => "MediaPlayerCommand",
        }
    }

    pub fn execute(&self, state: &mut DeviceState) -> String {
        match self {
            Self::Character { ch } => {
                state.text.push(*ch);
                state.text.clone()
            }
            Self::VolumeUp { amount } => {
                state.volume = state.volume.wrapping_add(*amount);
                format!("volume increased +{}% ({}%)", amount, state.volume)
            }
            Self::VolumeDown { amount } => {
                state.volume = state.volume.wrapping_sub(*amount);
                format!("volume decreased -{}% ({}%)", amount, state.volume)
            }
            Self::MediaPlayer => {
                state.media_player = true;
                "media player launched".to_string()
            }
        }
    }

    pub fn undo(&self, state: &mut DeviceState) -> String {
        match self {
            Self::Character { .. } => {
                state.text.pop();
                state.text.clone()
            }
            Self::VolumeUp { amount } => {
                state.volume = state.volume.wrapping_sub(*amount);
                format!("volume decreased +{}% ({}%)", amount, state.volume)
            }
            Self::VolumeDown { amount } => {
                state.volume = state.volume.wrapping_add(*amount);
                format!("volume increased -{}% ({}%)", amount, state.volume)
            }
            Self::MediaPlayer => {
                state.media_player = false;
                "media player closed".to_string()
            }
        }
    }

    pub fn redo(&self, state: &mut DeviceState) -> String {
        self.execute(state)
    }
}

impl fmt::Display for KeyCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Character { ch } => write!(f, "type '{}'", ch),
            Self::VolumeUp { amount } => write!(f, "volume +{}", amount),
            Self::VolumeDown { amount } => write!(f, "volume -{}", amount),
            Self::MediaPlayer => write!(f, "media player"),
        }
    }
}
