#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DeviceState {
    pub text: String,
    pub volume: i64,
    pub media_player: bool,
}

impl DeviceState {
    pub fn new(text: String, volume: i64, media_player: bool) -> Self {
        Self {
            text,
            volume,
            media_player,
        }
    }
}
