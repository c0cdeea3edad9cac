use crate::keyboard::command::KeyCommand;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryEntry {
    pub key: String,
    pub command: KeyCommand,
}

impl HistoryEntry {
    pub fn new(key: String, command: KeyCommand) -> Self {
        Self { key, command }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct History {
    pub back: Vec<HistoryEntry>,
    pub forward: Vec<HistoryEntry>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    // A new entry invalidates anything undone before it.
    pub fn record(&mut self, entry: HistoryEntry) {
        self.back.push(entry);
        self.forward.clear();
    }

    pub fn pop_back(&mut self) -> Option<HistoryEntry> {
        self.back.pop()
    }

    pub fn pop_forward(&mut self) -> Option<HistoryEntry> {
        self.forward.pop()
    }

    pub fn push_back(&mut self, entry: HistoryEntry) {
        self.back.push(entry);
    }

    pub fn push_forward(&mut self, entry: HistoryEntry) {
        self.forward.push(entry);
    }

    pub fn back_keys(&self) -> Vec<String> {
        self.back.iter().map(|entry| entry.key.clone()).collect()
    }

    pub fn forward_keys(&self) -> Vec<String> {
        self.forward.iter().map(|entry| entry.key.clone()).collect()
    }
}
