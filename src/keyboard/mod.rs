pub mod command;
pub mod error;
pub mod history;
pub mod log;
pub mod memento;
pub mod processor;
pub mod state;

pub use command::KeyCommand;
pub use error::KeyboardError;
pub use log::{ConsoleSink, FileSink, MemorySink, Reporter};
pub use processor::{Keyboard, StatePaths};
