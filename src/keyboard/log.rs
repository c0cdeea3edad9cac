use std::cell::RefCell;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::rc::Rc;

pub trait LogSink {
    fn write(&mut self, line: &str);
}

pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl LogSink for FileSink {
    fn write(&mut self, line: &str) {
        let result = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .and_then(|mut file| writeln!(file, "{}", line));

        if let Err(e) = result {
            tracing::warn!(path = %self.path.display(), error = %e, "failed to append to output log");
        }
    }
}

pub struct ConsoleSink;

impl LogSink for ConsoleSink {
    fn write(&mut self, line: &str) {
        println!("{}", line);
    }
}

#[cfg(test)]
pub struct NullSink;

#[cfg(test)]
impl LogSink for NullSink {
    fn write(&mut self, _line: &str) {}
}

// Clones share the same buffer.
#[derive(Clone, Default, Debug)]
pub struct MemorySink {
    lines: Rc<RefCell<Vec<String>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn lines(&self) -> Vec<String> {
        self.lines.borrow().clone()
    }

    #[cfg(test)]
    pub fn last(&self) -> Option<String> {
        self.lines.borrow().last().cloned()
    }

    pub fn tail(&self, count: usize) -> Vec<String> {
        let lines = self.lines.borrow();
        let start = lines.len().saturating_sub(count);
        lines[start..].to_vec()
    }
}

impl LogSink for MemorySink {
    fn write(&mut self, line: &str) {
        self.lines.borrow_mut().push(line.to_string());
    }
}

// The action log only receives bare command results. The console gets a line for everything.
pub struct Reporter {
    output: Box<dyn LogSink>,
    console: Box<dyn LogSink>,
}

impl Reporter {
    pub fn new(output: Box<dyn LogSink>, console: Box<dyn LogSink>) -> Self {
        Self { output, console }
    }

    #[cfg(test)]
    pub fn silent() -> Self {
        Self::new(Box::new(NullSink), Box::new(NullSink))
    }

    pub fn action(&mut self, label: Option<&str>, message: &str) {
        self.output.write(message);
        let line = match label {
            Some(label) => format!("{}: {}", label, message),
            None => message.to_string(),
        };
        self.console.write(&line);
    }

    pub fn status(&mut self, line: &str) {
        self.console.write(line);
    }

    pub fn error(&mut self, err: &dyn std::fmt::Display) {
        tracing::debug!(error = %err, "keyboard operation failed");
        self.console.write(&format!("ERROR: {}", err));
    }
}
