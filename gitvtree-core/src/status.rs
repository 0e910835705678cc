use std::io::Write;

use chrono::Local;

/// Receives human-readable progress messages, synchronously and in order
pub trait StatusSink {
    fn report(&mut self, message: &str);
}

impl<F: FnMut(&str)> StatusSink for F {
    fn report(&mut self, message: &str) {
        self(message)
    }
}

/// Collects messages, mostly for tests
impl StatusSink for Vec<String> {
    fn report(&mut self, message: &str) {
        self.push(message.to_string());
    }
}

/// Writes `YYYY-MM-DD HH:MM:SS - message` lines
pub struct ConsoleStatus<W> {
    out: W,
}

impl<W: Write> ConsoleStatus<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> StatusSink for ConsoleStatus<W> {
    fn report(&mut self, message: &str) {
        let now = Local::now().format("%Y-%m-%d %H:%M:%S");
        // status output is best effort
        let _ = writeln!(self.out, "{now} - {message}");
        let _ = self.out.flush();
    }
}
