//! Program I/O behind traits, so tests can capture output and script input.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::{BufRead, Write};
use std::rc::Rc;

pub trait PrintHandler {
    fn write(&mut self, text: &str);

    fn writeln(&mut self, text: &str) {
        self.write(text);
        self.write("\n");
    }
}

pub trait InputSource {
    /// One line of input, trailing newline stripped; empty at end of input.
    fn read_line(&mut self) -> String;
}

/// Writes straight to stdout, flushing so prompts without a newline show
/// up before the read blocks.
#[derive(Default)]
pub struct StdoutPrinter;

impl PrintHandler for StdoutPrinter {
    fn write(&mut self, text: &str) {
        print!("{text}");
        let _ = std::io::stdout().flush();
    }
}

#[derive(Default)]
pub struct StdinInput;

impl InputSource for StdinInput {
    fn read_line(&mut self) -> String {
        let mut line = String::new();
        let _ = std::io::stdin().lock().read_line(&mut line);
        while line.ends_with('\n') || line.ends_with('\r') {
            line.pop();
        }
        line
    }
}

/// Accumulates output into a shared buffer the test keeps a handle to.
pub struct BufferPrinter {
    buffer: Rc<RefCell<String>>,
}

impl BufferPrinter {
    pub fn new() -> Self {
        BufferPrinter {
            buffer: Rc::new(RefCell::new(String::new())),
        }
    }

    pub fn handle(&self) -> Rc<RefCell<String>> {
        self.buffer.clone()
    }
}

impl Default for BufferPrinter {
    fn default() -> Self {
        BufferPrinter::new()
    }
}

impl PrintHandler for BufferPrinter {
    fn write(&mut self, text: &str) {
        self.buffer.borrow_mut().push_str(text);
    }
}

/// Feeds a fixed sequence of lines, then empty strings.
#[derive(Default)]
pub struct ScriptedInput {
    lines: VecDeque<String>,
}

impl ScriptedInput {
    pub fn new(lines: impl IntoIterator<Item = impl Into<String>>) -> Self {
        ScriptedInput {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }
}

impl InputSource for ScriptedInput {
    fn read_line(&mut self) -> String {
        self.lines.pop_front().unwrap_or_default()
    }
}
