use std::{
    collections::VecDeque,
    io::{self, BufRead, Write},
};

use ast::{parse_number_literal, Value};

/// Receives the values of one `print` statement.
pub trait Output {
    fn print(&mut self, values: &[Value]) -> io::Result<()>;
}

/// Supplies one line per `input` statement; `Ok(None)` once exhausted.
pub trait Input {
    fn read_line(&mut self) -> io::Result<Option<String>>;
}

fn join(values: &[Value], separator: &str) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(separator)
}

/// Writes each `print` as one line on stdout.
#[derive(Debug, Clone)]
pub struct StdOutput {
    separator: String,
}

impl Default for StdOutput {
    fn default() -> Self {
        Self::with_separator(" ")
    }
}

impl StdOutput {
    pub fn with_separator<S: Into<String>>(separator: S) -> Self {
        Self {
            separator: separator.into(),
        }
    }
}

impl Output for StdOutput {
    fn print(&mut self, values: &[Value]) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{}", join(values, &self.separator))?;
        stdout.flush()
    }
}

/// Collects each `print` as one line in memory.
#[derive(Debug, Clone)]
pub struct BufferOutput {
    separator: String,
    lines: Vec<String>,
}

impl Default for BufferOutput {
    fn default() -> Self {
        Self::with_separator(" ")
    }
}

impl BufferOutput {
    pub fn with_separator<S: Into<String>>(separator: S) -> Self {
        Self {
            separator: separator.into(),
            lines: vec![],
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

impl Output for BufferOutput {
    fn print(&mut self, values: &[Value]) -> io::Result<()> {
        self.lines.push(join(values, &self.separator));
        Ok(())
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct StdInput;

impl Input for StdInput {
    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line)? {
            0 => Ok(None),
            _ => Ok(Some(line)),
        }
    }
}

/// Serves a fixed list of lines, then reports end of input.
#[derive(Debug, Default, Clone)]
pub struct ScriptedInput {
    lines: VecDeque<String>,
}

impl ScriptedInput {
    pub fn new<L: Into<String>>(lines: impl IntoIterator<Item = L>) -> Self {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }
}

impl Input for ScriptedInput {
    fn read_line(&mut self) -> io::Result<Option<String>> {
        Ok(self.lines.pop_front())
    }
}

/// Turns a line read by `input` into a value: a number when the text (without
/// its line terminator and surrounding blanks) is a numeric literal, otherwise
/// the line itself as a string.
pub fn classify_input(line: &str) -> Value {
    let line = line
        .strip_suffix('\n')
        .map(|l| l.strip_suffix('\r').unwrap_or(l))
        .unwrap_or(line);

    match parse_number_literal(line.trim()) {
        Some(n) => Value::Number(n),
        None => Value::String(line.to_string()),
    }
}
