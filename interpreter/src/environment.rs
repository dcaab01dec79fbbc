use std::collections::HashMap;

use ast::Value;
use log::trace;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("undefined variable '{0}'")]
pub struct Undefined(pub String);

/// Chain of scope frames, innermost last.
///
/// Frames nest strictly with the constructs that open them, so the chain is a
/// stack: frame `i` is the parent of frame `i + 1`, and the root frame at
/// index 0 is never popped.
#[derive(Debug)]
pub struct Environment {
    frames: Vec<HashMap<String, Value>>,
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment {
    pub fn new() -> Self {
        Self {
            frames: vec![HashMap::new()],
        }
    }

    /// Number of live frames, including the root.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn push_scope(&mut self) {
        self.frames.push(HashMap::new());
        trace!("entered scope {}", self.frames.len());
    }

    pub fn pop_scope(&mut self) {
        if self.frames.len() > 1 {
            trace!("leaving scope {}", self.frames.len());
            self.frames.pop();
        }
    }

    /// Binds `name` in the innermost frame, replacing any binding of the same
    /// name in that frame and shadowing outer ones.
    pub fn declare(&mut self, name: &str, value: Value) {
        if let Some(frame) = self.frames.last_mut() {
            frame.insert(name.to_string(), value);
        }
    }

    /// Overwrites the binding in the nearest frame that declares `name`.
    pub fn assign(&mut self, name: &str, value: Value) -> Result<(), Undefined> {
        let slot = self
            .frames
            .iter_mut()
            .rev()
            .find_map(|frame| frame.get_mut(name))
            .ok_or_else(|| Undefined(name.to_string()))?;
        *slot = value;
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Result<&Value, Undefined> {
        self.frames
            .iter()
            .rev()
            .find_map(|frame| frame.get(name))
            .ok_or_else(|| Undefined(name.to_string()))
    }
}
