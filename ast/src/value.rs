use std::fmt::{self, Display, Formatter};

/// Runtime value. Values are copied into and out of variables, never shared.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Number(f64),
    String(String),
    Boolean(bool),
    Uninitialized,
}

impl Value {
    /// Zero, the empty string, `false` and `Uninitialized` are falsy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Number(n) => *n != 0.0,
            Value::String(s) => !s.is_empty(),
            Value::Boolean(b) => *b,
            Value::Uninitialized => false,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Boolean(_) => "boolean",
            Value::Uninitialized => "uninitialized",
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{n}"),
            Value::String(s) => write!(f, "{s}"),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Uninitialized => write!(f, "uninitialized"),
        }
    }
}

/// Parses `text` if it is a numeric literal: `digits` or `digits.digits`.
///
/// Signs and exponents are not part of the literal syntax, so `-1` and `1e3`
/// are rejected here.
pub fn parse_number_literal(text: &str) -> Option<f64> {
    let (whole, fraction) = match text.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (text, None),
    };

    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(whole) || !fraction.map_or(true, all_digits) {
        return None;
    }

    text.parse().ok()
}
