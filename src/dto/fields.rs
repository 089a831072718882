//! Loosely typed JSON inputs that are normalized field by field.
//!
//! Clients (forms especially) send numbers as strings and single thumbnails as
//! bare strings; these types accept those shapes and leave the judgement of
//! what is valid to the services.

use serde::Deserialize;

/// A number, or a string that should hold one. Any other JSON value is kept
/// as-is and reads as no number at all.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Numeric {
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

impl Numeric {
    /// The finite value, if there is one.
    pub fn as_f64(&self) -> Option<f64> {
        let value = match self {
            Numeric::Number(n) => *n,
            Numeric::Text(s) => s.trim().parse::<f64>().ok()?,
            Numeric::Other(_) => return None,
        };
        value.is_finite().then_some(value)
    }
}

impl From<f64> for Numeric {
    fn from(value: f64) -> Self {
        Numeric::Number(value)
    }
}

impl From<i64> for Numeric {
    fn from(value: i64) -> Self {
        Numeric::Number(value as f64)
    }
}

/// A boolean sent as a bool, a 0/1 number or a form-style string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Flag {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl Flag {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Flag::Bool(b) => Some(*b),
            Flag::Number(n) if *n == 0.0 => Some(false),
            Flag::Number(n) if *n == 1.0 => Some(true),
            Flag::Number(_) => None,
            Flag::Text(s) => parse_bool(s),
        }
    }
}

impl From<bool> for Flag {
    fn from(value: bool) -> Self {
        Flag::Bool(value)
    }
}

/// Parses the textual booleans accepted in bodies and query strings.
pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "on" | "1" => Some(true),
        "false" | "off" | "0" => Some(false),
        _ => None,
    }
}

/// Either a list of strings or a single one.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    Many(Vec<String>),
    One(String),
}

impl OneOrMany {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            OneOrMany::Many(items) => items,
            OneOrMany::One(item) => vec![item],
        }
    }
}
