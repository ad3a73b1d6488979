//! Compile-time constants passed with `-define:`

use std::fmt;

use anyhow::{bail, Context, Result};

/// Primitive value of a define
#[derive(Debug, Clone, PartialEq)]
pub enum DefineValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    /// Numeric literal from the command line, passed on exactly as typed
    Number(String),
}

impl DefineValue {
    /// Infer a value from command-line text
    ///
    /// `true`/`false` become booleans and anything that reads as a finite
    /// integer or float becomes a [`DefineValue::Number`] holding the original
    /// text, so `1.0` stays a float literal and `007` keeps its zeros.
    /// Anything else stays a string.
    pub fn infer(text: &str) -> Self {
        match text {
            "true" => return DefineValue::Bool(true),
            "false" => return DefineValue::Bool(false),
            _ => {}
        }

        // inf/NaN spellings parse as f64 but are not Odin literals
        let numeric = text.parse::<i64>().is_ok()
            || (text.chars().any(|c| c.is_ascii_digit())
                && text.parse::<f64>().is_ok_and(f64::is_finite));

        if numeric {
            DefineValue::Number(text.to_string())
        } else {
            DefineValue::Str(text.to_string())
        }
    }

    /// Convert a manifest value
    pub fn from_toml(value: &toml::Value) -> Result<Self> {
        Ok(match value {
            toml::Value::Boolean(b) => DefineValue::Bool(*b),
            toml::Value::Integer(i) => DefineValue::Int(*i),
            toml::Value::Float(f) if f.is_finite() => DefineValue::Float(*f),
            toml::Value::Float(f) => bail!("expected a finite number, found {}", f),
            toml::Value::String(s) => DefineValue::Str(s.clone()),
            other => bail!(
                "expected a boolean, number or string, found {}",
                other.type_str()
            ),
        })
    }
}

impl fmt::Display for DefineValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefineValue::Bool(b) => write!(f, "{}", b),
            DefineValue::Int(i) => write!(f, "{}", i),
            // Debug keeps the decimal point: 1.0 renders as "1.0", not "1"
            DefineValue::Float(x) => write!(f, "{:?}", x),
            DefineValue::Str(s) | DefineValue::Number(s) => f.write_str(s),
        }
    }
}

impl From<bool> for DefineValue {
    fn from(value: bool) -> Self {
        DefineValue::Bool(value)
    }
}

impl From<i64> for DefineValue {
    fn from(value: i64) -> Self {
        DefineValue::Int(value)
    }
}

impl From<i32> for DefineValue {
    fn from(value: i32) -> Self {
        DefineValue::Int(value.into())
    }
}

impl From<f64> for DefineValue {
    fn from(value: f64) -> Self {
        DefineValue::Float(value)
    }
}

impl From<&str> for DefineValue {
    fn from(value: &str) -> Self {
        DefineValue::Str(value.to_string())
    }
}

impl From<String> for DefineValue {
    fn from(value: String) -> Self {
        DefineValue::Str(value)
    }
}

/// Parse a `NAME=VALUE` command-line define
///
/// A bare `NAME` is shorthand for `NAME=true`.
pub fn parse_define(text: &str) -> Result<(String, DefineValue)> {
    let (name, value) = match text.split_once('=') {
        Some((name, value)) => (name.trim(), DefineValue::infer(value)),
        None => (text.trim(), DefineValue::Bool(true)),
    };

    if name.is_empty() {
        bail!("define '{}' has an empty name", text);
    }

    crate::config::validation::validate_identifier("define", name)
        .with_context(|| format!("Invalid define '{}'", text))?;

    Ok((name.to_string(), value))
}
