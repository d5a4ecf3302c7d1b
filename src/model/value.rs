use std::fmt;

use serde::{Deserialize, Serialize};

/// A single table cell.
///
/// Cells are heterogeneous: metadata columns may hold text, integers, floats
/// or booleans, and computed descriptor columns are `Null` when the molecule
/// could not be parsed.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Value {
    /// Infers a typed value from a raw text field.
    ///
    /// Empty fields become [`Value::Null`]; `true`/`false` (any case) become
    /// booleans; integers and floats are recognized before falling back to text.
    ///
    /// A number is only recognized when it renders back to the same text, so
    /// identifiers such as `007`, `+5` or `1.10` stay text and keep their
    /// identity as molecule names.
    pub fn infer(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Value::Null;
        }
        if trimmed.eq_ignore_ascii_case("true") {
            return Value::Bool(true);
        }
        if trimmed.eq_ignore_ascii_case("false") {
            return Value::Bool(false);
        }
        if let Ok(i) = trimmed.parse::<i64>() {
            if i.to_string() == trimmed {
                return Value::Int(i);
            }
        }
        if let Ok(f) = trimmed.parse::<f64>() {
            if f.is_finite() && f.to_string() == trimmed {
                return Value::Float(f);
            }
        }
        Value::Text(raw.to_string())
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Textual identity used for keys and duplicate detection.
    ///
    /// `Null` maps to the empty string, so all unnamed rows share one key.
    pub fn to_key(&self) -> String {
        match self {
            Value::Null => String::new(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{}", if *b { "True" } else { "False" }),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Value::Int(n as i64)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infer_recognizes_each_kind() {
        assert_eq!(Value::infer(""), Value::Null);
        assert_eq!(Value::infer("   "), Value::Null);
        assert_eq!(Value::infer("TRUE"), Value::Bool(true));
        assert_eq!(Value::infer("false"), Value::Bool(false));
        assert_eq!(Value::infer("42"), Value::Int(42));
        assert_eq!(Value::infer("-7"), Value::Int(-7));
        assert_eq!(Value::infer("3.5"), Value::Float(3.5));
        assert_eq!(Value::infer("CCO"), Value::Text("CCO".into()));
    }

    #[test]
    fn infer_keeps_non_finite_floats_as_text() {
        assert_eq!(Value::infer("NaN"), Value::Text("NaN".into()));
        assert_eq!(Value::infer("inf"), Value::Text("inf".into()));
    }

    #[test]
    fn infer_keeps_reformattable_numbers_as_text() {
        assert_eq!(Value::infer("007"), Value::Text("007".into()));
        assert_eq!(Value::infer("+5"), Value::Text("+5".into()));
        assert_eq!(Value::infer("1.10"), Value::Text("1.10".into()));
        assert_eq!(Value::infer("1e3"), Value::Text("1e3".into()));
        assert_eq!(Value::infer("1.1"), Value::Float(1.1));
        assert_ne!(Value::infer("007").to_key(), Value::infer("7").to_key());
    }

    #[test]
    fn key_of_null_is_empty() {
        assert_eq!(Value::Null.to_key(), "");
        assert_eq!(Value::Int(12).to_key(), "12");
        assert_eq!(Value::from("aspirin").to_key(), "aspirin");
    }

    #[test]
    fn accessors_match_variants() {
        assert_eq!(Value::Int(2).as_f64(), Some(2.0));
        assert_eq!(Value::Float(2.5).as_f64(), Some(2.5));
        assert_eq!(Value::from("x").as_f64(), None);
        assert_eq!(Value::Bool(true).as_bool(), Some(true));
        assert_eq!(Value::from("x").as_str(), Some("x"));
        assert!(Value::Null.is_null());
    }

    #[test]
    fn display_booleans_like_spreadsheets() {
        assert_eq!(Value::Bool(true).to_string(), "True");
        assert_eq!(Value::Bool(false).to_string(), "False");
        assert_eq!(Value::Null.to_string(), "");
    }
}
