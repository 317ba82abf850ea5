use serde::{Deserialize, Serialize};

/// A single cell value as returned by a query executor.
///
/// Warehouse drivers are loose about types: numeric columns can arrive as
/// text, so coercion lives here rather than in every consumer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Number(f64),
    Text(String),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Coerce to a number. Text is parsed after trimming; anything that
    /// doesn't parse (or is null) yields None.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Null => None,
            Value::Number(n) => Some(*n),
            Value::Text(s) => s.trim().parse::<f64>().ok(),
        }
    }

    /// Display form used for group labels and cell rendering.
    /// Whole numbers drop the trailing ".0" so years read as "2023".
    pub fn display(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    format!("{n}")
                }
            }
            Value::Text(s) => s.clone(),
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
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}
