use std::fmt;

#[derive(Debug)]
pub enum ConfigError {
    /// YAML parse / deserialization error.
    Parse(String),
    /// Structural validation error (missing field, duplicate name, etc.).
    Validation(String),
    /// File read error.
    Io(String),
    /// Date string that matches none of the accepted formats.
    DateParse(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(msg) => write!(f, "config parse error: {msg}"),
            Self::Validation(msg) => write!(f, "config validation error: {msg}"),
            Self::Io(msg) => write!(f, "IO error: {msg}"),
            Self::DateParse(value) => write!(f, "cannot parse date '{value}'"),
        }
    }
}

impl std::error::Error for ConfigError {}
