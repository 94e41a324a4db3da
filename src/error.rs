use std::{fmt, io};

use regex::Error as RegexError;
use serde::{Deserialize, Serialize};
use serde_json::Error as JsonError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
pub enum WikiGraphError {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Custom error: {0}")]
    Custom(String),
    #[error("File System error: {0}")]
    Io(String),
    #[error("Malformed input: {0}")]
    MalformedInput(String),
    #[error("Item Not Found: {0}")]
    NotFound(String),
    #[error("(De)Serialization error: {0}")]
    Serialization(String),
}

impl WikiGraphError {
    /// Whether a batch run may skip the offending record and keep going.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, WikiGraphError::MalformedInput(_))
    }
}

impl From<toml::de::Error> for WikiGraphError {
    fn from(src: toml::de::Error) -> WikiGraphError {
        WikiGraphError::Config(format!("Toml deserialization error: {src}"))
    }
}

impl From<toml::ser::Error> for WikiGraphError {
    fn from(src: toml::ser::Error) -> WikiGraphError {
        WikiGraphError::Serialization(format!("Toml serialization error: {src}"))
    }
}

impl From<JsonError> for WikiGraphError {
    fn from(src: JsonError) -> WikiGraphError {
        if src.is_data() {
            WikiGraphError::MalformedInput(format!("JSON record error: {src}"))
        } else {
            WikiGraphError::Serialization(format!("JSON (de)serialization error: {src}"))
        }
    }
}

impl From<io::Error> for WikiGraphError {
    fn from(x: io::Error) -> Self {
        match x.kind() {
            io::ErrorKind::NotFound => WikiGraphError::NotFound(format!("{x}")),
            io::ErrorKind::InvalidData => WikiGraphError::MalformedInput(format!("{x}")),
            _ => WikiGraphError::Io(format!("IOError: {}", x.kind())),
        }
    }
}

impl From<walkdir::Error> for WikiGraphError {
    fn from(x: walkdir::Error) -> Self {
        let path = x.path().map(|p| p.display().to_string()).unwrap_or_default();
        match x.into_io_error() {
            Some(io_error) if io_error.kind() == io::ErrorKind::NotFound => {
                WikiGraphError::NotFound(format!("{path}: {io_error}"))
            }
            Some(io_error) => WikiGraphError::Io(format!("{path}: {io_error}")),
            None => WikiGraphError::Io(format!("Directory walk loop detected at {path}")),
        }
    }
}

impl From<fmt::Error> for WikiGraphError {
    fn from(x: fmt::Error) -> Self {
        WikiGraphError::Custom(format!("{x}"))
    }
}

impl From<RegexError> for WikiGraphError {
    fn from(x: RegexError) -> Self {
        WikiGraphError::Config(format!("Regex parse failed: {x}"))
    }
}
