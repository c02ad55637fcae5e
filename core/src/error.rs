//! Error types for the warp-mdm-core crate

use thiserror::Error;

/// Fatal import failures. Any of these aborts the whole parse and leaves
/// the caller's current configuration untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImportError {
    #[error("Invalid XML format. Please ensure the file is a valid Apple plist: {0}")]
    MalformedXml(String),

    #[error("Not a valid plist file. Missing <plist> root element.")]
    MissingPlist,

    #[error("Not a valid plist file. Missing <dict> element.")]
    MissingRootDict,
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Import failed: {0}")]
    Import(#[from] ImportError),

    #[error("Field error: {0}")]
    Field(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("Deserialization error: {0}")]
    Deserialization(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Resource not found: {0}")]
    NotFound(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Error::Validation(msg.into())
    }

    pub fn field(msg: impl Into<String>) -> Self {
        Error::Field(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Error::NotFound(msg.into())
    }
}
