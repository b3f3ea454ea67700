//! Project model errors

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RDroidError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The descriptor parsed but describes an invalid project
    #[error("Invalid project descriptor: {0}")]
    Config(String),

    #[error("Failed to parse {path}: {source}")]
    DescriptorParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to serialize project descriptor: {0}")]
    DescriptorSerialize(#[from] toml::ser::Error),

    #[error("Not found: {0}")]
    NotFound(String),
}

pub type Result<T> = std::result::Result<T, RDroidError>;
