use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("Source directory does not exist: {0}")]
    SourceDirMissing(PathBuf),

    #[error("Cannot create output directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Not a valid XMind container {path}: {source}")]
    Archive {
        path: PathBuf,
        source: zip::result::ZipError,
    },

    #[error("No content.json or content.xml found in {0}")]
    MissingContent(PathBuf),

    #[error("Malformed content.json in {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Malformed content.xml in {path}: {reason}")]
    Xml { path: PathBuf, reason: String },

    #[error("No sheet with a root topic in {0}")]
    EmptyDocument(PathBuf),

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {reason}")]
    Config { path: PathBuf, reason: String },
}

pub type ConvertResult<T> = Result<T, ConvertError>;
