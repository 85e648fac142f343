use std::fmt;
use std::io;
use std::path::PathBuf;

/// Custom error type for reqlint operations
#[derive(Debug)]
pub enum Error {
    /// I/O errors (file access, permissions, etc.)
    Io(io::Error),

    /// Errors related to requirement line parsing
    RequirementParsing(String),

    /// Errors related to version or specifier parsing
    VersionParsing(String),

    /// Errors related to manifest discovery
    ManifestDetection(String),

    /// Errors related to file operations
    FileOperation { path: PathBuf, message: String },

    /// General errors
    General(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(err) => write!(f, "I/O error: {}", err),
            Error::RequirementParsing(msg) => write!(f, "Requirement parsing error: {}", msg),
            Error::VersionParsing(msg) => write!(f, "Version parsing error: {}", msg),
            Error::ManifestDetection(msg) => write!(f, "Manifest detection error: {}", msg),
            Error::FileOperation { path, message } => {
                write!(f, "File operation error on {}: {}", path.display(), message)
            }
            Error::General(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<String> for Error {
    fn from(err: String) -> Self {
        Error::General(err)
    }
}

impl From<&str> for Error {
    fn from(err: &str) -> Self {
        Error::General(err.to_string())
    }
}

/// Result type alias for reqlint operations
pub type Result<T> = std::result::Result<T, Error>;
