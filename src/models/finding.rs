use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// Severity of an audit finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

/// A single audit finding tied to a manifest location
#[derive(Debug, Clone, Serialize)]
pub struct Finding {
    pub file: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    pub severity: Severity,
    pub code: String,
    pub message: String,
}

impl Finding {
    pub fn error(file: PathBuf, line: Option<usize>, code: &str, message: String) -> Self {
        Self {
            file,
            line,
            severity: Severity::Error,
            code: code.to_string(),
            message,
        }
    }

    pub fn warning(file: PathBuf, line: Option<usize>, code: &str, message: String) -> Self {
        Self {
            file,
            line,
            severity: Severity::Warning,
            code: code.to_string(),
            message,
        }
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let severity = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        match self.line {
            Some(line) => write!(
                f,
                "{}:{}: {}[{}]: {}",
                self.file.display(),
                line,
                severity,
                self.code,
                self.message
            ),
            None => write!(
                f,
                "{}: {}[{}]: {}",
                self.file.display(),
                severity,
                self.code,
                self.message
            ),
        }
    }
}
