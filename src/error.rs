use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::ParseError;

#[derive(Debug, Error)]
pub enum PagesiftError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] ParseError),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl PagesiftError {
    pub fn parse(message: impl Into<String>) -> Self {
        PagesiftError::Parse(message.into())
    }

    pub fn config(message: impl Into<String>) -> Self {
        PagesiftError::Config(message.into())
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            PagesiftError::Io(_) => ErrorCategory::Config,
            PagesiftError::Network(_) => ErrorCategory::Network,
            PagesiftError::InvalidUrl(_) => ErrorCategory::Config,
            PagesiftError::Parse(_) => ErrorCategory::Parse,
            PagesiftError::Serialization(_) | PagesiftError::Yaml(_) => ErrorCategory::Output,
            PagesiftError::Config(_) => ErrorCategory::Config,
        }
    }
}

pub type Result<T> = std::result::Result<T, PagesiftError>;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    Config,
    Network,
    Parse,
    Output,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_errors_report_parse_category() {
        let err = PagesiftError::parse("empty document");
        assert_eq!(err.category(), ErrorCategory::Parse);
        assert!(format!("{}", err).contains("empty document"));
    }

    #[test]
    fn config_errors_report_config_category() {
        let err = PagesiftError::config("bad flag");
        assert_eq!(err.category(), ErrorCategory::Config);
    }
}
