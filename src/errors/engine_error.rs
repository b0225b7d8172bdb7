//! Custom error types for the engine

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Network error: {message}")]
    Network {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
        retry_count: u32,
    },

    #[error("Upstream returned HTTP {status} for {url}")]
    UpstreamStatus {
        url: String,
        status: u16,
    },

    #[error("Data parsing error: {context}")]
    DataParsing {
        context: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Failed to load reference data from {}", path.display())]
    ReferenceData {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("Storage error writing {}", path.display())]
    Storage {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },
}

pub type EngineResult<T> = Result<T, EngineError>;

impl EngineError {
    /// True for failures that another attempt might not reproduce.
    pub fn is_transient(&self) -> bool {
        match self {
            EngineError::Network { .. } => true,
            EngineError::UpstreamStatus { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        let rate_limited = EngineError::UpstreamStatus { url: "x".into(), status: 429 };
        let not_found = EngineError::UpstreamStatus { url: "x".into(), status: 404 };
        let parse = EngineError::DataParsing {
            context: "pools".into(),
            source: anyhow::anyhow!("bad json"),
        };

        assert!(rate_limited.is_transient());
        assert!(!not_found.is_transient());
        assert!(!parse.is_transient());
    }

    #[test]
    fn test_display_includes_path() {
        let err = EngineError::ReferenceData {
            path: PathBuf::from("ref.json"),
            source: anyhow::anyhow!("missing"),
        };
        assert_eq!(err.to_string(), "Failed to load reference data from ref.json");
    }
}
