//! Error taxonomy for the remote geospatial engine.
//!
//! The orchestrator chooses policy by kind: transient and permanent failures
//! abort an analysis, a missing optional dataset degrades to a placeholder,
//! and a failed statistics reduction is isolated by the caller.

use thiserror::Error;

/// Errors produced by calls to the remote engine.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("engine session error: {0}")]
    Session(String),

    #[error("engine unavailable: {0}")]
    Unavailable(String),

    #[error("engine rejected request: {0}")]
    Rejected(String),

    #[error("asset not accessible: {asset}")]
    MissingAsset { asset: String },

    #[error("malformed engine response: {0}")]
    Decode(String),
}

impl EngineError {
    /// Quota, timeout, and backend outages; a later identical request could
    /// succeed. The orchestrator still does not retry automatically.
    pub fn is_transient(&self) -> bool {
        match self {
            EngineError::Unavailable(_) => true,
            EngineError::Http(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }

    /// An optional dataset the analysis can substitute a placeholder for.
    pub fn is_missing_asset(&self) -> bool {
        matches!(self, EngineError::MissingAsset { .. })
    }
}

/// Result alias for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unavailable_is_transient_rejected_is_not() {
        assert!(EngineError::Unavailable("quota".into()).is_transient());
        assert!(!EngineError::Rejected("bad expression".into()).is_transient());
        assert!(!EngineError::Session("expired".into()).is_transient());
    }

    #[test]
    fn missing_asset_degrades() {
        let e = EngineError::MissingAsset {
            asset: "projects/windsite/assets/natura2000_sites".into(),
        };
        assert!(e.is_missing_asset());
        assert!(!e.is_transient());
    }
}
