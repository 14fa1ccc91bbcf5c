use thiserror::Error;

/// Request-level failures. Both kinds abort the pipeline before any metric
/// is extracted; retrying with the same input cannot succeed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("invalid landmark input ({field}): {reason}")]
    InvalidLandmark { field: String, reason: String },
    #[error("degenerate face geometry ({field}): {reason}; resubmit a frontal, well-lit photo")]
    DegenerateGeometry { field: String, reason: String },
}

impl AnalysisError {
    pub(crate) fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidLandmark {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn degenerate(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::DegenerateGeometry {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Name of the offending landmark field or metric.
    pub fn field(&self) -> &str {
        match self {
            Self::InvalidLandmark { field, .. } | Self::DegenerateGeometry { field, .. } => field,
        }
    }
}

/// Configuration failures. Raised while loading or validating an
/// [`EngineConfig`](crate::config::EngineConfig), never during analysis.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config ({field}): {reason}")]
    Invalid { field: String, reason: String },
}

impl ConfigError {
    pub(crate) fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field: field.into(),
            reason: reason.into(),
        }
    }
}
