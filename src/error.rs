// Error taxonomy for the annotation pipeline.
//
// `Config` is the only fatal category: it is raised at startup and
// propagates out of `main`. Everything else is produced inside the
// per-post pipeline and is logged and absorbed there.

use thiserror::Error;

/// Result type for tonecheck operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Pipeline errors, one variant per stage.
#[derive(Debug, Error)]
pub enum Error {
    /// Missing or invalid environment variable or invocation input
    #[error("Configuration error: {0}")]
    Config(String),

    /// Vectorizer artifact missing, unreadable, or the wrong shape
    #[error("Failed to load vectorizer artifact: {0}")]
    ArtifactLoad(String),

    /// Text could not be turned into a feature vector
    #[error("Vectorization error: {0}")]
    Vectorization(String),

    /// Remote inference call failed (network, auth, or endpoint-side)
    #[error("Inference error: {0}")]
    Inference(String),

    /// Inference response body was not an integer label
    #[error("Failed to parse prediction: {0}")]
    PredictionParse(String),

    /// Social API call failed
    #[error("Social API error: {0}")]
    ExternalApi(String),
}

impl Error {
    /// Short name of the error category, used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Config(_) => "config",
            Error::ArtifactLoad(_) => "artifact_load",
            Error::Vectorization(_) => "vectorization",
            Error::Inference(_) => "inference",
            Error::PredictionParse(_) => "prediction_parse",
            Error::ExternalApi(_) => "external_api",
        }
    }

    /// Whether this error must abort the process instead of being absorbed
    /// at the per-post boundary.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::Config(_))
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::ExternalApi(e.to_string())
    }
}
