//! # SSL Labs Error
use thiserror::Error;

/// SSL Labs Error
#[derive(Error, Debug)]
pub enum SslLabsError {
    /// Parsing Configuration Error
    #[error("Failed to parse the configuration: {0}")]
    ConfigParseError(String),
    /// JSON Error
    #[error("JSON Error: {0}")]
    JsonError(#[from] serde_json::Error),
    /// Figment Error
    #[error("Figment Error: {0}")]
    FigmentError(#[from] figment::Error),

    /// Grade not present in the severity table
    #[error("{0}")]
    GradeError(#[from] crate::grade::GradeParseError),

    /// The assessment finished with the `ERROR` status
    #[error("Assessment failed: {0}")]
    AssessmentFailed(String),
    /// The assessment did not report any endpoint
    #[error("No endpoints reported for {0}")]
    NoEndpoints(String),
    /// The first endpoint has no grade
    #[error("No grade for endpoint {endpoint}: {message}")]
    MissingGrade {
        /// Endpoint IP address
        endpoint: String,
        /// Endpoint status message
        message: String,
    },
    /// Polling gave up before the assessment finished
    #[error("Assessment still `{status}` after {attempts} polls")]
    PollingLimit {
        /// Last reported status
        status: String,
        /// Number of polls issued
        attempts: u32,
    },

    /// URL Parse Error
    #[error("{0}")]
    UrlParseError(#[from] url::ParseError),

    /// Reqwest Error
    #[cfg(feature = "client")]
    #[error("Request failed: {0}")]
    ReqwestError(#[from] reqwest::Error),
}
