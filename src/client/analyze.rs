//! Analyze Response
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Grade, SslLabsError};

/// Assessment Status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AssessmentStatus {
    /// Resolving the host name
    Dns,
    /// Assessment in progress
    InProgress,
    /// Assessment complete
    Ready,
    /// Assessment failed
    Error,
    /// Status not known to this client
    Other(String),
}

impl AssessmentStatus {
    /// Polling stops at `READY` or `ERROR`
    pub fn is_terminal(&self) -> bool {
        matches!(self, AssessmentStatus::Ready | AssessmentStatus::Error)
    }

    /// Status as reported by SSL Labs
    pub fn as_str(&self) -> &str {
        match self {
            AssessmentStatus::Dns => "DNS",
            AssessmentStatus::InProgress => "IN_PROGRESS",
            AssessmentStatus::Ready => "READY",
            AssessmentStatus::Error => "ERROR",
            AssessmentStatus::Other(status) => status.as_str(),
        }
    }
}

impl From<String> for AssessmentStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "DNS" => AssessmentStatus::Dns,
            "IN_PROGRESS" => AssessmentStatus::InProgress,
            "READY" => AssessmentStatus::Ready,
            "ERROR" => AssessmentStatus::Error,
            _ => AssessmentStatus::Other(value),
        }
    }
}

impl From<AssessmentStatus> for String {
    fn from(value: AssessmentStatus) -> Self {
        value.as_str().to_string()
    }
}

impl std::fmt::Display for AssessmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Host assessment, as returned by the `analyze` call
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Host {
    /// Assessed host name
    #[serde(default)]
    pub host: String,
    /// Assessed port
    #[serde(default)]
    pub port: Option<u16>,
    /// Protocol
    #[serde(default)]
    pub protocol: Option<String>,
    /// Assessment status
    pub status: AssessmentStatus,
    /// Status message (set when the status is `ERROR`)
    #[serde(default)]
    pub status_message: Option<String>,
    /// Assessment start time (ms since epoch)
    #[serde(default)]
    pub start_time: Option<i64>,
    /// Assessment completion time (ms since epoch)
    #[serde(default)]
    pub test_time: Option<i64>,
    /// Endpoints, in the order reported by SSL Labs
    #[serde(default)]
    pub endpoints: Vec<Endpoint>,
}

/// Assessed Endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    /// Endpoint IP address
    #[serde(default)]
    pub ip_address: String,
    /// Reverse DNS name
    #[serde(default)]
    pub server_name: Option<String>,
    /// Endpoint status message
    #[serde(default)]
    pub status_message: Option<String>,
    /// Grade (only once the endpoint assessment is complete)
    #[serde(default)]
    pub grade: Option<String>,
    /// Assessment progress (-1 to 100)
    #[serde(default)]
    pub progress: Option<i32>,
    /// Warnings that did not affect the grade
    #[serde(default)]
    pub has_warnings: bool,
}

impl Host {
    /// Raw grade string of the first endpoint
    ///
    /// Fails if the assessment errored, if no endpoint was reported or if the
    /// first endpoint has no grade.
    pub fn first_grade(&self) -> Result<&str, SslLabsError> {
        if self.status == AssessmentStatus::Error {
            return Err(SslLabsError::AssessmentFailed(
                self.status_message
                    .clone()
                    .unwrap_or_else(|| "no status message".to_string()),
            ));
        }

        let endpoint = self
            .endpoints
            .first()
            .ok_or_else(|| SslLabsError::NoEndpoints(self.host.clone()))?;

        endpoint
            .grade
            .as_deref()
            .ok_or_else(|| SslLabsError::MissingGrade {
                endpoint: endpoint.ip_address.clone(),
                message: endpoint
                    .status_message
                    .clone()
                    .unwrap_or_else(|| "no status message".to_string()),
            })
    }

    /// Grade of the first endpoint, looked up in the severity table
    pub fn grade(&self) -> Result<Grade, SslLabsError> {
        Ok(self.first_grade()?.parse::<Grade>()?)
    }

    /// When the assessment completed
    pub fn tested_at(&self) -> Option<DateTime<Utc>> {
        self.test_time.and_then(DateTime::from_timestamp_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const READY: &str = r#"{
        "host": "example.com",
        "port": 443,
        "protocol": "http",
        "isPublic": false,
        "status": "READY",
        "startTime": 1551350400000,
        "testTime": 1551350460000,
        "engineVersion": "1.32.16",
        "endpoints": [
            {
                "ipAddress": "93.184.216.34",
                "serverName": "example.com",
                "statusMessage": "Ready",
                "grade": "A+",
                "gradeTrustIgnored": "A+",
                "hasWarnings": false,
                "progress": 100
            },
            {
                "ipAddress": "2606:2800:220:1:248:1893:25c8:1946",
                "statusMessage": "Ready",
                "grade": "B"
            }
        ]
    }"#;

    #[test]
    fn test_ready() {
        let host: Host = serde_json::from_str(READY).unwrap();
        assert_eq!(host.status, AssessmentStatus::Ready);
        assert!(host.status.is_terminal());
        assert_eq!(host.endpoints.len(), 2);
        assert_eq!(host.first_grade().unwrap(), "A+");
        assert_eq!(host.grade().unwrap(), Grade::APlus);
        assert_eq!(
            host.tested_at().unwrap().to_rfc3339(),
            "2019-02-28T10:41:00+00:00"
        );
    }

    #[test]
    fn test_statuses() {
        for (raw, status, terminal) in [
            ("DNS", AssessmentStatus::Dns, false),
            ("IN_PROGRESS", AssessmentStatus::InProgress, false),
            ("READY", AssessmentStatus::Ready, true),
            ("ERROR", AssessmentStatus::Error, true),
            ("QUEUED", AssessmentStatus::Other("QUEUED".to_string()), false),
        ] {
            let parsed = AssessmentStatus::from(raw.to_string());
            assert_eq!(parsed, status);
            assert_eq!(parsed.is_terminal(), terminal);
            assert_eq!(parsed.to_string(), raw);
        }
    }

    #[test]
    fn test_in_progress_without_endpoints() {
        let host: Host = serde_json::from_str(r#"{"host": "example.com", "status": "DNS"}"#).unwrap();
        assert!(!host.status.is_terminal());
        assert!(host.endpoints.is_empty());
        assert!(matches!(
            host.first_grade(),
            Err(SslLabsError::NoEndpoints(name)) if name == "example.com"
        ));
    }

    #[test]
    fn test_error_status() {
        let host: Host = serde_json::from_str(
            r#"{"host": "nope.invalid", "status": "ERROR", "statusMessage": "Unable to resolve domain name"}"#,
        )
        .unwrap();
        assert!(matches!(
            host.first_grade(),
            Err(SslLabsError::AssessmentFailed(message)) if message == "Unable to resolve domain name"
        ));
    }

    #[test]
    fn test_missing_grade() {
        let host: Host = serde_json::from_str(
            r#"{"host": "example.com", "status": "READY", "endpoints": [
                {"ipAddress": "192.0.2.1", "statusMessage": "Unable to connect to the server"}
            ]}"#,
        )
        .unwrap();
        match host.first_grade() {
            Err(SslLabsError::MissingGrade { endpoint, message }) => {
                assert_eq!(endpoint, "192.0.2.1");
                assert_eq!(message, "Unable to connect to the server");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_grade() {
        let host: Host = serde_json::from_str(
            r#"{"host": "example.com", "status": "READY", "endpoints": [{"grade": "Z"}]}"#,
        )
        .unwrap();
        assert_eq!(host.first_grade().unwrap(), "Z");
        assert!(matches!(host.grade(), Err(SslLabsError::GradeError(_))));
    }
}
