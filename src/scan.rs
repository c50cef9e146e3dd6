//! # Scan
//!
//! Drive one SSL Labs assessment to completion.
//!
//! With cached results a single `analyze` call is made and its response is
//! returned as-is. Otherwise a new assessment is started and polled every
//! [`PollingConfig::interval`] until SSL Labs reports `READY` or `ERROR`.
use log::{debug, info, warn};

use crate::{
    SslLabsError,
    client::{AnalyzeParams, Assessor, Host},
    utils::config::PollingConfig,
};

/// Scan Request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanRequest {
    /// Host to assess
    pub host: String,
    /// Publish the results on the SSL Labs boards
    pub publish: bool,
    /// Accept a cached assessment instead of starting a new one
    pub use_cache: bool,
}

impl ScanRequest {
    /// New Scan Request
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            publish: false,
            use_cache: false,
        }
    }

    /// Set whether results are published
    pub fn publish(mut self, publish: bool) -> Self {
        self.publish = publish;
        self
    }

    /// Set whether cached results are accepted
    pub fn use_cache(mut self, use_cache: bool) -> Self {
        self.use_cache = use_cache;
        self
    }

    /// Parameters shared by every call of the scan
    fn params(&self) -> AnalyzeParams {
        let mut params = AnalyzeParams::new(self.host.clone());
        if self.publish {
            params.set("publish", "on");
        }
        params
    }

    /// Run the scan, returning the last response received
    pub async fn run<A>(&self, api: &A, polling: &PollingConfig) -> Result<Host, SslLabsError>
    where
        A: Assessor + Sync + ?Sized,
    {
        if self.host.trim().is_empty() {
            return Err(SslLabsError::ConfigParseError(
                "Host must not be empty".to_string(),
            ));
        }

        let mut params = self.params();

        if self.use_cache {
            info!("Requesting cached assessment for '{}'", self.host);
            params.set("fromCache", "on");
            params.set("startNew", "off");
            return api.analyze(&params).await;
        }

        info!("Starting new assessment for '{}'", self.host);
        params.set("startNew", "on");
        params.set("ignoreMismatch", "on");
        let mut host = api.analyze(&params).await?;
        // Polling must not restart the assessment
        params.remove("startNew");

        let mut attempts: u32 = 0;
        while !host.status.is_terminal() {
            if let Some(max) = polling.max_attempts {
                if attempts >= max {
                    warn!(
                        "Giving up on '{}' after {} polls (status: {})",
                        self.host, attempts, host.status
                    );
                    return Err(SslLabsError::PollingLimit {
                        status: host.status.to_string(),
                        attempts,
                    });
                }
            }

            debug!(
                "Assessment of '{}' is {}, polling again in {:?}",
                self.host,
                host.status,
                polling.interval()
            );
            tokio::time::sleep(polling.interval()).await;

            host = api.analyze(&params).await?;
            attempts += 1;
        }

        info!(
            "Assessment of '{}' finished with {} after {} polls",
            self.host, host.status, attempts
        );
        Ok(host)
    }
}
