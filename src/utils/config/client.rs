use super::{ApiConfig, Config};
use crate::SslLabsClient;

impl Config {
    /// Get the SSL Labs Client
    pub fn client(&self) -> Result<SslLabsClient, crate::SslLabsError> {
        self.api.client()
    }
}

impl ApiConfig {
    /// Get the SSL Labs Client for this endpoint
    pub fn client(&self) -> Result<SslLabsClient, crate::SslLabsError> {
        SslLabsClient::init()
            .url(self.url.clone())
            .timeout(self.timeout())
            .build()
    }
}
