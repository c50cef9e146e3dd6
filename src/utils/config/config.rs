use super::{ApiConfig, Config, PollingConfig};
use crate::error::SslLabsError as Error;
use figment::{Figment, providers::Format};
use log::debug;
use std::path::PathBuf;

impl Config {
    /// Load the Configuration
    ///
    /// A missing file leaves the defaults (and environment) in place.
    pub fn load(path: &PathBuf) -> Result<Self, Error> {
        debug!("Loading Configuration: {:?}", path);

        let figment = Figment::new()
            .merge(figment::providers::Yaml::file(path))
            .merge(figment::providers::Env::prefixed("SSLLABS_"));

        let mut config = Self::sections(figment)?;
        config.path = path.clone();

        debug!("Finished Loading Configuration");
        Ok(config)
    }

    /// Load the Configuration from a String
    pub fn load_str(data: impl Into<String>) -> Result<Self, Error> {
        let data = data.into();
        debug!("Loading Configuration from str");

        let figment = Figment::new()
            .merge(figment::providers::Yaml::string(&data))
            .merge(figment::providers::Env::prefixed("SSLLABS_"));

        Self::sections(figment)
    }

    fn sections(figment: Figment) -> Result<Self, Error> {
        let mut config: Self = figment.extract()?;
        config.api = ApiConfig::figment(&config.api).extract()?;
        config.polling = PollingConfig::figment(&config.polling).extract()?;

        if config.api.timeout == 0 {
            return Err(Error::ConfigParseError(
                "api.timeout must be at least 1 second".to_string(),
            ));
        }
        if config.polling.interval == 0 {
            return Err(Error::ConfigParseError(
                "polling.interval must be at least 1 second".to_string(),
            ));
        }
        Ok(config)
    }

    /// Path the configuration was loaded from
    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}
