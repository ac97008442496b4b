//! Vehicle client configuration loaded via OrthoConfig.

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

use crate::outbound::http::{
    DEFAULT_COLLECTION_PATH, DEFAULT_TIMEOUT, DEFAULT_USER_AGENT, PayloadEncoding,
    VehicleHttpConfig,
};

/// Base URL used when none is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Failure while turning settings into adapter configuration.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// The configured base URL does not parse.
    #[error("invalid base url `{url}`: {source}")]
    BaseUrl {
        /// Offending value.
        url: String,
        /// Parser failure.
        source: url::ParseError,
    },
    /// A zero timeout would fail every request.
    #[error("timeout_seconds must be greater than zero")]
    ZeroTimeout,
}

/// Settings controlling which vehicle collection the client talks to.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "VEHICLES")]
pub struct VehicleClientSettings {
    /// Base URL of the REST service.
    pub base_url: Option<String>,
    /// Path of the vehicle collection under the base URL.
    pub collection_path: Option<String>,
    /// Per-request timeout in seconds.
    pub timeout_seconds: Option<u64>,
    /// `User-Agent` header override.
    pub user_agent: Option<String>,
    /// Send create and update bodies as form fields instead of JSON.
    #[ortho_config(default = false)]
    pub form_encoded: bool,
}

impl VehicleClientSettings {
    /// Return the configured base URL, falling back to the default.
    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    /// Return the configured collection path, falling back to the default.
    pub fn collection_path(&self) -> &str {
        self.collection_path
            .as_deref()
            .unwrap_or(DEFAULT_COLLECTION_PATH)
    }

    /// Return the configured timeout, falling back to the default.
    pub fn timeout(&self) -> Duration {
        self.timeout_seconds
            .map_or(DEFAULT_TIMEOUT, Duration::from_secs)
    }

    /// Return the configured user agent, falling back to the default.
    pub fn user_agent(&self) -> &str {
        self.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT)
    }

    /// Return the body encoding selected by `form_encoded`.
    pub fn encoding(&self) -> PayloadEncoding {
        if self.form_encoded {
            PayloadEncoding::Form
        } else {
            PayloadEncoding::Json
        }
    }

    /// Build adapter configuration from these settings.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError`] when the base URL does not parse or the
    /// timeout is zero.
    pub fn to_http_config(&self) -> Result<VehicleHttpConfig, SettingsError> {
        if self.timeout_seconds == Some(0) {
            return Err(SettingsError::ZeroTimeout);
        }
        let base_url = Url::parse(self.base_url()).map_err(|source| SettingsError::BaseUrl {
            url: self.base_url().to_owned(),
            source,
        })?;
        Ok(VehicleHttpConfig::new(base_url)
            .with_collection_path(self.collection_path())
            .with_timeout(self.timeout())
            .with_user_agent(self.user_agent())
            .with_encoding(self.encoding()))
    }
}
