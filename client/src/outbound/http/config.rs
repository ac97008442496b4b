//! Connection settings for the HTTP vehicle adapter.

use std::time::Duration;

use url::Url;

/// Default path of the vehicle collection under the base URL.
pub const DEFAULT_COLLECTION_PATH: &str = "/vehicles";
/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
/// Default `User-Agent` header value.
pub const DEFAULT_USER_AGENT: &str = concat!("vehicle-client/", env!("CARGO_PKG_VERSION"));

/// How create and update bodies are encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PayloadEncoding {
    /// `application/json` object.
    #[default]
    Json,
    /// `application/x-www-form-urlencoded` field map.
    Form,
}

/// Settings consumed by [`super::VehicleHttpSource`].
///
/// # Examples
/// ```
/// use std::time::Duration;
///
/// use url::Url;
/// use vehicle_client::outbound::http::{PayloadEncoding, VehicleHttpConfig};
///
/// let base = Url::parse("https://fleet.example/api/").expect("valid url");
/// let config = VehicleHttpConfig::new(base)
///     .with_timeout(Duration::from_secs(5))
///     .with_encoding(PayloadEncoding::Form);
///
/// let collection = config.collection_url().expect("valid collection url");
/// assert_eq!(collection.as_str(), "https://fleet.example/api/vehicles");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VehicleHttpConfig {
    base_url: Url,
    collection_path: String,
    timeout: Duration,
    user_agent: String,
    encoding: PayloadEncoding,
}

impl VehicleHttpConfig {
    /// Settings for `base_url` with every other value defaulted.
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            collection_path: DEFAULT_COLLECTION_PATH.to_owned(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            encoding: PayloadEncoding::default(),
        }
    }

    /// Override the collection path appended to the base URL.
    pub fn with_collection_path(mut self, path: impl Into<String>) -> Self {
        self.collection_path = path.into();
        self
    }

    /// Override the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override the `User-Agent` header.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Override the body encoding.
    pub fn with_encoding(mut self, encoding: PayloadEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Per-request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// `User-Agent` header value.
    pub fn user_agent(&self) -> &str {
        self.user_agent.as_str()
    }

    /// Body encoding.
    pub fn encoding(&self) -> PayloadEncoding {
        self.encoding
    }

    /// Base URL joined with the collection path.
    ///
    /// The path is appended to whatever path the base already has, so
    /// `https://host/api` becomes `https://host/api/vehicles`.
    ///
    /// # Errors
    ///
    /// Returns a parse error when the joined text is not a valid URL.
    pub fn collection_url(&self) -> Result<Url, url::ParseError> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let path = self.collection_path.trim_matches('/');
        Url::parse(&format!("{base}/{path}"))
    }
}
