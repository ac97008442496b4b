//! Reqwest-backed vehicle source adapter.
//!
//! This adapter owns transport details only: URL assembly, body encoding,
//! timeout and HTTP error mapping, and JSON decoding into domain vehicles.

use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder};
use tracing::{debug, warn};
use url::Url;

use super::config::{PayloadEncoding, VehicleHttpConfig};
use super::dto::{VehicleBodyDto, VehicleDto};
use crate::domain::ports::{VehicleSource, VehicleSourceError};
use crate::domain::{Vehicle, VehicleDetails, VehicleId};

/// Failure while constructing a [`VehicleHttpSource`].
#[derive(Debug, thiserror::Error)]
pub enum HttpSourceBuildError {
    /// The collection URL could not be assembled.
    #[error("invalid vehicle collection url: {0}")]
    Url(#[from] url::ParseError),
    /// The underlying HTTP client could not be built.
    #[error("failed to build http client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Vehicle source that talks to one REST collection over HTTP.
#[derive(Debug, Clone)]
pub struct VehicleHttpSource {
    client: Client,
    collection: Url,
    encoding: PayloadEncoding,
}

impl VehicleHttpSource {
    /// Build an adapter from connection settings.
    ///
    /// # Errors
    ///
    /// Returns an error when the collection URL is invalid or the reqwest
    /// client cannot be constructed.
    pub fn new(config: &VehicleHttpConfig) -> Result<Self, HttpSourceBuildError> {
        let collection = config.collection_url()?;
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent())
            .build()?;
        Ok(Self {
            client,
            collection,
            encoding: config.encoding(),
        })
    }

    /// URL of the vehicle collection.
    pub fn collection_url(&self) -> &Url {
        &self.collection
    }

    fn member_url(&self, id: VehicleId) -> Result<Url, VehicleSourceError> {
        let base = self.collection.as_str().trim_end_matches('/');
        Url::parse(&format!("{base}/{id}")).map_err(|error| {
            VehicleSourceError::invalid_request(format!("invalid vehicle url for {id}: {error}"))
        })
    }

    fn with_body(&self, request: RequestBuilder, details: &VehicleDetails) -> RequestBuilder {
        let body = VehicleBodyDto::from(details);
        match self.encoding {
            PayloadEncoding::Json => request.json(&body),
            PayloadEncoding::Form => request.form(&body),
        }
    }

    fn send(&self, request: RequestBuilder) -> Result<Vec<u8>, VehicleSourceError> {
        let request = request
            .header(reqwest::header::ACCEPT, "application/json")
            .build()
            .map_err(map_transport_error)?;
        let method = request.method().clone();
        let url = request.url().clone();
        debug!(%method, %url, "sending vehicle request");

        let response = self.client.execute(request).map_err(|error| {
            warn!(%method, %url, %error, "vehicle request failed");
            map_transport_error(error)
        })?;
        let status = response.status();
        let body = response.bytes().map_err(map_transport_error)?;
        if !status.is_success() {
            warn!(%method, %url, status = status.as_u16(), "vehicle request rejected");
            return Err(map_status_error(status, body.as_ref()));
        }
        Ok(body.to_vec())
    }
}

impl VehicleSource for VehicleHttpSource {
    fn fetch_all(&self) -> Result<Vec<Vehicle>, VehicleSourceError> {
        let body = self.send(self.client.get(self.collection.clone()))?;
        parse_vehicles(&body)
    }

    fn fetch_one(&self, id: VehicleId) -> Result<Vehicle, VehicleSourceError> {
        let body = self.send(self.client.get(self.member_url(id)?))?;
        parse_vehicle(&body)
    }

    fn create(&self, details: &VehicleDetails) -> Result<Option<Vehicle>, VehicleSourceError> {
        let request = self.with_body(self.client.post(self.collection.clone()), details);
        let body = self.send(request)?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        match parse_vehicle(&body) {
            Ok(vehicle) => Ok(Some(vehicle)),
            Err(error) => {
                debug!(%error, "create response carried no vehicle echo");
                Ok(None)
            }
        }
    }

    fn replace(&self, id: VehicleId, details: &VehicleDetails) -> Result<(), VehicleSourceError> {
        let request = self.with_body(self.client.put(self.member_url(id)?), details);
        self.send(request).map(|_| ())
    }

    fn remove(&self, id: VehicleId) -> Result<(), VehicleSourceError> {
        self.send(self.client.delete(self.member_url(id)?))
            .map(|_| ())
    }
}

fn parse_vehicles(body: &[u8]) -> Result<Vec<Vehicle>, VehicleSourceError> {
    let decoded: Vec<VehicleDto> = serde_json::from_slice(body).map_err(|error| {
        VehicleSourceError::decode(format!("invalid vehicle list JSON: {error}"))
    })?;
    Ok(decoded.into_iter().map(VehicleDto::into_domain).collect())
}

fn parse_vehicle(body: &[u8]) -> Result<Vehicle, VehicleSourceError> {
    let decoded: VehicleDto = serde_json::from_slice(body)
        .map_err(|error| VehicleSourceError::decode(format!("invalid vehicle JSON: {error}")))?;
    Ok(decoded.into_domain())
}

fn map_transport_error(error: reqwest::Error) -> VehicleSourceError {
    if error.is_timeout() {
        VehicleSourceError::timeout(error.to_string())
    } else if error.is_builder() {
        VehicleSourceError::invalid_request(error.to_string())
    } else {
        VehicleSourceError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> VehicleSourceError {
    let body_preview = body_preview(body);
    let message = if body_preview.is_empty() {
        status
            .canonical_reason()
            .map_or_else(|| format!("status {}", status.as_u16()), str::to_owned)
    } else {
        body_preview
    };
    VehicleSourceError::status(status.as_u16(), message)
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
