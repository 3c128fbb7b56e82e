//! HTTP client for the inventory service
//!
//! Every request bypasses caches and carries a JSON content type; extra
//! headers from the configuration are layered on top and win over the
//! defaults. Responses outside 2xx become [`DashboardError::Http`] with the
//! body text (or the status reason when the body is empty) as detail.

use crate::api::models::*;
use crate::config::ClientConfig;
use crate::error::{DashboardError, Result};
use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CACHE_CONTROL, CONTENT_TYPE};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

/// Characters escaped in a path segment, matching `encodeURIComponent`
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Operations the dashboard needs from the inventory service
#[async_trait]
pub trait InventoryApi: Send + Sync {
    /// GET /health
    async fn health(&self) -> Result<HealthResponse>;

    /// GET /api/vehicles?page=N&page_size=M, normalized to an envelope
    async fn list_vehicles(&self, page: usize, page_size: usize) -> Result<PaginatedVehicles>;

    /// GET /api/vehicles/{vin}
    async fn get_vehicle(&self, vin: &str) -> Result<Vehicle>;

    /// POST /api/vehicles; `None` when the service answers 204
    async fn create_vehicle(&self, payload: &VehicleCreate) -> Result<Option<Vehicle>>;
}

/// reqwest-backed [`InventoryApi`]
#[derive(Debug, Clone)]
pub struct InventoryClient {
    base_url: String,
    http: Client,
}

impl InventoryClient {
    /// Create a client from configuration
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let headers = build_headers(&config.headers)?;
        let http = Client::builder()
            .user_agent(concat!("vindash/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()?;

        Ok(Self {
            base_url: config.normalized_base_url(),
            http,
        })
    }

    /// Base URL without trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>> {
        let url = self.url(path);
        debug!(%url, "GET");
        let response = self.http.get(&url).send().await?;
        decode(check_status(response).await?).await
    }
}

#[async_trait]
impl InventoryApi for InventoryClient {
    #[instrument(skip(self))]
    async fn health(&self) -> Result<HealthResponse> {
        self.get::<HealthResponse>("/health")
            .await?
            .ok_or_else(|| DashboardError::http(204, "empty health response"))
    }

    #[instrument(skip(self))]
    async fn list_vehicles(&self, page: usize, page_size: usize) -> Result<PaginatedVehicles> {
        let path = list_path(page, page_size);
        let raw = self.get::<ListResponse>(&path).await?;
        Ok(match raw {
            Some(raw) => raw.into_page(page, page_size),
            None => PaginatedResponse::new(Vec::new(), 0, page, page_size),
        })
    }

    #[instrument(skip(self))]
    async fn get_vehicle(&self, vin: &str) -> Result<Vehicle> {
        self.get::<Option<Vehicle>>(&vehicle_path(vin))
            .await?
            .flatten()
            .ok_or_else(|| DashboardError::NotFound(vin.to_string()))
    }

    #[instrument(skip(self, payload), fields(vin = %payload.vin))]
    async fn create_vehicle(&self, payload: &VehicleCreate) -> Result<Option<Vehicle>> {
        let url = self.url("/api/vehicles");
        debug!(%url, "POST");
        let body = serde_json::to_vec(payload)?;
        let response = self.http.post(&url).body(body).send().await?;
        decode(check_status(response).await?).await
    }
}

/// Listing path with query string
pub fn list_path(page: usize, page_size: usize) -> String {
    format!("/api/vehicles?page={}&page_size={}", page, page_size)
}

/// Detail path with the VIN escaped as a single segment
pub fn vehicle_path(vin: &str) -> String {
    format!("/api/vehicles/{}", utf8_percent_encode(vin, PATH_SEGMENT))
}

fn build_headers(overrides: &[(String, String)]) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-store"));

    for (name, value) in overrides {
        let name = HeaderName::from_bytes(name.trim().as_bytes())
            .map_err(|e| DashboardError::config(format!("Invalid header name '{}': {}", name, e)))?;
        let value = HeaderValue::from_str(value.trim())
            .map_err(|e| {
                DashboardError::config(format!("Invalid value for header '{}': {}", name, e))
            })?;
        headers.insert(name, value);
    }

    Ok(headers)
}

async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(DashboardError::http(status.as_u16(), error_detail(status, &body)))
}

fn error_detail(status: StatusCode, body: &str) -> String {
    if body.is_empty() {
        status.canonical_reason().unwrap_or("").to_string()
    } else {
        body.to_string()
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<Option<T>> {
    if response.status() == StatusCode::NO_CONTENT {
        return Ok(None);
    }
    let bytes = response.bytes().await?;
    Ok(Some(serde_json::from_slice(&bytes)?))
}
