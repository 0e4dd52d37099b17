//! Dual-backend API client.
//!
//! The backend (standalone REST or embedded WordPress) is chosen once, when the
//! client is built from an [`EnvironmentConfig`]. Every call afterwards goes
//! through the same route table, so a `(mode, operation)` pair always produces
//! the same method, path and body. The client does not retry and does not
//! cache; errors go straight back to the caller.

use std::time::Duration;

use reqwest::header::{ ACCEPT, CONTENT_TYPE };
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::environment::EnvironmentConfig;
use crate::enums::ApiMode;
use crate::error::ApiError;

pub mod operation;
pub mod routes;

pub use operation::{ CalculatePayload, CreateInvestmentPayload, LogicalOperation };
pub use routes::{ RequestSpec, RouteTable };

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const NONCE_HEADER: &str = "X-WP-Nonce";

pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    mode: ApiMode,
    auth_token: Option<String>,
    routes: &'static dyn RouteTable,
}

impl ApiClient {
    pub fn new(environment: EnvironmentConfig) -> Result<Self, ApiError> {
        Self::with_timeout(environment, DEFAULT_TIMEOUT)
    }

    /// `timeout` bounds each call; expiry is reported as [`ApiError::Network`].
    pub fn with_timeout(environment: EnvironmentConfig, timeout: Duration) -> Result<Self, ApiError> {
        let http = reqwest::Client
            ::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Network(format!("Failed to build HTTP client: {}", e)))?;

        // The nonce means nothing to the standalone backend.
        let auth_token = match environment.mode {
            ApiMode::Embedded => environment.auth_token,
            ApiMode::Standalone => None,
        };

        Ok(Self {
            http,
            base_url: environment.api_base_url,
            mode: environment.mode,
            auth_token,
            routes: routes::route_table(environment.mode),
        })
    }

    pub fn mode(&self) -> ApiMode {
        self.mode
    }

    /// The request that `operation` maps to, without sending it.
    pub fn request_for(&self, operation: &LogicalOperation) -> RequestSpec {
        self.routes.request_for(operation)
    }

    pub async fn execute(&self, operation: &LogicalOperation) -> Result<Value, ApiError> {
        if let Some(amount) = operation.amount() {
            if amount <= Decimal::ZERO {
                return Err(ApiError::InvalidInput { field: "amount".to_string() });
            }
        }

        let spec = self.request_for(operation);
        let url = format!("{}{}", self.base_url, spec.path);

        let mut request = self.http
            .request(spec.method.clone(), &url)
            .header(ACCEPT, "application/json");

        if !spec.query.is_empty() {
            request = request.query(&spec.query);
        }
        if let Some(token) = &self.auth_token {
            request = request.header(NONCE_HEADER, token);
        }
        if operation.is_write() {
            request = request.header(CONTENT_TYPE, "application/json");
        }
        if let Some(body) = &spec.body {
            request = request.body(body.to_string());
        }

        tracing::debug!("{} {} {} ({})", self.mode, spec.method, url, operation.name());

        let response = request.send().await.map_err(|e| {
            tracing::warn!("{} failed before a response arrived: {}", operation.name(), e);
            ApiError::from(e)
        })?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(ApiError::from)?;

        if !status.is_success() {
            return Err(ApiError::Http {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }

        serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))
    }

    pub async fn execute_as<T: DeserializeOwned>(
        &self,
        operation: &LogicalOperation
    ) -> Result<T, ApiError> {
        let value = self.execute(operation).await?;
        serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))
    }
}
