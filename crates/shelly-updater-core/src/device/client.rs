//! HTTP client for the Shelly device API.

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;

use crate::config::{Credentials, Stage};
use crate::error::{CoreError, DeviceError};
use crate::protocol::response::parse_json_response;
use crate::protocol::{CheckForUpdateResponse, Endpoints, UpdateCheckResponse, UpdateStatus};

/// Calls the update sequences make against a device.
///
/// Implementations never retry; the caller owns the retry policy.
#[async_trait]
pub trait DeviceApi: Send + Sync {
    /// Gen 1: ask the device to look for new firmware (`/ota/check`).
    async fn trigger_update_check(&self, host: &str) -> Result<UpdateCheckResponse, DeviceError>;

    /// Gen 1: read the OTA status (`/ota`).
    async fn update_status(&self, host: &str) -> Result<UpdateStatus, DeviceError>;

    /// Gen 1: start an update from `stage` (`/ota?update=1` or `/ota?beta=1`).
    async fn trigger_update(&self, host: &str, stage: Stage) -> Result<UpdateStatus, DeviceError>;

    /// Gen 2: list the versions offered per channel.
    async fn check_for_update(&self, host: &str) -> Result<CheckForUpdateResponse, DeviceError>;

    /// Gen 2: start an update from `stage`. The response body is ignored.
    async fn start_update(&self, host: &str, stage: Stage) -> Result<(), DeviceError>;
}

/// `DeviceApi` over plain HTTP GET requests.
#[derive(Clone)]
pub struct HttpDeviceClient {
    client: Client,
    credentials: Credentials,
}

impl HttpDeviceClient {
    pub fn new(credentials: Credentials, timeout: Duration) -> Result<Self, CoreError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CoreError::Other(format!("HTTP client error: {}", e)))?;

        Ok(Self {
            client,
            credentials,
        })
    }

    /// GET `url` and return the body of a 200 response.
    async fn get(&self, url: &str) -> Result<String, DeviceError> {
        let mut request = self.client.get(url);
        if let Some((username, password)) = self.credentials.basic_auth() {
            request = request.basic_auth(username, Some(password));
        }

        debug!("GET {}", url);
        let response = request.send().await.map_err(|e| DeviceError::RequestFailed {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(DeviceError::UnexpectedStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| DeviceError::RequestFailed {
            url: url.to_string(),
            message: format!("Failed to read body: {}", e),
        })?;
        debug!("GET {} -> {}", url, body);

        Ok(body)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, DeviceError> {
        let body = self.get(url).await?;
        parse_json_response(&body, url)
    }
}

#[async_trait]
impl DeviceApi for HttpDeviceClient {
    async fn trigger_update_check(&self, host: &str) -> Result<UpdateCheckResponse, DeviceError> {
        self.get_json(&Endpoints::ota_check(host)).await
    }

    async fn update_status(&self, host: &str) -> Result<UpdateStatus, DeviceError> {
        self.get_json(&Endpoints::ota(host)).await
    }

    async fn trigger_update(&self, host: &str, stage: Stage) -> Result<UpdateStatus, DeviceError> {
        self.get_json(&Endpoints::ota_update(host, stage)).await
    }

    async fn check_for_update(&self, host: &str) -> Result<CheckForUpdateResponse, DeviceError> {
        self.get_json(&Endpoints::check_for_update(host)).await
    }

    async fn start_update(&self, host: &str, stage: Stage) -> Result<(), DeviceError> {
        self.get(&Endpoints::update(host, stage)).await.map(|_| ())
    }
}
