//! HTTP implementation of the removal service contract
//!
//! Talks to the two processing endpoints over reqwest: multipart upload for
//! `POST /remove-bg`, JSON body for `POST /apply-effects`.

use super::{ApplyEffectsRequest, HealthResponse, RemovalService, ServiceResponse};
use crate::config::ClientConfig;
use crate::data_url::DataUrl;
use crate::effects::EffectSettings;
use crate::error::{ClientError, Result};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;

/// Reqwest-backed removal service client
#[derive(Debug, Clone)]
pub struct HttpRemovalService {
    client: Client,
    config: ClientConfig,
}

impl HttpRemovalService {
    /// Create a new service client from validated configuration
    ///
    /// # Errors
    /// - Invalid configuration
    /// - Failed to create HTTP client
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ClientError::network_error("Failed to create HTTP client", e))?;

        Ok(Self { client, config })
    }

    /// Configuration this client was built with
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Decode a processing-endpoint response into the resulting image
    async fn decode_image_response(response: reqwest::Response) -> Result<DataUrl> {
        let status = response.status().as_u16();
        let payload: ServiceResponse = response.json().await.map_err(|e| {
            if (200..300).contains(&status) {
                ClientError::network_error("Failed to decode service response", e)
            } else {
                ClientError::UnexpectedStatus(status)
            }
        })?;
        payload.into_image(status)
    }
}

#[async_trait]
impl RemovalService for HttpRemovalService {
    async fn remove_background(&self, image_bytes: &[u8], file_name: &str) -> Result<DataUrl> {
        let url = self.config.remove_bg_url();
        log::info!(
            "Submitting {} bytes from '{}' to {}",
            image_bytes.len(),
            file_name,
            url
        );

        let part = Part::bytes(image_bytes.to_vec()).file_name(file_name.to_string());
        let form = Form::new().part("image", part);

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ClientError::network_error("Failed to reach removal service", e))?;

        let result = Self::decode_image_response(response).await?;
        tracing::debug!(bytes = result.len(), "Background removal succeeded");
        Ok(result)
    }

    async fn apply_effects(&self, image: &DataUrl, settings: &EffectSettings) -> Result<DataUrl> {
        let url = self.config.apply_effects_url();
        let body = ApplyEffectsRequest::new(image, settings);
        log::info!(
            "Applying effects (background: {}) via {}",
            body.bg_type,
            url
        );

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| ClientError::network_error("Failed to reach removal service", e))?;

        let result = Self::decode_image_response(response).await?;
        tracing::debug!(bytes = result.len(), "Effects applied");
        Ok(result)
    }

    async fn health(&self) -> Result<()> {
        let url = self.config.health_url();
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ClientError::network_error("Failed to reach removal service", e))?;

        let status = response.status().as_u16();
        if !(200..300).contains(&status) {
            return Err(ClientError::UnexpectedStatus(status));
        }

        let payload: HealthResponse = response
            .json()
            .await
            .map_err(|e| ClientError::network_error("Failed to decode health response", e))?;
        if payload.status == "ok" {
            Ok(())
        } else {
            Err(ClientError::api(format!(
                "Service reported status '{}'",
                payload.status
            )))
        }
    }
}
