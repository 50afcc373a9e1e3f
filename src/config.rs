//! Client configuration API
//!
//! Provides CLI-equivalent configuration options through a builder pattern.

use crate::error::{ClientError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default upload ceiling, matching the service's request size limit (5 MiB)
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;

/// Largest ceiling a deployment variant is allowed to configure (100 MiB)
pub const MAX_UPLOAD_CEILING_BYTES: u64 = 100 * 1024 * 1024;

/// Default HTTP request timeout for service calls
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Output encodings for exported results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// PNG with alpha channel preserved (direct pass-through of the service result)
    Png,
    /// JPEG re-encoded over a white matte
    Jpeg,
}

impl OutputFormat {
    /// File extension for this format (without the dot)
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
        }
    }

    /// Whether the format can carry an alpha channel
    #[must_use]
    pub fn supports_transparency(self) -> bool {
        match self {
            Self::Png => true,
            Self::Jpeg => false,
        }
    }
}

/// Configuration for a background-removal service client session
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the removal service (e.g. `http://localhost:5000`)
    pub service_url: String,
    /// Client-side upload ceiling in bytes, enforced before any bytes are sent
    pub max_upload_bytes: u64,
    /// HTTP request timeout for both endpoints
    pub request_timeout: Duration,
    /// Output format for exported results
    pub output_format: OutputFormat,
    /// JPEG quality (0-100) used when exporting over the white matte
    pub jpeg_quality: u8,
}

impl ClientConfig {
    /// Create a new configuration builder
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::new()
    }

    /// Validate the configuration
    ///
    /// # Errors
    /// - Empty or non-HTTP service URL
    /// - Zero or out-of-range upload ceiling
    /// - JPEG quality above 100
    pub fn validate(&self) -> Result<()> {
        if self.service_url.is_empty() {
            return Err(ClientError::invalid_config("Service URL must not be empty"));
        }
        if !self.service_url.starts_with("http://") && !self.service_url.starts_with("https://") {
            return Err(ClientError::invalid_config(format!(
                "Service URL must start with http:// or https://, got '{}'",
                self.service_url
            )));
        }
        if self.max_upload_bytes == 0 || self.max_upload_bytes > MAX_UPLOAD_CEILING_BYTES {
            return Err(ClientError::config_value_error(
                "max_upload_bytes",
                self.max_upload_bytes,
                "1-104857600",
            ));
        }
        if self.jpeg_quality > 100 {
            return Err(ClientError::config_value_error(
                "jpeg_quality",
                self.jpeg_quality,
                "0-100",
            ));
        }
        Ok(())
    }

    /// Endpoint URL for `POST /remove-bg`
    #[must_use]
    pub fn remove_bg_url(&self) -> String {
        format!("{}/remove-bg", self.service_url.trim_end_matches('/'))
    }

    /// Endpoint URL for `POST /apply-effects`
    #[must_use]
    pub fn apply_effects_url(&self) -> String {
        format!("{}/apply-effects", self.service_url.trim_end_matches('/'))
    }

    /// Endpoint URL for `GET /health`
    #[must_use]
    pub fn health_url(&self) -> String {
        format!("{}/health", self.service_url.trim_end_matches('/'))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            service_url: "http://localhost:5000".to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            output_format: OutputFormat::Png,
            jpeg_quality: 95,
        }
    }
}

/// Builder for `ClientConfig`
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            config: ClientConfig::default(),
        }
    }

    /// Set the service base URL
    pub fn service_url<S: Into<String>>(mut self, url: S) -> Self {
        self.config.service_url = url.into();
        self
    }

    /// Set the client-side upload ceiling in bytes
    pub fn max_upload_bytes(mut self, limit: u64) -> Self {
        self.config.max_upload_bytes = limit;
        self
    }

    /// Set the HTTP request timeout
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = timeout;
        self
    }

    /// Set the export output format
    pub fn output_format(mut self, format: OutputFormat) -> Self {
        self.config.output_format = format;
        self
    }

    /// Set JPEG export quality (0-100)
    pub fn jpeg_quality(mut self, quality: u8) -> Self {
        self.config.jpeg_quality = quality;
        self
    }

    /// Build the configuration
    ///
    /// # Errors
    /// - Any validation failure from [`ClientConfig::validate`]
    pub fn build(self) -> Result<ClientConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for ClientConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
