//! Mock removal service for testing session behavior
//!
//! Provides a canned in-process implementation of the `RemovalService` trait
//! so session workflows can be exercised without a running backend.

use super::RemovalService;
use crate::data_url::DataUrl;
use crate::effects::EffectSettings;
use crate::error::{ClientError, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// Canned service responses, recorded per call for verification in tests
#[derive(Debug, Clone)]
pub struct MockRemovalService {
    /// Image returned by successful remove-background calls
    removal_result: DataUrl,
    /// Image returned by successful apply-effects calls
    effects_result: DataUrl,
    /// Call history for verification in tests
    call_history: Arc<Mutex<Vec<String>>>,
    /// Server-reported error injected into both endpoints, if set
    api_error: Option<String>,
    /// Whether to simulate a transport failure
    should_fail_transport: bool,
}

impl MockRemovalService {
    /// Create a mock that succeeds with small distinct payloads
    #[must_use]
    pub fn new() -> Self {
        Self {
            removal_result: DataUrl::png(vec![0xAA; 16]),
            effects_result: DataUrl::png(vec![0xBB; 16]),
            call_history: Arc::new(Mutex::new(Vec::new())),
            api_error: None,
            should_fail_transport: false,
        }
    }

    /// Create a mock whose endpoints report a server-side error
    #[must_use]
    pub fn new_with_api_error<S: Into<String>>(message: S) -> Self {
        let mut mock = Self::new();
        mock.api_error = Some(message.into());
        mock
    }

    /// Create a mock whose endpoints fail at the transport level
    #[must_use]
    pub fn new_failing_transport() -> Self {
        let mut mock = Self::new();
        mock.should_fail_transport = true;
        mock
    }

    /// Override the canned removal result
    #[must_use]
    pub fn with_removal_result(mut self, result: DataUrl) -> Self {
        self.removal_result = result;
        self
    }

    /// Override the canned effects result
    #[must_use]
    pub fn with_effects_result(mut self, result: DataUrl) -> Self {
        self.effects_result = result;
        self
    }

    /// Get the call history for verification in tests
    pub fn call_history(&self) -> Vec<String> {
        self.call_history.lock().unwrap().clone()
    }

    fn record_call(&self, entry: String) {
        if let Ok(mut history) = self.call_history.lock() {
            history.push(entry);
        }
    }

    fn injected_failure(&self) -> Option<ClientError> {
        if self.should_fail_transport {
            return Some(ClientError::network_error(
                "Failed to reach removal service",
                "connection refused",
            ));
        }
        self.api_error.clone().map(ClientError::api)
    }
}

impl Default for MockRemovalService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RemovalService for MockRemovalService {
    async fn remove_background(&self, image_bytes: &[u8], file_name: &str) -> Result<DataUrl> {
        self.record_call(format!("remove_background({}, {} bytes)", file_name, image_bytes.len()));
        if let Some(err) = self.injected_failure() {
            return Err(err);
        }
        Ok(self.removal_result.clone())
    }

    async fn apply_effects(&self, _image: &DataUrl, settings: &EffectSettings) -> Result<DataUrl> {
        self.record_call(format!("apply_effects({})", settings.background.type_name()));
        if let Some(err) = self.injected_failure() {
            return Err(err);
        }
        Ok(self.effects_result.clone())
    }

    async fn health(&self) -> Result<()> {
        self.record_call("health".to_string());
        if let Some(err) = self.injected_failure() {
            return Err(err);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_records_calls() {
        let mock = MockRemovalService::new();
        mock.remove_background(&[1, 2], "photo.jpg").await.unwrap();
        mock.health().await.unwrap();

        let history = mock.call_history();
        assert_eq!(history.len(), 2);
        assert!(history[0].contains("photo.jpg"));
        assert_eq!(history[1], "health");
    }

    #[tokio::test]
    async fn test_mock_failure_injection() {
        let mock = MockRemovalService::new_with_api_error("segmentation failed");
        let err = mock.remove_background(&[1], "a.png").await.unwrap_err();
        assert!(matches!(err, ClientError::Api(_)));

        let mock = MockRemovalService::new_failing_transport();
        let err = mock.health().await.unwrap_err();
        assert!(matches!(err, ClientError::Network(_)));
    }
}
