//! Removal service abstraction and wire types
//!
//! The session never talks to the network directly; it drives a
//! [`RemovalService`] implementation. The HTTP implementation lives in
//! [`http`], and tests substitute mocks behind the same trait.

mod http;

// Test utilities for service-backed session testing
#[cfg(test)]
pub mod test_utils;

pub use http::HttpRemovalService;

use crate::data_url::DataUrl;
use crate::effects::EffectSettings;
use crate::error::{ClientError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Backend contract for the two processing endpoints plus the health probe
#[async_trait]
pub trait RemovalService: Send + Sync {
    /// Submit the original file bytes for background removal
    ///
    /// Returns the resulting PNG as held by the service response.
    async fn remove_background(&self, image_bytes: &[u8], file_name: &str) -> Result<DataUrl>;

    /// Submit a processed image and effect settings for server-side compositing
    async fn apply_effects(&self, image: &DataUrl, settings: &EffectSettings) -> Result<DataUrl>;

    /// Probe the service health endpoint
    async fn health(&self) -> Result<()>;
}

/// JSON body for `POST /apply-effects`
#[derive(Debug, Clone, Serialize)]
pub struct ApplyEffectsRequest {
    /// Bare base64 of the processed PNG
    pub image: String,
    /// Background treatment: `transparent`, `color`, or `custom`
    #[serde(rename = "bgType")]
    pub bg_type: String,
    /// Solid background color as `#RRGGBB`
    #[serde(rename = "bgColor")]
    pub bg_color: String,
    /// Bare base64 of the custom background image, when `bgType` is `custom`
    #[serde(rename = "customBg")]
    pub custom_bg: Option<String>,
    /// Brightness multiplier
    pub brightness: f32,
    /// Contrast multiplier
    pub contrast: f32,
    /// Sharpness multiplier
    pub sharpness: f32,
    /// Edge-smoothing blur flag
    pub blur: bool,
}

impl ApplyEffectsRequest {
    /// Assemble the wire body from a processed image and validated settings
    pub fn new(image: &DataUrl, settings: &EffectSettings) -> Self {
        Self {
            image: image.base64_payload(),
            bg_type: settings.background.type_name().to_string(),
            bg_color: settings.bg_color_hex().to_string(),
            custom_bg: settings.custom_bg_payload(),
            brightness: settings.brightness,
            contrast: settings.contrast,
            sharpness: settings.sharpness,
            blur: settings.blur,
        }
    }
}

/// Response body shared by both processing endpoints: `{image}` or `{error}`
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceResponse {
    /// Base64 PNG on success
    pub image: Option<String>,
    /// Human-readable failure description on error
    pub error: Option<String>,
}

impl ServiceResponse {
    /// Decode the response into the resulting image
    ///
    /// A present `error` field always wins, even on a 200 status; a missing
    /// `image` field on a non-success status maps to the bare status code.
    ///
    /// # Errors
    /// - [`ClientError::Api`] when the service reported an error
    /// - [`ClientError::UnexpectedStatus`] for non-success statuses without one
    /// - [`ClientError::Processing`] for bodies with neither field
    pub fn into_image(self, status: u16) -> Result<DataUrl> {
        if let Some(error) = self.error {
            return Err(ClientError::api(error));
        }
        match self.image {
            Some(payload) => DataUrl::from_base64_png(&payload),
            None if !(200..300).contains(&status) => Err(ClientError::UnexpectedStatus(status)),
            None => Err(ClientError::processing(
                "Service response contained neither image nor error",
            )),
        }
    }
}

/// Response body of `GET /health`
#[derive(Debug, Clone, Deserialize)]
pub struct HealthResponse {
    /// Reported service status, `ok` when healthy
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::BackgroundChoice;

    #[test]
    fn test_apply_effects_wire_shape() {
        let image = DataUrl::png(vec![1, 2, 3]);
        let settings = EffectSettings::builder()
            .background(BackgroundChoice::Color("#336699".to_string()))
            .brightness(1.2)
            .blur(true)
            .build()
            .unwrap();

        let request = ApplyEffectsRequest::new(&image, &settings);
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["image"], image.base64_payload());
        assert_eq!(json["bgType"], "color");
        assert_eq!(json["bgColor"], "#336699");
        assert_eq!(json["customBg"], serde_json::Value::Null);
        assert_eq!(json["blur"], true);
        assert!((json["brightness"].as_f64().unwrap() - 1.2).abs() < 1e-6);
    }

    #[test]
    fn test_custom_background_wire_shape() {
        let image = DataUrl::png(vec![1]);
        let backdrop = DataUrl::png(vec![9, 9]);
        let settings = EffectSettings::builder()
            .background(BackgroundChoice::Custom(backdrop.clone()))
            .build()
            .unwrap();

        let request = ApplyEffectsRequest::new(&image, &settings);
        assert_eq!(request.bg_type, "custom");
        assert_eq!(request.custom_bg.as_deref(), Some(backdrop.base64_payload().as_str()));
    }

    #[test]
    fn test_response_decoding() {
        let ok: ServiceResponse = serde_json::from_str(r#"{"image": "AQID"}"#).unwrap();
        assert_eq!(ok.into_image(200).unwrap().bytes(), &[1, 2, 3]);

        let failed: ServiceResponse =
            serde_json::from_str(r#"{"error": "No image provided"}"#).unwrap();
        let err = failed.into_image(400).unwrap_err();
        assert!(matches!(err, ClientError::Api(msg) if msg == "No image provided"));

        // Error field wins even on a success status
        let odd: ServiceResponse =
            serde_json::from_str(r#"{"image": "AQID", "error": "boom"}"#).unwrap();
        assert!(matches!(odd.into_image(200), Err(ClientError::Api(_))));

        let empty: ServiceResponse = serde_json::from_str("{}").unwrap();
        assert!(matches!(
            empty.into_image(500),
            Err(ClientError::UnexpectedStatus(500))
        ));
        let empty: ServiceResponse = serde_json::from_str("{}").unwrap();
        assert!(matches!(
            empty.into_image(200),
            Err(ClientError::Processing(_))
        ));
    }
}
