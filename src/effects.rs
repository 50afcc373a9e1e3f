//! Effect parameters submitted alongside the processed image
//!
//! These are ephemeral values rebuilt from the user's controls on every
//! apply-effects submit; nothing here is persisted.

use crate::data_url::DataUrl;
use crate::error::{ClientError, Result};

/// Background treatment for the cut-out subject
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BackgroundChoice {
    /// Keep the transparent background produced by removal
    #[default]
    Transparent,
    /// Composite over a solid color, given as `#RRGGBB`
    Color(String),
    /// Composite over a user-supplied background image
    Custom(DataUrl),
}

impl BackgroundChoice {
    /// Wire value for the `bgType` field
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Transparent => "transparent",
            Self::Color(_) => "color",
            Self::Custom(_) => "custom",
        }
    }
}

/// Adjustment parameters for `POST /apply-effects`
///
/// Slider ranges match the service's controls: brightness and contrast
/// 0.5-2.0, sharpness 0.0-2.0, all defaulting to the 1.0 identity.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectSettings {
    /// Background treatment
    pub background: BackgroundChoice,
    /// Brightness multiplier (0.5-2.0)
    pub brightness: f32,
    /// Contrast multiplier (0.5-2.0)
    pub contrast: f32,
    /// Sharpness multiplier (0.0-2.0)
    pub sharpness: f32,
    /// Apply the edge-smoothing blur filter
    pub blur: bool,
}

impl Default for EffectSettings {
    fn default() -> Self {
        Self {
            background: BackgroundChoice::Transparent,
            brightness: 1.0,
            contrast: 1.0,
            sharpness: 1.0,
            blur: false,
        }
    }
}

impl EffectSettings {
    /// Create a new settings builder
    pub fn builder() -> EffectSettingsBuilder {
        EffectSettingsBuilder::new()
    }

    /// Validate parameter ranges and the background color format
    ///
    /// # Errors
    /// - Slider value outside its range
    /// - Background color not of the form `#RRGGBB`
    /// - Empty custom background image
    pub fn validate(&self) -> Result<()> {
        if !(0.5..=2.0).contains(&self.brightness) {
            return Err(ClientError::config_value_error(
                "brightness",
                self.brightness,
                "0.5-2.0",
            ));
        }
        if !(0.5..=2.0).contains(&self.contrast) {
            return Err(ClientError::config_value_error(
                "contrast",
                self.contrast,
                "0.5-2.0",
            ));
        }
        if !(0.0..=2.0).contains(&self.sharpness) {
            return Err(ClientError::config_value_error(
                "sharpness",
                self.sharpness,
                "0.0-2.0",
            ));
        }
        match &self.background {
            BackgroundChoice::Color(color) => validate_hex_color(color),
            BackgroundChoice::Custom(data) if data.is_empty() => Err(ClientError::invalid_config(
                "Custom background image is empty",
            )),
            _ => Ok(()),
        }
    }

    /// The `bgColor` wire value; the service expects a color even when the
    /// background type is not `color`, so default to white
    #[must_use]
    pub fn bg_color_hex(&self) -> &str {
        match &self.background {
            BackgroundChoice::Color(color) => color,
            _ => "#ffffff",
        }
    }

    /// Base64 payload for the `customBg` wire field, when present
    #[must_use]
    pub fn custom_bg_payload(&self) -> Option<String> {
        match &self.background {
            BackgroundChoice::Custom(data) => Some(data.base64_payload()),
            _ => None,
        }
    }

    /// Whether the settings would change anything over the identity defaults
    #[must_use]
    pub fn is_identity(&self) -> bool {
        *self == Self::default()
    }
}

/// Check that a color string is `#` followed by six hex digits
fn validate_hex_color(color: &str) -> Result<()> {
    let digits = color.strip_prefix('#').unwrap_or("");
    if digits.len() == 6 && digits.chars().all(|c| c.is_ascii_hexdigit()) {
        Ok(())
    } else {
        Err(ClientError::invalid_config(format!(
            "Background color must be #RRGGBB, got '{}'",
            color
        )))
    }
}

/// Builder for `EffectSettings`
pub struct EffectSettingsBuilder {
    settings: EffectSettings,
}

impl EffectSettingsBuilder {
    /// Create a new builder with identity defaults
    pub fn new() -> Self {
        Self {
            settings: EffectSettings::default(),
        }
    }

    /// Set the background treatment
    pub fn background(mut self, background: BackgroundChoice) -> Self {
        self.settings.background = background;
        self
    }

    /// Set the brightness multiplier
    pub fn brightness(mut self, value: f32) -> Self {
        self.settings.brightness = value;
        self
    }

    /// Set the contrast multiplier
    pub fn contrast(mut self, value: f32) -> Self {
        self.settings.contrast = value;
        self
    }

    /// Set the sharpness multiplier
    pub fn sharpness(mut self, value: f32) -> Self {
        self.settings.sharpness = value;
        self
    }

    /// Enable or disable the edge-smoothing blur
    pub fn blur(mut self, enabled: bool) -> Self {
        self.settings.blur = enabled;
        self
    }

    /// Build the settings
    ///
    /// # Errors
    /// - Any validation failure from [`EffectSettings::validate`]
    pub fn build(self) -> Result<EffectSettings> {
        self.settings.validate()?;
        Ok(self.settings)
    }
}

impl Default for EffectSettingsBuilder {
    fn default() -> Self {
        Self::new()
    }
}
