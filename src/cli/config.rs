//! Configuration conversion utilities for CLI arguments

use crate::cli::main_impl::{Cli, CliOutputFormat};
use crate::{
    config::{ClientConfig, OutputFormat},
    data_url::DataUrl,
    effects::{BackgroundChoice, EffectSettings},
};
use anyhow::{Context, Result};
use std::fs;
use std::time::Duration;

/// Convert CLI arguments to client configuration and effect settings
pub(crate) struct CliConfigBuilder;

impl CliConfigBuilder {
    /// Build `ClientConfig` from CLI arguments
    pub(crate) fn from_cli(cli: &Cli) -> Result<ClientConfig> {
        let output_format = match cli.format {
            CliOutputFormat::Png => OutputFormat::Png,
            CliOutputFormat::Jpeg => OutputFormat::Jpeg,
        };

        let config = ClientConfig::builder()
            .service_url(cli.service_url.clone())
            .max_upload_bytes(cli.max_upload_mb * 1024 * 1024)
            .request_timeout(Duration::from_secs(cli.timeout_secs))
            .output_format(output_format)
            .jpeg_quality(cli.jpeg_quality)
            .build()
            .context("Invalid configuration")?;

        Ok(config)
    }

    /// Gather the effect settings from CLI arguments
    ///
    /// Reads the custom background file into its encoded form when one is
    /// given; `--bg-color` and `--bg-image` are mutually exclusive (enforced
    /// by clap).
    pub(crate) fn effect_settings(cli: &Cli) -> Result<EffectSettings> {
        let background = if let Some(color) = &cli.bg_color {
            BackgroundChoice::Color(color.clone())
        } else if let Some(path) = &cli.bg_image {
            let bytes = fs::read(path)
                .with_context(|| format!("Failed to read background image '{}'", path.display()))?;
            BackgroundChoice::Custom(DataUrl::from_file_bytes(path, bytes))
        } else {
            BackgroundChoice::Transparent
        };

        let settings = EffectSettings::builder()
            .background(background)
            .brightness(cli.brightness)
            .contrast(cli.contrast)
            .sharpness(cli.sharpness)
            .blur(cli.blur)
            .build()
            .context("Invalid effect settings")?;

        Ok(settings)
    }

    /// Validate CLI arguments for consistency
    pub(crate) fn validate_cli(cli: &Cli) -> Result<()> {
        // Building the configuration performs the URL/ceiling/quality checks
        Self::from_cli(cli)?;

        if cli.input.is_none() && !cli.ping {
            anyhow::bail!("An input image is required (or use --ping)");
        }

        if let Some(path) = &cli.bg_image {
            if !path.exists() {
                anyhow::bail!("Background image '{}' does not exist", path.display());
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn create_test_cli() -> Cli {
        Cli {
            input: Some(PathBuf::from("photo.jpg")),
            output: PathBuf::from("."),
            format: CliOutputFormat::Png,
            service_url: "http://localhost:5000".to_string(),
            max_upload_mb: 5,
            timeout_secs: 120,
            jpeg_quality: 95,
            bg_color: None,
            bg_image: None,
            brightness: 1.0,
            contrast: 1.0,
            sharpness: 1.0,
            blur: false,
            ping: false,
            verbose: 0,
        }
    }

    #[test]
    fn test_cli_config_conversion() {
        let mut cli = create_test_cli();
        cli.format = CliOutputFormat::Jpeg;
        cli.max_upload_mb = 100;

        let config = CliConfigBuilder::from_cli(&cli).unwrap();
        assert_eq!(config.output_format, OutputFormat::Jpeg);
        assert_eq!(config.max_upload_bytes, 100 * 1024 * 1024);
        assert_eq!(config.jpeg_quality, 95);
    }

    #[test]
    fn test_cli_validation() {
        let mut cli = create_test_cli();
        assert!(CliConfigBuilder::validate_cli(&cli).is_ok());

        cli.service_url = "not-a-url".to_string();
        assert!(CliConfigBuilder::validate_cli(&cli).is_err());

        cli.service_url = "http://localhost:5000".to_string();
        cli.input = None;
        assert!(CliConfigBuilder::validate_cli(&cli).is_err());

        cli.ping = true;
        assert!(CliConfigBuilder::validate_cli(&cli).is_ok());
    }

    #[test]
    fn test_effect_settings_conversion() {
        let mut cli = create_test_cli();
        let settings = CliConfigBuilder::effect_settings(&cli).unwrap();
        assert!(settings.is_identity());

        cli.bg_color = Some("#00ff00".to_string());
        cli.brightness = 1.5;
        cli.blur = true;
        let settings = CliConfigBuilder::effect_settings(&cli).unwrap();
        assert_eq!(settings.background.type_name(), "color");
        assert!(!settings.is_identity());

        cli.bg_color = Some("green".to_string());
        assert!(CliConfigBuilder::effect_settings(&cli).is_err());
    }
}
